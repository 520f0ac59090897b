use thiserror::Error;

/// Errors raised while building formulae.
///
/// Searching never fails: an unsatisfiable formula simply yields no assignments.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Literal value must not be 0")]
    ZeroLiteral,
    #[error("Literal value {0} is out of range")]
    LiteralOutOfRange(i64),
    #[error("Invalid DIMACS input: {0}")]
    Dimacs(String),
    #[error("Only CNF formulae are supported")]
    NotCnf,
}
