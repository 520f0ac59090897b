use std::convert::TryFrom;
use std::fmt;
use std::iter::FromIterator;
use std::ops::Neg;
use std::sync::Arc;

use dimacs::parse_dimacs;
use itertools::Itertools;
use rayon::iter::{FromParallelIterator, IntoParallelIterator, ParallelIterator};

use crate::util::HashSet;
use crate::Error;

/// Type used for referencing logical variables
pub type VarId = u32;

/// Signed reference to a logical variable.
///
/// A positive value asserts the variable, a negative one asserts its negation.
/// The value is never 0 and never `i32::MIN`, so negation is always defined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal(i32);

/// Representation of a clause (disjunction of literals)
///
/// The empty clause can never be satisfied.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Clause {
    literals: Arc<[Literal]>,
}

/// Representation of logical formulae in CNF form
/// (conjunction of clauses)
///
/// The empty problem is trivially satisfied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Problem {
    clauses: Vec<Clause>,
}

impl Literal {
    /// Creates a literal from its signed integer value
    pub fn new(value: i32) -> Result<Literal, Error> {
        match value {
            0 => Err(Error::ZeroLiteral),
            i32::MIN => Err(Error::LiteralOutOfRange(value.into())),
            _ => Ok(Literal(value)),
        }
    }

    /// Creates a literal asserting the given variable
    pub fn pos(var: VarId) -> Result<Literal, Error> {
        let value = i32::try_from(var).map_err(|_| Error::LiteralOutOfRange(var.into()))?;
        Literal::new(value)
    }

    /// Creates a literal asserting the negation of the given variable
    pub fn neg(var: VarId) -> Result<Literal, Error> {
        Literal::pos(var).map(Literal::negated)
    }

    /// The signed integer value of the literal
    pub fn value(self) -> i32 {
        self.0
    }

    /// Identifier of the referenced variable
    pub fn var(self) -> VarId {
        self.value().unsigned_abs()
    }

    /// Checks if the literal asserts its variable
    pub fn is_positive(self) -> bool {
        self.value() > 0
    }

    /// The literal with flipped polarity
    pub fn negated(self) -> Literal {
        Literal(-self.0)
    }
}

impl Neg for Literal {
    type Output = Literal;

    fn neg(self) -> Literal {
        self.negated()
    }
}

impl TryFrom<i32> for Literal {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Literal::new(value)
    }
}

impl From<Literal> for i32 {
    fn from(literal: Literal) -> i32 {
        literal.value()
    }
}

impl Clause {
    /// Creates a clause out of the given literals, keeping their order
    pub fn new(literals: Vec<Literal>) -> Clause {
        Clause{literals: literals.into()}
    }

    /// Creates the empty (unsatisfiable) clause
    pub fn empty() -> Clause {
        Clause::new(Vec::new())
    }

    /// Creates a clause containing a single literal
    pub fn single(literal: Literal) -> Clause {
        Clause::new(vec![literal])
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    /// Returns number of literals in the clause, duplicates included
    pub fn len(&self) -> usize {
        self.literals.len()
    }

    /// First literal of the clause, `None` for the empty clause
    pub fn head(&self) -> Option<Literal> {
        self.literals.first().copied()
    }

    pub fn contains(&self, literal: Literal) -> bool {
        self.literals.contains(&literal)
    }

    /// Derives a clause with every occurrence of `literal` removed.
    /// Remaining literals keep their relative order.
    pub fn without(&self, literal: Literal) -> Clause {
        if !self.contains(literal) {
            return self.clone();
        }
        self.iter()
            .filter(|&l| l != literal)
            .collect()
    }

    pub fn literals(&self) -> &[Literal] {
        &self.literals
    }

    pub fn iter(&self) -> impl Iterator<Item=Literal> + '_ {
        self.literals.iter().copied()
    }
}

impl FromIterator<Literal> for Clause {
    fn from_iter<I: IntoIterator<Item=Literal>>(iter: I) -> Self {
        Clause::new(iter.into_iter().collect())
    }
}

impl TryFrom<&[i32]> for Clause {
    type Error = Error;

    fn try_from(values: &[i32]) -> Result<Self, Self::Error> {
        values.iter()
            .map(|&value| Literal::new(value))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = Literal;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Literal>>;

    fn into_iter(self) -> Self::IntoIter {
        self.literals.iter().copied()
    }
}

impl Problem {
    /// Creates an empty (trivially satisfied) problem
    pub fn empty() -> Problem {
        Problem{clauses: Vec::new()}
    }

    /// The canonical unsatisfiable problem: exactly one empty clause
    pub fn unsatisfiable() -> Problem {
        Problem{clauses: vec![Clause::empty()]}
    }

    /// Creates a problem out of the given clauses, keeping their order
    pub fn new(clauses: Vec<Clause>) -> Problem {
        Problem{clauses}
    }

    /// Builds a problem from plain integer clauses, rejecting zero literals
    pub fn from_ints<C: AsRef<[i32]>>(clauses: &[C]) -> Result<Problem, Error> {
        clauses.iter()
            .map(|clause| Clause::try_from(clause.as_ref()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Checks for the canonical unsatisfiable value
    pub fn is_unsatisfiable(&self) -> bool {
        self.clauses.len() == 1 && self.clauses[0].is_empty()
    }

    /// First clause of the problem, `None` for the empty problem
    pub fn head(&self) -> Option<&Clause> {
        self.clauses.first()
    }

    /// Returns number of clauses in the formula
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Clause> {
        self.clauses.iter()
    }

    /// Inserts a new clause into the formula
    pub fn push(&mut self, clause: Clause) {
        self.clauses.push(clause)
    }

    /// Collects all variable identifiers that appear in the formula
    pub fn variables(&self) -> HashSet<VarId> {
        self.clauses.iter()
            .flat_map(|clause| clause.iter().map(Literal::var))
            .collect()
    }

    /// Calculates the number of distinct variables (unifies negated and positive)
    pub fn num_variables(&self) -> usize {
        self.variables().len()
    }

    /// Prints formula in DIMACS compatible form
    pub fn to_dimacs(&self) -> String {
        let max_var = self.clauses.iter()
            .flat_map(|clause| clause.iter().map(Literal::var))
            .max()
            .unwrap_or(0);

        let mut out = format!("p cnf {} {}\n", max_var, self.clauses.len());
        for clause in &self.clauses {
            for literal in clause {
                out.push_str(&literal.to_string());
                out.push(' ');
            }
            out.push_str("0\n");
        }
        out
    }

    /// Parse DIMACS string into a problem
    pub fn from_dimacs(input: &str) -> Result<Problem, Error> {
        match parse_dimacs(input) {
            Ok(dimacs::Instance::Cnf{clauses, ..}) =>
                clauses.iter()
                    .map(|clause|
                         clause.lits().iter()
                            .map(|lit| {
                                let var = VarId::try_from(lit.var().to_u64())
                                    .map_err(|_| Error::Dimacs(format!("variable {} is too large", lit.var().to_u64())))?;
                                if lit.sign() == dimacs::Sign::Pos {
                                    Literal::pos(var)
                                } else {
                                    Literal::neg(var)
                                }
                            }).collect::<Result<Clause, Error>>()
                    ).collect(),
            Ok(_) => Err(Error::NotCnf),
            Err(err) => Err(Error::Dimacs(format!("{:?}", err))),
        }
    }
}

impl From<Vec<Clause>> for Problem {
    fn from(clauses: Vec<Clause>) -> Self {
        Problem::new(clauses)
    }
}

impl Extend<Clause> for Problem {
    fn extend<I: IntoIterator<Item=Clause>>(&mut self, iter: I) {
        self.clauses.extend(iter)
    }
}

impl FromParallelIterator<Clause> for Problem {
    fn from_par_iter<I: IntoParallelIterator<Item=Clause>>(iter: I) -> Self {
        Problem{clauses: iter.into_par_iter().collect()}
    }
}

impl FromIterator<Clause> for Problem {
    fn from_iter<I: IntoIterator<Item=Clause>>(iter: I) -> Self {
        Problem{clauses: iter.into_iter().collect()}
    }
}

impl IntoIterator for Problem {
    type Item = Clause;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.into_iter()
    }
}

impl<'a> IntoIterator for &'a Problem {
    type Item = &'a Clause;
    type IntoIter = std::slice::Iter<'a, Clause>;

    fn into_iter(self) -> Self::IntoIter {
        self.clauses.iter()
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for clause in &self.clauses {
            writeln!(f, "{}", clause)?;
        }
        Ok(())
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.iter().join(", "))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}
