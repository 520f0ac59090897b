//! Clause generators for encoding common constraints into CNF.

use itertools::Itertools;

use crate::{Clause, Literal};

/// Forbids any two of `literals` from holding together: one binary clause
/// `(¬a ∨ ¬b)` per unordered pair, in input order.
pub fn at_most_one(literals: &[Literal]) -> Vec<Clause> {
    literals.iter()
        .tuple_combinations()
        .map(|(a, b)| Clause::new(vec![a.negated(), b.negated()]))
        .collect()
}

/// [`at_most_one`] followed by the clause of all `literals`.
pub fn exactly_one(literals: &[Literal]) -> Vec<Clause> {
    let mut clauses = at_most_one(literals);
    clauses.push(literals.iter().copied().collect());
    clauses
}

/// `a → b`, i.e. `(¬a ∨ b)`
pub fn implication(a: Literal, b: Literal) -> Clause {
    Clause::new(vec![a.negated(), b])
}

/// `a ↔ b` as the two implications
pub fn equivalence(a: Literal, b: Literal) -> Vec<Clause> {
    vec![implication(a, b), implication(b, a)]
}
