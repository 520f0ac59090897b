use auto_impl::auto_impl;

use crate::cnf::{Clause, Literal, Problem};

/// Simplifies a problem under the assumption that a literal holds.
///
/// Implementations must not mutate shared state: both branches of a decision
/// are derived from the same problem.
#[auto_impl(&, Box, Arc)]
pub trait Propagator {
    fn propagate(&self, literal: Literal, problem: &Problem) -> Problem;
}

/// Default propagation: drops satisfied clauses, strips the falsified literal
/// and orders the remaining clauses by ascending length, so the next decision
/// is taken from the most constrained clause.
///
/// Returns [`Problem::unsatisfiable`] as soon as a clause becomes empty.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShortestClauseFirst;

impl Propagator for ShortestClauseFirst {
    fn propagate(&self, literal: Literal, problem: &Problem) -> Problem {
        let negated = literal.negated();
        let mut clauses: Vec<Clause> = Vec::with_capacity(problem.len());

        for clause in problem {
            if clause.contains(literal) {
                continue;
            }
            let clause = clause.without(negated);
            if clause.is_empty() {
                return Problem::unsatisfiable();
            }
            clauses.push(clause);
        }

        // stable, equal lengths keep their relative order
        clauses.sort_by_key(Clause::len);
        Problem::new(clauses)
    }
}
