/// The CNF representation of a formula
pub mod cnf;
/// Satisfying assignments produced by the solvers
mod assignment;
/// Errors raised while constructing formulae
mod error;
/// Simplification of a formula under a literal assumption
pub mod propagation;
/// The Solver trait which has to be implemented by each solver
pub mod sat_solver;
/// Search as nested lazy iterators
mod recursive;
/// Search with an explicit work stack
mod iterative;
/// Search distributing branches over a thread pool
mod parallel;
/// Helpers for encoding at-most-one, exactly-one, implication and equivalence
pub mod constraints;
mod util;

pub use cnf::{Clause, Literal, Problem, VarId};
pub use assignment::Assignment;
pub use error::Error;
pub use propagation::{Propagator, ShortestClauseFirst};
pub use sat_solver::{Assignments, Solver};
pub use recursive::RecursiveSolver;
pub use iterative::{IterativeSolver, Solutions};
pub use parallel::ParallelSolver;

static DEFAULT_PROPAGATOR: ShortestClauseFirst = ShortestClauseFirst;

/// Enumerates every satisfying assignment of `problem` with the default
/// propagation and an explicit search stack.
pub fn solve(problem: Problem) -> Solutions<'static, ShortestClauseFirst> {
    Solutions::new(&DEFAULT_PROPAGATOR, problem)
}
