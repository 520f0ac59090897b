use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use crate::iterative::Solutions;
use crate::propagation::{Propagator, ShortestClauseFirst};
use crate::sat_solver::{next_step, Step};
use crate::{Assignment, Literal, Problem};

/// Explores both branches of the topmost decisions on the rayon thread pool.
///
/// Below `split_depth` every subtree is searched sequentially with an explicit
/// stack. Branches never share mutable state, the only synchronisation is
/// joining their results.
#[derive(Clone, Debug)]
pub struct ParallelSolver<P = ShortestClauseFirst> {
    propagator: P,
    split_depth: usize,
}

/// Enough decision levels to hand every worker thread its own subtree
fn default_split_depth() -> usize {
    let threads = rayon::current_num_threads().max(1);
    threads.next_power_of_two().trailing_zeros() as usize + 1
}

impl ParallelSolver {
    /// Creates a solver using [`ShortestClauseFirst`] propagation
    pub fn new() -> Self {
        ParallelSolver::with_propagator(ShortestClauseFirst)
    }
}

impl Default for ParallelSolver {
    fn default() -> Self {
        ParallelSolver::new()
    }
}

impl<P: Propagator + Sync> ParallelSolver<P> {
    pub fn with_propagator(propagator: P) -> Self {
        ParallelSolver{propagator, split_depth: default_split_depth()}
    }

    /// Number of decision levels whose branches run in parallel
    pub fn split_depth(mut self, depth: usize) -> Self {
        self.split_depth = depth;
        self
    }

    /// Every satisfying assignment, in the same order a sequential
    /// [`Solver`](crate::Solver) enumerates them. Evaluated eagerly.
    pub fn solve_all(&self, problem: Problem) -> Vec<Assignment> {
        debug!("Parallel enumeration over {} clauses, split depth {}", problem.len(), self.split_depth);
        let assignments = self.all(problem, 0);
        debug!("Parallel enumeration found {} assignments", assignments.len());
        assignments
    }

    /// Some satisfying assignment, not necessarily the first in branching
    /// order. Once a branch succeeds the remaining branches give up.
    pub fn solve_any(&self, problem: Problem) -> Option<Assignment> {
        debug!("Parallel search over {} clauses, split depth {}", problem.len(), self.split_depth);
        let found = AtomicBool::new(false);
        let assignment = self.any(problem, 0, &found);
        debug!("Parallel search {}", if assignment.is_some() { "succeeded" } else { "failed" });
        assignment
    }

    fn all(&self, problem: Problem, depth: usize) -> Vec<Assignment> {
        if depth >= self.split_depth {
            return Solutions::new(&self.propagator, problem).collect();
        }

        let literal = match next_step(&problem) {
            Step::Satisfied => return vec![Assignment::empty()],
            Step::Contradiction => return Vec::new(),
            Step::Branch(literal) => literal,
        };

        let branch = |literal: Literal| -> Vec<Assignment> {
            let propagated = self.propagator.propagate(literal, &problem);
            self.all(propagated, depth + 1)
                .into_iter()
                .map(|assignment| assignment.prepended_with(literal))
                .collect()
        };

        let (mut with, without) = rayon::join(
            || branch(literal),
            || branch(literal.negated()),
        );
        with.extend(without);
        with
    }

    fn any(&self, problem: Problem, depth: usize, found: &AtomicBool) -> Option<Assignment> {
        if found.load(Ordering::Relaxed) {
            return None;
        }

        if depth >= self.split_depth {
            let assignment = Solutions::new(&self.propagator, problem)
                .cancelled_by(found)
                .next();
            if assignment.is_some() {
                found.store(true, Ordering::Relaxed);
            }
            return assignment;
        }

        let literal = match next_step(&problem) {
            Step::Satisfied => {
                found.store(true, Ordering::Relaxed);
                return Some(Assignment::empty());
            }
            Step::Contradiction => return None,
            Step::Branch(literal) => literal,
        };

        let branch = |literal: Literal| -> Option<Assignment> {
            let propagated = self.propagator.propagate(literal, &problem);
            self.any(propagated, depth + 1, found)
                .map(|assignment| assignment.prepended_with(literal))
        };

        let (with, without) = rayon::join(
            || branch(literal),
            || branch(literal.negated()),
        );
        with.or(without)
    }
}
