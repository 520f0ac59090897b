use std::iter;
use std::rc::Rc;

use log::{debug, trace};

use crate::propagation::{Propagator, ShortestClauseFirst};
use crate::sat_solver::{next_step, Assignments, Solver, Step};
use crate::{Assignment, Literal, Problem};

/// Depth-first search expressed as nested lazy iterators.
///
/// Each decision level adds a few frames to the call stack of whoever drives
/// the iterator, so very deep search trees are better served by
/// [`IterativeSolver`](crate::IterativeSolver).
#[derive(Clone, Debug, Default)]
pub struct RecursiveSolver<P = ShortestClauseFirst> {
    propagator: P,
}

impl RecursiveSolver {
    /// Creates a solver using [`ShortestClauseFirst`] propagation
    pub fn new() -> Self {
        RecursiveSolver{propagator: ShortestClauseFirst}
    }
}

impl<P: Propagator> RecursiveSolver<P> {
    pub fn with_propagator(propagator: P) -> Self {
        RecursiveSolver{propagator}
    }

    fn search<'a>(&'a self, problem: Problem) -> Assignments<'a> {
        let literal = match next_step(&problem) {
            Step::Satisfied => return Box::new(iter::once(Assignment::empty())),
            Step::Contradiction => {
                trace!("Contradiction, abandoning branch");
                return Box::new(iter::empty())
            }
            Step::Branch(literal) => literal,
        };

        // both branches start from the same snapshot
        let problem = Rc::new(problem);
        let with_literal = self.branch(literal, Rc::clone(&problem));
        let with_negation = self.branch(literal.negated(), problem);

        Box::new(with_literal.chain(with_negation))
    }

    /// Assignments extending the decision `literal`. Nothing is computed until
    /// the first item is requested. Decisions are collected deepest first.
    fn branch<'a>(&'a self, literal: Literal, problem: Rc<Problem>) -> impl Iterator<Item=Assignment> + 'a {
        iter::once(problem)
            .flat_map(move |problem| {
                trace!("Deciding {}", literal);
                let propagated = self.propagator.propagate(literal, &problem);
                self.search(propagated)
            })
            .map(move |assignment| assignment.pushed(literal))
    }
}

impl<P: Propagator> Solver for RecursiveSolver<P> {
    fn solve<'a>(&'a self, problem: Problem) -> Assignments<'a> {
        debug!("Recursive search over {} clauses, {} variables", problem.len(), problem.num_variables());
        Box::new(self.search(problem).map(Assignment::reversed))
    }
}
