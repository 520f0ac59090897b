use std::iter::FusedIterator;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, trace};

use crate::propagation::{Propagator, ShortestClauseFirst};
use crate::sat_solver::{next_step, Assignments, Solver, Step};
use crate::{Assignment, Literal, Problem};

/// Depth-first search driven by an explicit work stack.
///
/// Enumerates exactly the same assignments in the same order as
/// [`RecursiveSolver`](crate::RecursiveSolver), but the call stack stays flat
/// no matter how deep the search tree grows.
#[derive(Clone, Debug, Default)]
pub struct IterativeSolver<P = ShortestClauseFirst> {
    propagator: P,
}

/// Pending subproblem together with the decisions leading to it
struct Frame {
    problem: Problem,
    decisions: Vec<Literal>,
}

/// Lazy enumeration state of an [`IterativeSolver`]
pub struct Solutions<'a, P> {
    propagator: &'a P,
    stack: Vec<Frame>,
    cancelled: Option<&'a AtomicBool>,
}

impl IterativeSolver {
    /// Creates a solver using [`ShortestClauseFirst`] propagation
    pub fn new() -> Self {
        IterativeSolver{propagator: ShortestClauseFirst}
    }
}

impl<P: Propagator> IterativeSolver<P> {
    pub fn with_propagator(propagator: P) -> Self {
        IterativeSolver{propagator}
    }

    /// Same as [`Solver::solve`] but returns the concrete iterator
    pub fn solutions(&self, problem: Problem) -> Solutions<'_, P> {
        Solutions::new(&self.propagator, problem)
    }
}

impl<P: Propagator> Solver for IterativeSolver<P> {
    fn solve<'a>(&'a self, problem: Problem) -> Assignments<'a> {
        debug!("Iterative search over {} clauses, {} variables", problem.len(), problem.num_variables());
        Box::new(self.solutions(problem))
    }
}

impl<'a, P: Propagator> Solutions<'a, P> {
    pub(crate) fn new(propagator: &'a P, problem: Problem) -> Self {
        Solutions{
            propagator,
            stack: vec![Frame{problem, decisions: Vec::new()}],
            cancelled: None,
        }
    }

    /// Stops the enumeration once `flag` is raised, checked before every step
    pub(crate) fn cancelled_by(mut self, flag: &'a AtomicBool) -> Self {
        self.cancelled = Some(flag);
        self
    }

    /// Number of subproblems still waiting to be explored
    pub fn pending(&self) -> usize {
        self.stack.len()
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.map_or(false, |flag| flag.load(Ordering::Relaxed))
    }
}

impl<'a, P: Propagator> Iterator for Solutions<'a, P> {
    type Item = Assignment;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(Frame{problem, decisions}) = self.stack.pop() {
            if self.is_cancelled() {
                self.stack.clear();
                return None;
            }

            let literal = match next_step(&problem) {
                Step::Satisfied => return Some(Assignment::new(decisions)),
                Step::Contradiction => {
                    trace!("Contradiction after {} decisions", decisions.len());
                    continue;
                }
                Step::Branch(literal) => literal,
            };
            trace!("Deciding {}", literal);

            let negated = literal.negated();
            let without = self.propagator.propagate(negated, &problem);
            let with = self.propagator.propagate(literal, &problem);

            // last in, first out: the literal branch has to be pushed last
            let mut negated_decisions = decisions.clone();
            negated_decisions.push(negated);
            self.stack.push(Frame{problem: without, decisions: negated_decisions});

            let mut decisions = decisions;
            decisions.push(literal);
            self.stack.push(Frame{problem: with, decisions});
        }
        None
    }
}

impl<'a, P: Propagator> FusedIterator for Solutions<'a, P> {}
