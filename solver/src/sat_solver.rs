use auto_impl::auto_impl;

use crate::{Assignment, Literal, Problem};

/// Lazy sequence of satisfying assignments
pub type Assignments<'a> = Box<dyn Iterator<Item=Assignment> + 'a>;

/// Enumerates every satisfying assignment of a problem.
///
/// Assignments are produced in branching order: for every decision the
/// assignments with the literal set come before the ones with it negated.
/// Consumers may stop iterating at any point.
#[auto_impl(&, Box)]
pub trait Solver {
    fn solve<'a>(&'a self, problem: Problem) -> Assignments<'a>;

    /// First assignment in branching order, if any
    fn first(&self, problem: Problem) -> Option<Assignment> {
        self.solve(problem).next()
    }
}

/// What the search does with a (sub)problem
pub(crate) enum Step {
    /// No clauses left, every remaining variable is free
    Satisfied,
    /// The first clause is empty
    Contradiction,
    /// Split on the first literal of the first clause
    Branch(Literal),
}

pub(crate) fn next_step(problem: &Problem) -> Step {
    match problem.head() {
        None => Step::Satisfied,
        Some(clause) => match clause.head() {
            None => Step::Contradiction,
            Some(literal) => Step::Branch(literal),
        },
    }
}
