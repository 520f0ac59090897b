use proptest::{
    prelude::*,
    collection::vec,
    bool::weighted,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use solver::{
    Assignment, Clause, IterativeSolver, Literal, ParallelSolver, Problem, Propagator,
    RecursiveSolver, ShortestClauseFirst, Solver,
};

const MAX_NUM_VARIABLES: i32 = 4;
const MAX_NUM_LITERALS: usize = 3;
const MAX_NUM_CLAUSES: usize = 8;

fn problem(clauses: &[&[i32]]) -> Problem {
    Problem::from_ints(clauses).unwrap()
}

fn ints(assignments: &[Assignment]) -> Vec<Vec<i32>> {
    assignments.iter().map(Assignment::to_ints).collect()
}

fn arbitrary_problem() -> impl Strategy<Value=Problem> {
    vec(vec((1..=MAX_NUM_VARIABLES, weighted(0.5)), 0..=MAX_NUM_LITERALS), 0..=MAX_NUM_CLAUSES)
        .prop_map(|clauses| clauses.into_iter()
            .map(|clause| clause.into_iter()
                .map(|(variable, sign)| Literal::new(if sign { variable } else { -variable }).unwrap())
                .collect::<Clause>())
            .collect::<Problem>())
}

/// Every total valuation of variables `1..=MAX_NUM_VARIABLES`
fn valuations() -> impl Iterator<Item=Vec<bool>> {
    (0..1u32 << MAX_NUM_VARIABLES)
        .map(|bits| (0..MAX_NUM_VARIABLES).map(|i| bits & (1 << i) != 0).collect())
}

fn holds(literal: Literal, valuation: &[bool]) -> bool {
    valuation[literal.var() as usize - 1] == literal.is_positive()
}

fn check_valuation(problem: &Problem, valuation: &[bool]) -> bool {
    problem.iter().all(|clause| clause.iter().any(|literal| holds(literal, valuation)))
}

fn extends(valuation: &[bool], assignment: &Assignment) -> bool {
    assignment.literals().iter().all(|&literal| holds(literal, valuation))
}

/// Default propagation that counts how often it runs
#[derive(Default)]
struct Counting {
    calls: AtomicUsize,
}

impl Counting {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Propagator for Counting {
    fn propagate(&self, literal: Literal, problem: &Problem) -> Problem {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ShortestClauseFirst.propagate(literal, problem)
    }
}

/// Propagation that keeps the clause order of its input
struct KeepOrder;

impl Propagator for KeepOrder {
    fn propagate(&self, literal: Literal, problem: &Problem) -> Problem {
        let mut clauses = Vec::new();
        for clause in problem.iter().filter(|clause| !clause.contains(literal)) {
            let clause = clause.without(literal.negated());
            if clause.is_empty() {
                return Problem::unsatisfiable();
            }
            clauses.push(clause);
        }
        Problem::new(clauses)
    }
}

#[test]
fn trivial_example() {
    let assignments: Vec<_> = RecursiveSolver::new()
        .solve(problem(&[&[1, 2], &[-2, 3]]))
        .collect();
    assert_eq!(ints(&assignments), vec![vec![1, -2], vec![1, 2, 3], vec![-1, 2, 3]]);
}

#[test]
fn direct_contradiction() {
    let p = problem(&[&[1], &[-1]]);
    assert_eq!(RecursiveSolver::new().solve(p.clone()).count(), 0);
    assert_eq!(IterativeSolver::new().solve(p.clone()).count(), 0);
    assert!(ParallelSolver::new().solve_any(p).is_none());
}

#[test]
fn empty_problem_has_one_empty_assignment() {
    let expected = vec![Assignment::empty()];
    assert_eq!(RecursiveSolver::new().solve(Problem::empty()).collect::<Vec<_>>(), expected);
    assert_eq!(solver::solve(Problem::empty()).collect::<Vec<_>>(), expected);
    assert_eq!(ParallelSolver::new().solve_all(Problem::empty()), expected);
    assert_eq!(ParallelSolver::new().solve_any(Problem::empty()), Some(Assignment::empty()));
}

#[test]
fn empty_clause_anywhere_is_unsatisfiable() {
    let mut p = problem(&[&[1, 2], &[-2, 3], &[4]]);
    p.push(Clause::empty());
    assert_eq!(RecursiveSolver::new().solve(p.clone()).count(), 0);
    assert_eq!(IterativeSolver::new().solve(p.clone()).count(), 0);
    assert!(ParallelSolver::new().solve_all(p).is_empty());
}

#[test]
fn unconstrained_variables_are_left_out() {
    let assignments: Vec<_> = IterativeSolver::new()
        .solve(problem(&[&[1, 2, 3]]))
        .collect();
    assert_eq!(ints(&assignments), vec![vec![1], vec![-1, 2], vec![-1, -2, 3]]);
}

#[test]
fn first_stops_early() {
    let solver = IterativeSolver::new();
    let mut solutions = solver.solutions(problem(&[&[1, 2], &[3, 4], &[5, 6]]));
    assert_eq!(solutions.next().map(|a| a.to_ints()), Some(vec![1, 3, 5]));
    assert!(solutions.pending() > 0);
    assert_eq!(RecursiveSolver::new().first(problem(&[&[-7, 2]])).map(|a| a.to_ints()), Some(vec![-7]));
}

#[test]
fn first_propagates_only_along_one_path() {
    let counting = Counting::default();
    let solver = RecursiveSolver::with_propagator(&counting);
    let first = solver.first(problem(&[&[1, 2], &[3, 4], &[5, 6]]));

    assert_eq!(first.map(|a| a.to_ints()), Some(vec![1, 3, 5]));
    assert_eq!(counting.calls(), 3);
}

#[test]
fn propagator_through_box_and_arc() {
    let p = problem(&[&[1, 2], &[-1, 3], &[-3, -2]]);
    let expected: Vec<_> = RecursiveSolver::new().solve(p.clone()).collect();

    let boxed: Box<dyn Propagator> = Box::new(ShortestClauseFirst);
    let iterative: Vec<_> = IterativeSolver::with_propagator(boxed).solve(p.clone()).collect();
    assert_eq!(iterative, expected);

    let counting = Arc::new(Counting::default());
    let parallel = ParallelSolver::with_propagator(Arc::clone(&counting))
        .split_depth(1)
        .solve_all(p);
    assert_eq!(parallel, expected);
    assert!(counting.calls() > 0);
}

#[test]
fn deep_implication_chain() {
    const LENGTH: i32 = 2000;
    let mut clauses = vec![vec![1]];
    clauses.extend((1..LENGTH).map(|v| vec![-v, v + 1]));
    let p = Problem::from_ints(&clauses).unwrap();

    let assignments: Vec<_> = solver::solve(p).collect();
    assert_eq!(assignments.len(), 1);
    assert_eq!(assignments[0].to_ints(), (1..=LENGTH).collect::<Vec<_>>());
}

#[test]
fn dyn_solvers_agree() {
    let solvers: Vec<Box<dyn Solver>> = vec![
        Box::new(RecursiveSolver::new()),
        Box::new(IterativeSolver::new()),
    ];
    let p = problem(&[&[1, -2, 3], &[2, 4], &[-1, -4], &[-3, 2]]);
    let results: Vec<Vec<Assignment>> = solvers.iter()
        .map(|solver| solver.solve(p.clone()).collect())
        .collect();
    assert_eq!(results[0], results[1]);
    assert!(!results[0].is_empty());
}

proptest! {
    #[test]
    fn assignments_satisfy_problem(p in arbitrary_problem()) {
        for assignment in RecursiveSolver::new().solve(p.clone()) {
            prop_assert!(assignment.satisfies(&p));
            for &literal in assignment.literals() {
                prop_assert!(!assignment.contains(literal.negated()));
            }
        }
    }

    #[test]
    fn strategies_enumerate_identically(p in arbitrary_problem()) {
        let recursive: Vec<_> = RecursiveSolver::new().solve(p.clone()).collect();
        let iterative: Vec<_> = IterativeSolver::new().solve(p.clone()).collect();
        let parallel = ParallelSolver::new().split_depth(2).solve_all(p.clone());

        prop_assert_eq!(&recursive, &iterative);
        prop_assert_eq!(&recursive, &parallel);
    }

    #[test]
    fn enumeration_is_deterministic(p in arbitrary_problem()) {
        let once: Vec<_> = RecursiveSolver::new().solve(p.clone()).collect();
        let twice: Vec<_> = RecursiveSolver::new().solve(p).collect();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn every_model_is_covered_exactly_once(p in arbitrary_problem()) {
        let assignments: Vec<_> = IterativeSolver::new().solve(p.clone()).collect();

        for valuation in valuations() {
            let covering = assignments.iter()
                .filter(|assignment| extends(&valuation, assignment))
                .count();
            let expected = if check_valuation(&p, &valuation) { 1 } else { 0 };
            prop_assert_eq!(covering, expected);
        }
    }

    #[test]
    fn unsorted_propagation_is_sound_and_consistent(p in arbitrary_problem()) {
        let recursive: Vec<_> = RecursiveSolver::with_propagator(KeepOrder).solve(p.clone()).collect();
        let iterative: Vec<_> = IterativeSolver::with_propagator(KeepOrder).solve(p.clone()).collect();
        let parallel = ParallelSolver::with_propagator(KeepOrder).split_depth(2).solve_all(p.clone());

        prop_assert_eq!(&recursive, &iterative);
        prop_assert_eq!(&recursive, &parallel);
        for valuation in valuations() {
            let covering = recursive.iter()
                .filter(|assignment| extends(&valuation, assignment))
                .count();
            let expected = if check_valuation(&p, &valuation) { 1 } else { 0 };
            prop_assert_eq!(covering, expected);
        }
    }

    #[test]
    fn any_finds_a_model_iff_one_exists(p in arbitrary_problem(), depth in 0..4usize) {
        let satisfiable = valuations().any(|valuation| check_valuation(&p, &valuation));
        let any = ParallelSolver::new().split_depth(depth).solve_any(p.clone());

        prop_assert_eq!(any.is_some(), satisfiable);
        if let Some(assignment) = any {
            prop_assert!(assignment.satisfies(&p));
        }
    }
}
