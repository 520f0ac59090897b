//! Sudoku encoded as a propositional satisfiability problem.

use std::fmt;

use thiserror::Error;

use solver::{Problem, Solver};

/// The board and its textual form
pub mod grid;
/// Translation between boards and CNF
pub mod sat_conversion;

pub use grid::{Grid, GridParserError};

#[derive(Debug, Error)]
pub enum SudokuError {
    #[error(transparent)]
    Parse(#[from] GridParserError),
    #[error("Cell ({row}, {column}) holds {value}, expected a digit from 0 to 9")]
    InvalidValue { row: usize, column: usize, value: u8 },
    #[error(transparent)]
    Formula(#[from] solver::Error),
}

/// A puzzle together with its CNF encoding
pub struct Sudoku {
    grid: Grid,
    problem: Problem,
}

impl Sudoku {
    pub fn new(grid: Grid) -> Result<Sudoku, SudokuError> {
        if let Some(((row, column), value)) = grid.givens().find(|(_, value)| *value > 9) {
            return Err(SudokuError::InvalidValue{row, column, value});
        }
        let variables = sat_conversion::Variables::new()?;
        let problem = sat_conversion::to_formula(&grid, &variables);
        Ok(Sudoku{grid, problem})
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    /// Every solution, found with [`solver::solve`]
    pub fn solutions(&self) -> impl Iterator<Item=Grid> {
        solver::solve(self.problem.clone())
            .map(|assignment| sat_conversion::grid_from(&assignment))
    }

    /// Solutions in the order `solver` enumerates them, decoded lazily
    pub fn solutions_using<'a>(&self, solver: &'a dyn Solver) -> impl Iterator<Item=Grid> + 'a {
        solver.solve(self.problem.clone())
            .map(|assignment| sat_conversion::grid_from(&assignment))
    }
}

impl std::str::FromStr for Sudoku {
    type Err = SudokuError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Sudoku::new(input.parse()?)
    }
}

impl fmt::Display for Sudoku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.grid)
    }
}
