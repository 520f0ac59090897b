//! Edge-matching puzzles in the style of Eternity II, encoded as a
//! propositional satisfiability problem.

use std::fmt;

use thiserror::Error;

use solver::{Problem, Solver};

/// Placed pieces and their layout
pub mod board;
/// Pieces, their sides and rotations
pub mod piece;
/// Translation between games and CNF
pub mod sat_conversion;

pub use board::{Board, CellPlace};
pub use piece::{Border, Color, Piece, Rotation};

use sat_conversion::Variables;

#[derive(Debug, Error)]
pub enum Eternity2Error {
    #[error("A {rows}x{columns} board needs {expected} pieces but {found} were given")]
    InconsistentPieceCount { rows: usize, columns: usize, expected: usize, found: usize },
    #[error("Piece at index {index} has id {id}, ids must match positions")]
    MisnumberedPiece { index: usize, id: usize },
    #[error("Piece at ({row}, {column}) has unknown id {id}")]
    UnknownPiece { row: usize, column: usize, id: usize },
    #[error("Piece at ({row}, {column}) is not a rotation of piece {id}")]
    NotARotation { row: usize, column: usize, id: usize },
    #[error(transparent)]
    Formula(#[from] solver::Error),
}

/// A set of pieces together with the board they have to fill
#[derive(Clone, Debug)]
pub struct Game {
    pieces: Vec<Piece>,
    initial: Board,
    colors: Vec<Color>,
}

impl Game {
    /// `initial` fixes some cells in advance, holding pieces of the set in
    /// any rotation
    pub fn new(pieces: Vec<Piece>, initial: Board) -> Result<Game, Eternity2Error> {
        let (rows, columns) = (initial.rows(), initial.columns());
        if rows * columns != pieces.len() {
            return Err(Eternity2Error::InconsistentPieceCount{
                rows,
                columns,
                expected: rows * columns,
                found: pieces.len(),
            });
        }
        if let Some((index, piece)) = pieces.iter().enumerate().find(|(index, piece)| piece.id != *index) {
            return Err(Eternity2Error::MisnumberedPiece{index, id: piece.id});
        }
        for ((row, column), placed) in initial.placed() {
            let original = pieces.get(placed.id)
                .ok_or(Eternity2Error::UnknownPiece{row, column, id: placed.id})?;
            if original.rotation_to(placed).is_none() {
                return Err(Eternity2Error::NotARotation{row, column, id: placed.id});
            }
        }

        let colors = sat_conversion::distinct_colors(&pieces);
        Ok(Game{pieces, initial, colors})
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn initial(&self) -> &Board {
        &self.initial
    }

    pub fn rows(&self) -> usize {
        self.initial.rows()
    }

    pub fn columns(&self) -> usize {
        self.initial.columns()
    }

    /// Distinct colours of the set, ascending
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

/// A game together with its CNF encoding
pub struct Eternity2 {
    game: Game,
    variables: Variables,
    problem: Problem,
}

impl Eternity2 {
    pub fn new(pieces: Vec<Piece>, initial: Board) -> Result<Eternity2, Eternity2Error> {
        let game = Game::new(pieces, initial)?;
        let variables = Variables::new(&game)?;
        let problem = sat_conversion::to_formula(&game, &variables);
        Ok(Eternity2{game, variables, problem})
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    /// Every solution, found with [`solver::solve`]
    pub fn solutions(&self) -> impl Iterator<Item=Board> + '_ {
        solver::solve(self.problem.clone())
            .map(move |assignment| sat_conversion::board_from(&self.game, &self.variables, &assignment))
    }

    /// Solutions in the order `solver` enumerates them, decoded lazily
    pub fn solutions_using<'a>(&'a self, solver: &'a dyn Solver) -> impl Iterator<Item=Board> + 'a {
        solver.solve(self.problem.clone())
            .map(move |assignment| sat_conversion::board_from(&self.game, &self.variables, &assignment))
    }
}

impl fmt::Display for Eternity2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.game.initial)
    }
}
