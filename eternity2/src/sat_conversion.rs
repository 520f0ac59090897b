use std::convert::TryFrom;

use itertools::iproduct;
use rayon::prelude::*;

use solver::constraints::{at_most_one, equivalence, exactly_one, implication};
use solver::{Assignment, Clause, Literal, Problem, VarId};

use crate::board::{Board, CellPlace};
use crate::piece::{Border, Color, Piece, Rotation};
use crate::Game;

/// Propositional variables of a game.
///
/// The first block says "piece `p` sits at `(row, column)` turned by `r`",
/// indexed by `((row * columns + column) * pieces + p) * 4 + r`. The second
/// says "side `b` of the cell at `(row, column)` has colour `c`", indexed by
/// `((row * columns + column) * 4 + b) * colors + c` after the first block.
/// Colours are numbered by their rank among the distinct colours of the set.
pub struct Variables {
    columns: usize,
    pieces: usize,
    piece_variables: usize,
    colors: Vec<Color>,
    literals: Vec<Literal>,
}

impl Variables {
    pub fn new(game: &Game) -> Result<Variables, solver::Error> {
        let cells = game.rows() * game.columns();
        let pieces = game.pieces().len();
        let colors = game.colors().to_vec();
        let piece_variables = cells * pieces * Rotation::ALL.len();
        let total = piece_variables + cells * Border::ALL.len() * colors.len();
        let literals = (1..=total)
            .map(|var| {
                let var = VarId::try_from(var).map_err(|_| solver::Error::LiteralOutOfRange(var as i64))?;
                Literal::pos(var)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Variables{columns: game.columns(), pieces, piece_variables, colors, literals})
    }

    fn cell_index(&self, (row, column): CellPlace) -> usize {
        row * self.columns + column
    }

    pub fn piece(&self, place: CellPlace, piece: usize, rotation: Rotation) -> Literal {
        let index = (self.cell_index(place) * self.pieces + piece) * Rotation::ALL.len() + rotation.index();
        self.literals[index]
    }

    pub fn border(&self, place: CellPlace, border: Border, color: usize) -> Literal {
        let index = (self.cell_index(place) * Border::ALL.len() + border.index()) * self.colors.len() + color;
        self.literals[self.piece_variables + index]
    }

    /// Rank of `color` among the known colours
    pub fn color_index(&self, color: Color) -> Option<usize> {
        self.colors.binary_search(&color).ok()
    }

    pub fn num_colors(&self) -> usize {
        self.colors.len()
    }

    /// Reverses the numbering of piece variables: `(cell, piece, rotation)`
    /// for a positive piece literal, `None` for anything else
    pub fn decode(&self, literal: Literal) -> Option<(CellPlace, usize, Rotation)> {
        let var = literal.var() as usize;
        if !literal.is_positive() || var > self.piece_variables {
            return None;
        }
        let index = var - 1;
        let rotation = Rotation::from_index(index % Rotation::ALL.len())?;
        let piece = (index / Rotation::ALL.len()) % self.pieces;
        let cell = index / (Rotation::ALL.len() * self.pieces);
        Some(((cell / self.columns, cell % self.columns), piece, rotation))
    }
}

/// Compiles the game to CNF. Pieces fixed on the initial board come first as
/// unit clauses, followed by placement, adjacency and colouring rules.
pub fn to_formula(game: &Game, variables: &Variables) -> Problem {
    let fixed: Problem = game.initial()
        .placed()
        .filter_map(|(place, placed)| {
            let rotation = game.pieces()[placed.id].rotation_to(placed)?;
            Some(Clause::single(variables.piece(place, placed.id, rotation)))
        })
        .collect();

    let ((positions, pieces), (adjacency, (coloring, unique_colors))) = rayon::join(
        || {
            rayon::join(
                || make_position_constraints(game, variables),
                || make_piece_constraints(game, variables),
            )
        },
        || {
            rayon::join(
                || make_adjacency_constraints(game, variables),
                || {
                    rayon::join(
                        || make_coloring_constraints(game, variables),
                        || make_unique_color_constraints(game, variables),
                    )
                },
            )
        },
    );

    let mut total = fixed;
    total.extend(positions);
    total.extend(pieces);
    total.extend(adjacency);
    total.extend(coloring);
    total.extend(unique_colors);
    total
}

fn cells(game: &Game) -> Vec<CellPlace> {
    iproduct!(0..game.rows(), 0..game.columns()).collect()
}

/// Every cell holds exactly one piece in exactly one rotation
fn make_position_constraints(game: &Game, variables: &Variables) -> Problem {
    cells(game)
        .into_par_iter()
        .flat_map(|place| {
            let literals: Vec<Literal> = iproduct!(0..game.pieces().len(), Rotation::ALL.iter())
                .map(|(piece, &rotation)| variables.piece(place, piece, rotation))
                .collect();
            exactly_one(&literals)
        })
        .collect()
}

/// Every piece is used exactly once
fn make_piece_constraints(game: &Game, variables: &Variables) -> Problem {
    (0..game.pieces().len())
        .into_par_iter()
        .flat_map(|piece| {
            let literals: Vec<Literal> = iproduct!(cells(game), Rotation::ALL.iter())
                .map(|(place, &rotation)| variables.piece(place, piece, rotation))
                .collect();
            exactly_one(&literals)
        })
        .collect()
}

/// Touching sides of neighbouring cells carry the same colour
fn make_adjacency_constraints(game: &Game, variables: &Variables) -> Problem {
    let (rows, columns) = (game.rows(), game.columns());
    let horizontal = iproduct!(0..rows, 1..columns, 0..variables.num_colors())
        .flat_map(|(row, column, color)| equivalence(
            variables.border((row, column - 1), Border::East, color),
            variables.border((row, column), Border::West, color),
        ));
    let vertical = iproduct!(1..rows, 0..columns, 0..variables.num_colors())
        .flat_map(|(row, column, color)| equivalence(
            variables.border((row - 1, column), Border::South, color),
            variables.border((row, column), Border::North, color),
        ));
    horizontal.chain(vertical).collect()
}

/// A placed piece determines the colours on the sides of its cell
fn make_coloring_constraints(game: &Game, variables: &Variables) -> Problem {
    cells(game)
        .into_par_iter()
        .flat_map(|place| {
            let mut clauses = Vec::new();
            for (piece, &rotation) in iproduct!(game.pieces(), Rotation::ALL.iter()) {
                let placed = variables.piece(place, piece.id, rotation);
                let turned = piece.rotate(rotation);
                for &border in &Border::ALL {
                    if let Some(color) = variables.color_index(turned.color_to(border)) {
                        clauses.push(implication(placed, variables.border(place, border, color)));
                    }
                }
            }
            clauses
        })
        .collect()
}

/// Each side of a cell has at most one colour
fn make_unique_color_constraints(game: &Game, variables: &Variables) -> Problem {
    cells(game)
        .into_par_iter()
        .flat_map(|place| {
            Border::ALL.iter()
                .flat_map(|&border| {
                    let literals: Vec<Literal> = (0..variables.num_colors())
                        .map(|color| variables.border(place, border, color))
                        .collect();
                    at_most_one(&literals)
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Lays out every piece asserted by the assignment
pub fn board_from(game: &Game, variables: &Variables, assignment: &Assignment) -> Board {
    let mut board = Board::empty(game.rows(), game.columns());
    for (place, piece, rotation) in assignment.literals().iter().filter_map(|&literal| variables.decode(literal)) {
        board.place(place, game.pieces()[piece].rotate(rotation));
    }
    board
}

/// Colours present in a set of pieces, sorted and without duplicates
pub(crate) fn distinct_colors(pieces: &[Piece]) -> Vec<Color> {
    let mut colors: Vec<Color> = pieces.iter().flat_map(|piece| piece.colors().to_vec()).collect();
    colors.sort_unstable();
    colors.dedup();
    colors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Game {
        let pieces = vec![
            Piece::new(0, 1, 2, 3, 4),
            Piece::new(1, 4, 3, 2, 1),
        ];
        Game::new(pieces, Board::empty(1, 2)).unwrap()
    }

    #[test]
    fn numbering_round_trip() {
        let game = game();
        let variables = Variables::new(&game).unwrap();
        assert_eq!(variables.piece((0, 0), 0, Rotation::Plus0).value(), 1);
        assert_eq!(variables.piece((0, 1), 1, Rotation::Plus270).value(), 16);
        assert_eq!(variables.border((0, 0), Border::North, 0).value(), 17);
        assert_eq!(variables.border((0, 1), Border::West, 3).value(), 48);

        for &(place, piece, rotation) in &[((0, 0), 1, Rotation::Plus90), ((0, 1), 0, Rotation::Plus180)] {
            let literal = variables.piece(place, piece, rotation);
            assert_eq!(variables.decode(literal), Some((place, piece, rotation)));
            assert_eq!(variables.decode(literal.negated()), None);
        }
        assert_eq!(variables.decode(variables.border((0, 0), Border::East, 2)), None);
        assert_eq!(variables.color_index(3), Some(2));
        assert_eq!(variables.color_index(7), None);
    }

    #[test]
    fn formula_size() {
        let game = game();
        let variables = Variables::new(&game).unwrap();
        let formula = to_formula(&game, &variables);

        let exactly_one_of_8 = 28 + 1;
        let positions = 2 * exactly_one_of_8;
        let pieces = 2 * exactly_one_of_8;
        let adjacency = 4 * 2;
        let coloring = 2 * 2 * 4 * 4;
        let unique_colors = 2 * 4 * 6;
        assert_eq!(formula.len(), positions + pieces + adjacency + coloring + unique_colors);
        assert_eq!(formula.num_variables(), 48);
    }

    #[test]
    fn distinct_colors_are_sorted() {
        let pieces = [Piece::new(0, 5, 1, 5, 3), Piece::new(1, 3, 3, 9, 1)];
        assert_eq!(distinct_colors(&pieces), vec![1, 3, 5, 9]);
    }
}
