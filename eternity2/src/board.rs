use std::fmt;

use crate::piece::{Border, Piece};

/// Coordinates of a cell, `(row, column)`
pub type CellPlace = (usize, usize);

/// Rectangular board of optionally placed, already rotated pieces
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    rows: usize,
    columns: usize,
    cells: Vec<Option<Piece>>,
}

impl Board {
    pub fn empty(rows: usize, columns: usize) -> Board {
        Board{rows, columns, cells: vec![None; rows * columns]}
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn get(&self, (row, column): CellPlace) -> Option<&Piece> {
        if row >= self.rows || column >= self.columns {
            return None;
        }
        self.cells[row * self.columns + column].as_ref()
    }

    /// Puts `piece` at `place`, returning the piece it replaces.
    /// Panics if `place` lies outside the board.
    pub fn place(&mut self, (row, column): CellPlace, piece: Piece) -> Option<Piece> {
        assert!(row < self.rows && column < self.columns, "({}, {}) is outside the board", row, column);
        self.cells[row * self.columns + column].replace(piece)
    }

    /// Occupied cells, row by row
    pub fn placed(&self) -> impl Iterator<Item=(CellPlace, &Piece)> + '_ {
        let columns = self.columns;
        self.cells.iter()
            .enumerate()
            .filter_map(move |(index, cell)| cell.as_ref().map(|piece| ((index / columns, index % columns), piece)))
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Checks that touching sides of neighbouring pieces share a colour.
    /// Empty cells match anything.
    pub fn is_consistent(&self) -> bool {
        self.placed().all(|((row, column), piece)| {
            let east = self.get((row, column + 1))
                .map_or(true, |right| right.color_to(Border::West) == piece.color_to(Border::East));
            let south = self.get((row + 1, column))
                .map_or(true, |below| below.color_to(Border::North) == piece.color_to(Border::South));
            east && south
        })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.cells.chunks(self.columns.max(1)) {
            let line: Vec<String> = line.iter()
                .map(|cell| cell.map_or_else(|| ".".to_string(), |piece| piece.to_string()))
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consistency_checks_touching_sides() {
        let mut board = Board::empty(1, 2);
        board.place((0, 0), Piece::new(0, 9, 1, 9, 9));
        assert!(board.is_consistent());
        assert!(!board.is_complete());

        board.place((0, 1), Piece::new(1, 9, 9, 9, 2));
        assert!(!board.is_consistent());
        board.place((0, 1), Piece::new(1, 9, 9, 9, 1));
        assert!(board.is_consistent());
        assert!(board.is_complete());
        assert_eq!(board.placed().count(), 2);
    }
}
