use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Side length of the board
pub const SIZE: usize = 9;
/// Side length of a box
pub const BOX_SIZE: usize = 3;

/// Coordinates of a cell, `(row, column)`
pub type CellPlace = (usize, usize);

/// Reasons a textual grid is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridParserError {
    /// Anything but digits, `.` and whitespace.
    #[error("Encountered an invalid character {0:?}.")]
    InvalidCharacter(char),
    /// There are less or more than 81 cells.
    #[error("Expected 81 cells but found {0}.")]
    WrongNumberOfCells(usize),
}

/// A 9x9 board. 0 marks a blank cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [[u8; SIZE]; SIZE],
}

impl Grid {
    pub fn new(cells: [[u8; SIZE]; SIZE]) -> Grid {
        Grid{cells}
    }

    pub fn get_cell(&self, row: usize, column: usize) -> u8 {
        self.cells[row][column]
    }

    pub fn get_cell_mut(&mut self, row: usize, column: usize) -> &mut u8 {
        &mut self.cells[row][column]
    }

    pub fn rows(&self) -> &[[u8; SIZE]; SIZE] {
        &self.cells
    }

    /// Cells holding a digit, row by row
    pub fn givens(&self) -> impl Iterator<Item=(CellPlace, u8)> + '_ {
        self.cells.iter()
            .enumerate()
            .flat_map(|(row, line)| line.iter()
                .enumerate()
                .filter(|(_, value)| **value != 0)
                .map(move |(column, value)| ((row, column), *value)))
    }

    pub fn is_complete(&self) -> bool {
        self.cells.iter().flatten().all(|&value| value != 0)
    }

    /// Checks that no digit repeats within a row, column or box.
    /// Blank cells are ignored.
    pub fn is_consistent(&self) -> bool {
        let units = (0..SIZE).map(|row| (0..SIZE).map(|column| (row, column)).collect::<Vec<_>>())
            .chain((0..SIZE).map(|column| (0..SIZE).map(|row| (row, column)).collect()))
            .chain((0..SIZE).map(|b| {
                let (top, left) = (b / BOX_SIZE * BOX_SIZE, b % BOX_SIZE * BOX_SIZE);
                (0..SIZE).map(|i| (top + i / BOX_SIZE, left + i % BOX_SIZE)).collect()
            }));

        units.into_iter().all(|unit: Vec<CellPlace>| {
            let mut seen = [false; SIZE + 1];
            unit.iter().all(|&(row, column)| {
                let value = self.cells[row][column] as usize;
                if value == 0 {
                    return true;
                }
                if value > SIZE {
                    return false;
                }
                !std::mem::replace(&mut seen[value], true)
            })
        })
    }
}

impl FromStr for Grid {
    type Err = GridParserError;

    /// Reads 81 cells row by row. Digits `1`-`9` are givens, `0` and `.` are
    /// blanks, whitespace is skipped.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let values = input.chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| match c {
                '.' => Ok(0),
                '0'..='9' => Ok(c as u8 - b'0'),
                _ => Err(GridParserError::InvalidCharacter(c)),
            })
            .collect::<Result<Vec<u8>, _>>()?;

        if values.len() != SIZE * SIZE {
            return Err(GridParserError::WrongNumberOfCells(values.len()));
        }

        let mut grid = Grid::default();
        for (index, value) in values.into_iter().enumerate() {
            *grid.get_cell_mut(index / SIZE, index % SIZE) = value;
        }
        Ok(grid)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.cells {
            let line: Vec<String> = line.iter()
                .map(|&value| if value == 0 { ".".to_string() } else { value.to_string() })
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
