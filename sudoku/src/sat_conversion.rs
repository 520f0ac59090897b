use itertools::iproduct;
use rayon::prelude::*;

use solver::constraints::exactly_one;
use solver::{Assignment, Clause, Literal, Problem};

use crate::grid::{CellPlace, Grid, BOX_SIZE, SIZE};

/// Number of propositional variables: one per cell and digit
pub const NUM_VARIABLES: usize = SIZE * SIZE * SIZE;

/// Literals asserting "digit `value` at `(row, column)`", indexed by
/// `row * 81 + column * 9 + value - 1`
pub struct Variables {
    literals: Vec<Literal>,
}

impl Variables {
    pub fn new() -> Result<Variables, solver::Error> {
        let literals = (1..=NUM_VARIABLES as u32)
            .map(Literal::pos)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Variables{literals})
    }

    /// `value` must lie in `1..=9`
    pub fn get(&self, (row, column): CellPlace, value: u8) -> Literal {
        self.literals[row * SIZE * SIZE + column * SIZE + value as usize - 1]
    }
}

/// Reverses the variable numbering: `(cell, digit)` asserted by a positive
/// literal, `None` for negative or foreign literals
pub fn decode(literal: Literal) -> Option<(CellPlace, u8)> {
    let var = literal.var() as usize;
    if !literal.is_positive() || var > NUM_VARIABLES {
        return None;
    }
    let index = var - 1;
    let value = (index % SIZE) as u8 + 1;
    let column = (index / SIZE) % SIZE;
    let row = index / (SIZE * SIZE);
    Some(((row, column), value))
}

/// Compiles the puzzle to CNF. The rules come first (rows, columns, boxes,
/// cells), then one unit clause per given digit.
pub fn to_formula(grid: &Grid, variables: &Variables) -> Problem {
    let ((rows, columns), (boxes, cells)) = rayon::join(
        || {
            rayon::join(
                || make_unit_constraints(variables, |row, i| (row, i)),
                || make_unit_constraints(variables, |column, i| (i, column)),
            )
        },
        || {
            rayon::join(
                || make_unit_constraints(variables, |b, i| {
                    (b / BOX_SIZE * BOX_SIZE + i / BOX_SIZE, b % BOX_SIZE * BOX_SIZE + i % BOX_SIZE)
                }),
                || make_cell_constraints(variables),
            )
        },
    );

    let mut total = Problem::empty();
    total.extend(rows);
    total.extend(columns);
    total.extend(boxes);
    total.extend(cells);
    total.extend(grid.givens().map(|(place, value)| Clause::single(variables.get(place, value))));
    total
}

/// Every digit occurs exactly once in each of the nine units. `cell` maps a
/// unit number and a position within the unit to a cell.
fn make_unit_constraints<F>(variables: &Variables, cell: F) -> Problem
where F: Fn(usize, usize) -> CellPlace + Sync {
    iproduct!(0..SIZE, 1..=SIZE as u8)
        .collect::<Vec<_>>()
        .into_par_iter()
        .flat_map(|(unit, value)| {
            let literals: Vec<Literal> = (0..SIZE)
                .map(|i| variables.get(cell(unit, i), value))
                .collect();
            exactly_one(&literals)
        })
        .collect()
}

/// Every cell holds exactly one digit
fn make_cell_constraints(variables: &Variables) -> Problem {
    iproduct!(0..SIZE, 0..SIZE)
        .collect::<Vec<_>>()
        .into_par_iter()
        .flat_map(|place| {
            let literals: Vec<Literal> = (1..=SIZE as u8)
                .map(|value| variables.get(place, value))
                .collect();
            exactly_one(&literals)
        })
        .collect()
}

/// Fills the grid with every digit asserted by the assignment
pub fn grid_from(assignment: &Assignment) -> Grid {
    let mut grid = Grid::default();
    for ((row, column), value) in assignment.literals().iter().filter_map(|&literal| decode(literal)) {
        *grid.get_cell_mut(row, column) = value;
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbering_round_trip() {
        let variables = Variables::new().unwrap();
        assert_eq!(variables.get((0, 0), 1).value(), 1);
        assert_eq!(variables.get((0, 1), 1).value(), 10);
        assert_eq!(variables.get((8, 8), 9).value(), 729);
        for &(place, value) in &[((0, 0), 1), ((3, 7), 5), ((8, 8), 9)] {
            assert_eq!(decode(variables.get(place, value)), Some((place, value)));
            assert_eq!(decode(variables.get(place, value).negated()), None);
        }
    }

    #[test]
    fn formula_size() {
        let variables = Variables::new().unwrap();
        let mut grid = Grid::default();
        *grid.get_cell_mut(4, 4) = 7;
        let formula = to_formula(&grid, &variables);
        // 4 groups of 81 exactly-one constraints over 9 literals, plus a given
        assert_eq!(formula.len(), 4 * 81 * (36 + 1) + 1);
        assert_eq!(formula.num_variables(), NUM_VARIABLES);
        assert_eq!(formula.clauses().last(), Some(&Clause::single(variables.get((4, 4), 7))));
    }
}
