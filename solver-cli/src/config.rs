use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Dimacs,
    Sudoku,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Algorithm {
    Recursive,
    Iterative,
    Parallel,
}

pub struct Config {
    pub input:       Option<PathBuf>,
    pub output:      Option<PathBuf>,
    pub format:      Format,
    pub algorithm:   Algorithm,
    /// Stop after this many solutions; `None` enumerates all of them
    pub limit:       Option<usize>,
    pub complete:    bool,
    pub return_code: bool,
}

impl Config {
    /// `--first` on the parallel search asks for any model instead of the
    /// first one in enumeration order
    pub fn wants_any(&self) -> bool {
        self.algorithm == Algorithm::Parallel && self.limit == Some(1)
    }
}
