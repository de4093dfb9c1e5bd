use thiserror::Error;

use crate::grid::Cell;

/// A contract violation raised while writing into a grid or recording an assignment. The solver
/// validates every placement before making it, so seeing one of these means there's a bug
/// somewhere, not that the puzzle is unsolvable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("invalid placement: out of bounds, got coords ({row}, {col}) but dimensions are {width}x{height}")]
    OutOfBounds {
        row: usize,
        col: usize,
        width: usize,
        height: usize,
    },

    #[error("invalid placement: cannot write {value} at ({row}, {col}), cell already holds {existing}")]
    Conflict {
        row: usize,
        col: usize,
        existing: Cell,
        value: Cell,
    },

    #[error("word {0:?} is already embedded")]
    AlreadyUsed(String),

    #[error("word {word:?} has length {actual} but its slot has length {expected}")]
    LengthMismatch {
        word: String,
        expected: usize,
        actual: usize,
    },
}

/// A problem with a text grid template passed to `Grid::from_str`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template has no rows")]
    Empty,

    #[error("template line {line} has {actual} cells, expected {expected}")]
    RaggedLine {
        line: usize,
        expected: usize,
        actual: usize,
    },
}

/// Anything that aborts a solve. Running out of options is *not* one of these; the solver reports
/// that as `Ok(None)`.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error("failed to compile pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Failures from running a batch of independent solve attempts.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error("solver thread exited without reporting a result")]
    Disconnected,
}
