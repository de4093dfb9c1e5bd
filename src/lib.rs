//! Fill a rectangular crossword grid from a word list.
//!
//! The search works on "slots" (maximal runs of open cells). At each step it picks the slot with
//! the fewest candidate words, tries each candidate at each offset where it fits, and after every
//! placement splits whatever is still open into groups of slots that no longer share any cells,
//! solving each group independently.

pub mod batch;
pub mod corpus;
pub mod error;
pub mod graph;
pub mod grid;
pub mod puzzle;
pub mod solver;
pub mod wordlist;

pub use corpus::{Corpus, Pattern, WordId};
pub use error::{BatchError, PlacementError, SolverError, TemplateError};
pub use graph::IntersectionGraph;
pub use grid::{Cell, Direction, Grid, Slot};
pub use puzzle::{Assignment, Puzzle};
pub use solver::{FillSuccess, Solver, SolverConfig, Statistics};

/// The expected maximum length for a single slot.
pub const MAX_SLOT_LENGTH: usize = 21;

/// How many candidate words we'll try for a single slot before moving on. Slots with very few
/// letters in place can match a large share of the word list, and trying all of them would make
/// the search far too wide.
pub const MAX_CANDIDATES: usize = 100;

/// How many recursive calls go by between invocations of the solver's listener.
pub const LISTENER_INTERVAL: u64 = 2_000;
