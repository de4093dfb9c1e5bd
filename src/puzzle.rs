use crate::error::PlacementError;
use crate::grid::{Cell, Grid, Slot};

/// A record of a word occupying a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub slot: Slot,
    pub word: String,
}

/// A partial solution: the grid as it stands plus every assignment made so far, in the order
/// they were made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    grid: Grid,
    assignments: Vec<Assignment>,
}

impl Puzzle {
    pub fn new(grid: Grid) -> Puzzle {
        Puzzle { grid, assignments: vec![] }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// The words placed so far, in placement order.
    pub fn words(&self) -> impl Iterator<Item=&str> {
        self.assignments.iter().map(|assignment| assignment.word.as_str())
    }

    pub fn is_word_used(&self, word: &str) -> bool {
        self.assignments.iter().any(|assignment| assignment.word == word)
    }

    pub fn is_slot_used(&self, slot: &Slot) -> bool {
        self.assignments.iter().any(|assignment| assignment.slot == *slot)
    }

    /// Is every slot in the grid holding a full set of letters?
    pub fn is_complete(&self) -> bool {
        self.grid.is_filled()
    }

    /// Write a word into a slot and block off the cells on either side of it, since a word's ends
    /// terminate the run it sits in. This modifies the puzzle in place; clone it first to keep the
    /// previous state around. If a letter write fails partway through, the grid is left
    /// partially written.
    pub fn embed(&mut self, slot: Slot, word: &str) -> Result<(), PlacementError> {
        if self.is_word_used(word) {
            return Err(PlacementError::AlreadyUsed(word.to_string()));
        }

        let length = word.chars().count();
        if length != slot.length {
            return Err(PlacementError::LengthMismatch {
                word: word.to_string(),
                expected: slot.length,
                actual: length,
            });
        }

        for ((row, col), letter) in slot.cell_coords().zip(word.chars()) {
            self.grid.set(row, col, Cell::Letter(letter))?;
        }

        for (row, col) in [slot.before(), slot.after()] {
            if self.grid.is_valid(row, col) {
                self.grid.set(row as usize, col as usize, Cell::Blocked)?;
            }
        }

        self.assignments.push(Assignment { slot, word: word.to_string() });

        Ok(())
    }
}
