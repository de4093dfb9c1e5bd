use instant::{Duration, Instant};
use log::{debug, trace};
use smallvec::SmallVec;

use crate::corpus::{Corpus, Pattern, WordId};
use crate::error::SolverError;
use crate::graph::IntersectionGraph;
use crate::grid::{Cell, Grid, Slot};
use crate::puzzle::Puzzle;
use crate::{LISTENER_INTERVAL, MAX_CANDIDATES, MAX_SLOT_LENGTH};

/// Tunable knobs for a solve.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// How many candidates we'll try for any one slot before giving up on it. Candidates beyond
    /// this are never tried, so raising it can turn up fills that would otherwise be missed.
    pub max_candidates: usize,

    /// The listener (if any) is called once every this many recursive calls. Zero disables it.
    pub listener_interval: u64,
}

impl Default for SolverConfig {
    fn default() -> SolverConfig {
        SolverConfig {
            max_candidates: MAX_CANDIDATES,
            listener_interval: LISTENER_INTERVAL,
        }
    }
}

/// A struct tracking statistics about the filling process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub calls: u64,
    pub placements: u64,
    pub dead_ends: u64,
    pub cached_patterns: usize,
    pub duration: Duration,
}

/// A struct representing the results of a successful fill.
#[derive(Debug)]
pub struct FillSuccess {
    pub statistics: Statistics,
    pub puzzle: Puzzle,
}

/// A callback used to watch the search as it runs. It only ever sees a shared reference to the
/// in-progress puzzle, so it can't steer the search.
pub type Listener<'a> = Box<dyn FnMut(&Puzzle) + 'a>;

/// Recursive backtracking search over slot assignments. After every placement the remaining open
/// slots are split into independent groups (slots that share no cells), and each group is solved
/// on its own.
pub struct Solver<'a> {
    corpus: Corpus,
    config: SolverConfig,
    listener: Option<Listener<'a>>,
    statistics: Statistics,
}

impl<'a> Solver<'a> {
    pub fn new(corpus: Corpus) -> Solver<'a> {
        Solver::with_config(corpus, SolverConfig::default())
    }

    pub fn with_config(corpus: Corpus, config: SolverConfig) -> Solver<'a> {
        Solver {
            corpus,
            config,
            listener: None,
            statistics: Statistics::default(),
        }
    }

    /// Install a callback that will be handed the current puzzle every `listener_interval` calls.
    pub fn set_listener<F>(&mut self, listener: F)
        where
            F: FnMut(&Puzzle) + 'a
    {
        self.listener = Some(Box::new(listener));
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    pub fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// Search for a fill of an empty `width` x `height` grid. `Ok(None)` means the search ran out
    /// of options.
    pub fn solve(&mut self, width: usize, height: usize) -> Result<Option<FillSuccess>, SolverError> {
        self.solve_grid(Grid::new(width, height))
    }

    /// Search for a fill of the given grid, keeping any blocks and letters it already has.
    pub fn solve_grid(&mut self, grid: Grid) -> Result<Option<FillSuccess>, SolverError> {
        let start = Instant::now();
        self.statistics = Statistics::default();

        let open_slots = grid.all_slots();
        debug!(
            "Solving {}x{} grid with {} slots and {} words",
            grid.width(),
            grid.height(),
            open_slots.len(),
            self.corpus.len(),
        );

        let result = self.fill(Puzzle::new(grid), open_slots)?;

        self.statistics.cached_patterns = self.corpus.cached_pattern_count();
        self.statistics.duration = start.elapsed();
        debug!("Finished with success = {}: {:?}", result.is_some(), self.statistics);

        Ok(result.map(|puzzle| FillSuccess {
            statistics: self.statistics.clone(),
            puzzle,
        }))
    }

    fn notify(&mut self, puzzle: &Puzzle) {
        let interval = self.config.listener_interval;

        if let Some(listener) = self.listener.as_mut() {
            if interval > 0 && self.statistics.calls % interval == 0 {
                listener(puzzle);
            }
        }
    }

    /// Every unused word that could go somewhere in this slot, in corpus order.
    fn candidates(&mut self, puzzle: &Puzzle, slot: &Slot) -> Result<Vec<WordId>, SolverError> {
        let pattern = Pattern::permissive(&puzzle.grid().read(slot)?);
        let matches = self.corpus.filter(&pattern)?.to_vec();

        Ok(matches.into_iter().filter(|&word_id| !puzzle.is_word_used(self.corpus.word(word_id))).collect())
    }

    /// Offsets within the slot where the word could start: the cells just outside the word mustn't
    /// hold letters, and the word has to agree with every letter already inside its span.
    fn valid_offsets(
        &mut self,
        grid: &Grid,
        slot: &Slot,
        word: &str,
    ) -> Result<SmallVec<[usize; MAX_SLOT_LENGTH]>, SolverError> {
        let length = word.chars().count();
        let mut offsets = SmallVec::new();

        if length > slot.length {
            return Ok(offsets);
        }

        for offset in 0..=slot.length - length {
            let sub_slot = slot.sub_slot(offset, offset + length);

            let touches_letter = [sub_slot.before(), sub_slot.after()].iter().any(|&(row, col)| {
                matches!(grid.get_signed(row, col), Some(Cell::Letter(_)))
            });
            if touches_letter {
                continue;
            }

            if self.corpus.matches(&Pattern::exact(&grid.read(&sub_slot)?), word)? {
                offsets.push(offset);
            }
        }

        Ok(offsets)
    }

    /// Try to fill every slot in `open_slots`, starting from `puzzle`. Returns the completed
    /// puzzle, or `None` if every option at this level leads to a dead end.
    fn fill(&mut self, puzzle: Puzzle, open_slots: Vec<Slot>) -> Result<Option<Puzzle>, SolverError> {
        self.statistics.calls += 1;
        self.notify(&puzzle);

        if open_slots.is_empty() {
            return Ok(Some(puzzle));
        }

        // If any slot has nothing left that could go in it, this branch can't work out.
        let mut options: Vec<(Slot, Vec<WordId>)> = Vec::with_capacity(open_slots.len());
        for &slot in &open_slots {
            let candidates = self.candidates(&puzzle, &slot)?;

            if candidates.is_empty() {
                trace!("No candidates for {:?}, backtracking", slot);
                self.statistics.dead_ends += 1;
                return Ok(None);
            }

            options.push((slot, candidates));
        }

        // Most constrained slot first. The sort is stable, so ties keep slot order.
        options.sort_by_key(|(_, candidates)| candidates.len());

        for (slot, candidates) in &options {
            for &word_id in candidates.iter().take(self.config.max_candidates) {
                let word = self.corpus.word(word_id).to_string();
                let length = word.chars().count();

                'offset_selection: for offset in self.valid_offsets(puzzle.grid(), slot, &word)? {
                    let sub_slot = slot.sub_slot(offset, offset + length);

                    let mut next = puzzle.clone();
                    next.embed(sub_slot, &word)?;
                    self.statistics.placements += 1;

                    // The new blocks at either end of the word may have split some of the open
                    // slots (including this one), so work out what's left to fill from scratch.
                    let mut next_open_slots = next.grid().slots_of(&open_slots)?;
                    next_open_slots.retain(|&open_slot| open_slot != sub_slot);

                    let mut components = IntersectionGraph::new(&next_open_slots).components();
                    components.sort_by_key(|component| component.len());

                    if components.len() > 1 {
                        trace!("Placing {:?} at {:?} split the grid into {} parts", word, sub_slot, components.len());
                    }

                    // The components don't share any cells, so each one can build on the grid
                    // left by the previous one.
                    let mut result = next;
                    for component in components {
                        match self.fill(result, component)? {
                            Some(filled) => result = filled,
                            None => continue 'offset_selection,
                        }
                    }

                    return Ok(Some(result));
                }
            }
        }

        self.statistics.dead_ends += 1;
        Ok(None)
    }
}
