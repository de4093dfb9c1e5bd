use std::sync::mpsc;
use std::sync::mpsc::RecvTimeoutError;
use std::thread;
use instant::{Duration, Instant};
use log::{info, warn};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::corpus::Corpus;
use crate::error::BatchError;
use crate::grid::Grid;
use crate::solver::{Solver, SolverConfig};

/// How many words from the front of each shuffled list get recorded alongside an attempt's
/// result, which is usually enough to tell runs apart.
pub const STARTING_WORD_COUNT: usize = 10;

/// Settings shared by every attempt in a batch.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// The grid each attempt starts from.
    pub grid: Grid,

    /// How long we'll wait for a single attempt before giving up on it.
    pub timeout: Duration,

    /// Shuffle the word list before each attempt. Without this every attempt sees the same order
    /// and will produce the same result.
    pub shuffle: bool,

    /// Print each attempt's in-progress grid to stderr as it searches.
    pub progress: bool,

    pub solver: SolverConfig,
}

/// The outcome of one attempt, in the form we write out to disk. The JSON keys (`Result`,
/// `StartingWords`, `Success`, `Time`) are the ones existing result-analysis scripts read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AttemptResult {
    #[serde(rename = "Result")]
    pub grid: Option<Vec<String>>,
    pub starting_words: Vec<String>,
    pub success: bool,
    #[serde(rename = "Time")]
    pub seconds: f64,
}

/// Run `job` on its own thread and wait up to `timeout` for its result. If the deadline passes
/// the thread is abandoned, not stopped: it keeps running in the background and its result is
/// thrown away whenever it arrives.
pub fn run_with_timeout<T, F>(timeout: Duration, job: F) -> Result<Option<T>, BatchError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static
{
    let (sender, receiver) = mpsc::channel();

    thread::spawn(move || {
        // The receiver is gone if we've already timed out, in which case nobody cares.
        let _ = sender.send(job());
    });

    match receiver.recv_timeout(timeout) {
        Ok(result) => Ok(Some(result)),
        Err(RecvTimeoutError::Timeout) => Ok(None),
        Err(RecvTimeoutError::Disconnected) => Err(BatchError::Disconnected),
    }
}

/// Return a shuffled copy of the word list.
pub fn shuffled<R: Rng + ?Sized>(words: &[String], rng: &mut R) -> Vec<String> {
    let mut words = words.to_vec();
    words.shuffle(rng);
    words
}

/// Make a single attempt at filling the configured grid using the words in the given order. Each
/// attempt gets its own corpus, so no pattern cache is shared between attempts.
pub fn run_attempt(words: Vec<String>, config: &BatchConfig) -> Result<AttemptResult, BatchError> {
    let starting_words: Vec<String> = words.iter().take(STARTING_WORD_COUNT).cloned().collect();
    let grid = config.grid.clone();
    let solver_config = config.solver.clone();
    let progress = config.progress;

    let start = Instant::now();
    let outcome = run_with_timeout(config.timeout, move || {
        let mut solver = Solver::with_config(Corpus::new(words), solver_config);
        if progress {
            solver.set_listener(|puzzle| eprintln!("{}\n", puzzle.grid()));
        }

        solver.solve_grid(grid)
    })?;
    let seconds = start.elapsed().as_secs_f64();

    let grid = match outcome {
        Some(result) => result?.map(|success| {
            info!("Success in {:.3} seconds: {:?}", seconds, success.statistics);
            success.puzzle.grid().rows()
        }),
        None => {
            warn!("Timed out after {:.3} seconds", seconds);
            None
        }
    };

    Ok(AttemptResult {
        success: grid.is_some(),
        grid,
        starting_words,
        seconds,
    })
}

/// Run `attempts` independent attempts one after another, shuffling the word list for each one if
/// the config asks for it.
pub fn run_batch<R: Rng + ?Sized>(
    words: &[String],
    config: &BatchConfig,
    attempts: usize,
    rng: &mut R,
) -> Result<Vec<AttemptResult>, BatchError> {
    let mut results = Vec::with_capacity(attempts);

    for attempt in 0..attempts {
        let words = if config.shuffle { shuffled(words, rng) } else { words.to_vec() };
        info!(
            "Attempt {}: first words {:?}",
            attempt,
            &words[..words.len().min(STARTING_WORD_COUNT)],
        );

        results.push(run_attempt(words, config)?);
    }

    Ok(results)
}
