use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use clap::Parser;
use instant::Duration;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crossfill::batch::{run_batch, AttemptResult, BatchConfig};
use crossfill::wordlist::parse_word_list;
use crossfill::{BatchError, Grid, SolverConfig, TemplateError, LISTENER_INTERVAL, MAX_CANDIDATES};

/// Fill crossword grids from a word list.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Opts {
    /// Word list: a JSON array of strings, or one word per line.
    #[arg(short, long)]
    words: PathBuf,

    #[arg(long, default_value_t = 6)]
    width: usize,

    #[arg(long, default_value_t = 6)]
    height: usize,

    /// Grid template (. for empty cells, # for blocks, letters for themselves). Overrides
    /// --width and --height.
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Number of attempts per batch.
    #[arg(short, long, default_value_t = 1)]
    attempts: usize,

    /// Number of batches. Each batch gets its own results file.
    #[arg(short, long, default_value_t = 1)]
    batches: usize,

    /// Seconds to wait for a single attempt before abandoning it.
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Seed for shuffling the word list, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Use the word list in the order given instead of shuffling it.
    #[arg(long)]
    no_shuffle: bool,

    /// Maximum number of candidate words tried per slot.
    #[arg(long, default_value_t = MAX_CANDIDATES)]
    max_candidates: usize,

    /// Print the in-progress grid to stderr every few thousand steps.
    #[arg(long)]
    progress: bool,

    /// Directory to write JSON results into.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum RunError {
    #[error("couldn't read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("couldn't parse word list: {0}")]
    WordList(#[from] serde_json::Error),

    #[error("bad grid template: {0}")]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Batch(#[from] BatchError),
}

fn read_file(path: &Path) -> Result<String, RunError> {
    fs::read_to_string(path).map_err(|source| RunError::Read { path: path.to_path_buf(), source })
}

fn load_grid(opts: &Opts) -> Result<Grid, RunError> {
    match &opts.template {
        Some(path) => Ok(read_file(path)?.parse()?),
        None => Ok(Grid::new(opts.width, opts.height)),
    }
}

fn print_result(batch: usize, attempt: usize, result: &AttemptResult) {
    println!("Iteration {}-{}:\nFirst words: {:?}", batch, attempt, result.starting_words);

    match &result.grid {
        Some(rows) => println!("Success in {:.3} seconds:\n{}\n", result.seconds, rows.join("\n")),
        None => println!("No fill found after {:.3} seconds.\n", result.seconds),
    }
}

fn write_results(dir: &Path, run_id: u32, batch: usize, results: &[AttemptResult]) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(dir)?;

    let path = dir.join(format!("result-{}-{}.json", run_id, batch));
    fs::write(&path, serde_json::to_string_pretty(results)?)?;
    info!("Wrote {} results to {}", results.len(), path.display());

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let opts = Opts::parse();
    debug!("Command line options: {:?}", opts);

    let words = parse_word_list(&read_file(&opts.words)?).map_err(RunError::from)?;
    println!("Read {} words", words.len());

    let config = BatchConfig {
        grid: load_grid(&opts)?,
        timeout: Duration::from_secs(opts.timeout),
        shuffle: !opts.no_shuffle,
        progress: opts.progress,
        solver: SolverConfig {
            max_candidates: opts.max_candidates,
            listener_interval: LISTENER_INTERVAL,
        },
    };

    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let run_id: u32 = rng.gen_range(0..100_000);

    for batch in 0..opts.batches {
        let results = run_batch(&words, &config, opts.attempts, &mut rng).map_err(RunError::from)?;

        for (attempt, result) in results.iter().enumerate() {
            print_result(batch, attempt, result);
        }

        if let Some(dir) = &opts.output {
            write_results(dir, run_id, batch, &results)?;
        }
    }

    Ok(())
}
