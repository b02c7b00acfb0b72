//! Run configuration and the command-line surface of the `bitsieve` binary.

use crate::error::Result;
use crate::sieve::{isqrt, BitSieve};

/// Bound used when none is given on the command line.
pub const DEFAULT_BOUND: usize = 1_000_000_000;

/// How far the outer marking loop runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OuterLimit {
    /// Every candidate up to `bound - 1`. Past √bound the inner loop only
    /// re-marks multiples that smaller factors already covered.
    #[default]
    Full,
    /// Stop once `n * n > bound`. Same bit array, less work.
    SquareRoot,
}

impl OuterLimit {
    /// Exclusive end of the outer loop for `bound`.
    pub fn outer_end(self, bound: usize) -> usize {
        match self {
            OuterLimit::Full => bound,
            OuterLimit::SquareRoot => (isqrt(bound as u64) as usize + 1).min(bound),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SieveConfig {
    pub bound: usize,
    /// `None` runs sequentially.
    pub workers: Option<usize>,
    pub outer_limit: OuterLimit,
}

impl Default for SieveConfig {
    fn default() -> Self {
        Self {
            bound: DEFAULT_BOUND,
            workers: None,
            outer_limit: OuterLimit::Full,
        }
    }
}

impl SieveConfig {
    pub fn new(bound: usize) -> Self {
        Self {
            bound,
            ..Self::default()
        }
    }

    pub fn run(&self) -> Result<BitSieve> {
        match self.workers {
            Some(workers) => BitSieve::run_parallel(self.bound, workers, self.outer_limit),
            None => BitSieve::run_with(self.bound, self.outer_limit),
        }
    }
}

// ─── CLI ───────────────────────────────────────────────────────────────────

fn parse_bound(s: &str) -> std::result::Result<usize, String> {
    let bound: usize = s
        .replace('_', "")
        .parse()
        .map_err(|e| format!("bound must be a positive integer: {}", e))?;
    if bound < 2 {
        return Err(format!("bound must be greater than 1, got {}", bound));
    }
    Ok(bound)
}

fn parse_workers(s: &str) -> std::result::Result<usize, String> {
    let workers: usize = s
        .parse()
        .map_err(|e| format!("worker count must be a positive integer: {}", e))?;
    if workers == 0 {
        return Err("worker count must be at least 1".to_string());
    }
    Ok(workers)
}

#[derive(Debug, clap::Parser)]
#[clap(
    name = "bitsieve",
    version,
    about = "Count the primes below a bound with a bit-packed Sieve of Eratosthenes"
)]
pub struct Cli {
    /// Exclusive upper bound; underscores are allowed as digit separators
    #[arg(value_name = "BOUND", default_value_t = DEFAULT_BOUND, value_parser = parse_bound)]
    pub bound: usize,

    /// Mark composites with this many workers, each taking every N-th candidate
    #[arg(long, short = 'w', value_name = "N", value_parser = parse_workers)]
    pub workers: Option<usize>,

    /// Stop the outer loop at the square root of the bound
    #[arg(long)]
    pub sqrt_cutoff: bool,
}

impl From<&Cli> for SieveConfig {
    fn from(cli: &Cli) -> Self {
        Self {
            bound: cli.bound,
            workers: cli.workers,
            outer_limit: if cli.sqrt_cutoff {
                OuterLimit::SquareRoot
            } else {
                OuterLimit::Full
            },
        }
    }
}
