//! Benchmark machinery: bit sieve variants vs the `primal` and `primes` crates.

use crate::bits::words_for_bound;
use crate::config::OuterLimit;
use crate::error::Result;
use crate::report::{format_bytes, format_duration};
use crate::sieve::BitSieve;
use std::fmt;
use std::time::{Duration, Instant};

// ─── Contenders ────────────────────────────────────────────────────────────
//
// Each returns π(n - 1), the number of primes strictly below `n`.

pub fn bitsieve_count(n: usize) -> Result<usize> {
    Ok(BitSieve::run(n)?.count_primes())
}

pub fn bitsieve_sqrt_count(n: usize) -> Result<usize> {
    Ok(BitSieve::run_with(n, OuterLimit::SquareRoot)?.count_primes())
}

pub fn bitsieve_parallel_count(n: usize, workers: usize) -> Result<usize> {
    Ok(BitSieve::run_parallel(n, workers, OuterLimit::Full)?.count_primes())
}

pub fn primal_count(n: usize) -> Result<usize> {
    let sieve = primal::Sieve::new(n);
    Ok(sieve.primes_from(0).take_while(|&p| p < n).count())
}

pub fn primes_crate_count(n: usize) -> Result<usize> {
    use primes::{PrimeSet, Sieve};
    let mut sieve = Sieve::new();
    Ok(sieve.iter().take_while(|&p| p < n as u64).count())
}

/// Bytes held by the bit array for bound `n`.
pub fn bitsieve_bytes(n: usize) -> usize {
    words_for_bound(n) * std::mem::size_of::<u32>()
}

// ─── Measurement ───────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct BenchResult {
    pub name: String,
    pub n: usize,
    pub prime_count: usize,
    pub times: Vec<Duration>,
    pub sieve_bytes: usize,
}

impl BenchResult {
    pub fn median(&self) -> Duration {
        let mut sorted: Vec<Duration> = self.times.clone();
        sorted.sort();
        sorted.get(sorted.len() / 2).copied().unwrap_or_default()
    }

    pub fn min(&self) -> Duration {
        self.times.iter().min().copied().unwrap_or_default()
    }

    pub fn max(&self) -> Duration {
        self.times.iter().max().copied().unwrap_or_default()
    }

    pub fn mean(&self) -> Duration {
        if self.times.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.times.iter().sum();
        total / self.times.len() as u32
    }

    pub fn stddev_us(&self) -> f64 {
        if self.times.is_empty() {
            return 0.0;
        }
        let mean = self.mean().as_nanos() as f64;
        let variance = self
            .times
            .iter()
            .map(|t| {
                let diff = t.as_nanos() as f64 - mean;
                diff * diff
            })
            .sum::<f64>()
            / self.times.len() as f64;
        variance.sqrt() / 1000.0
    }
}

impl fmt::Display for BenchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<24} │ {:>10} │ {:>10} │ {:>10} │ {:>10} │ {:>8.1} │ {:>8}",
            self.name,
            format_duration(self.min()),
            format_duration(self.median()),
            format_duration(self.mean()),
            format_duration(self.max()),
            self.stddev_us(),
            format_bytes(self.sieve_bytes),
        )
    }
}

pub fn header() -> String {
    format!(
        "{:<24} │ {:>10} │ {:>10} │ {:>10} │ {:>10} │ {:>8} │ {:>8}\n{}",
        "Implementation",
        "Min",
        "Median",
        "Mean",
        "Max",
        "σ (µs)",
        "Sieve",
        "─".repeat(100)
    )
}

/// Two warmup runs, then `iterations` timed runs of `f(n)`.
pub fn bench<F>(name: &str, n: usize, iterations: usize, sieve_bytes: usize, f: F) -> Result<BenchResult>
where
    F: Fn(usize) -> Result<usize>,
{
    f(n)?;
    f(n)?;

    let mut times = Vec::with_capacity(iterations);
    let mut prime_count = 0;

    for _ in 0..iterations {
        let start = Instant::now();
        let count = f(n)?;
        times.push(start.elapsed());
        prime_count = std::hint::black_box(count);
    }

    Ok(BenchResult {
        name: name.to_string(),
        n,
        prime_count,
        times,
        sieve_bytes,
    })
}

/// First pair of results whose prime counts differ, if any.
pub fn find_mismatch(results: &[BenchResult]) -> Option<(&BenchResult, &BenchResult)> {
    let first = results.first()?;
    results
        .iter()
        .find(|r| r.prime_count != first.prime_count)
        .map(|r| (first, r))
}
