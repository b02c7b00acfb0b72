//! Timing harness and console formatting.

use crate::config::SieveConfig;
use crate::error::Result;
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub bound: usize,
    pub prime_count: usize,
    /// Wall clock time for allocation, marking and counting.
    pub elapsed: Duration,
    pub sieve_bytes: usize,
}

impl RunReport {
    pub fn startup_line(bound: usize) -> String {
        format!("Looking for primes below {}", bound)
    }

    pub fn elapsed_line(&self) -> String {
        format!("Processing took {}ms", self.elapsed.as_millis())
    }

    pub fn count_line(&self) -> String {
        format!("Found {} prime numbers", self.prime_count)
    }
}

/// Run one sieve as configured and time it.
pub fn timed_run(config: &SieveConfig) -> Result<RunReport> {
    let start = Instant::now();
    let sieve = config.run()?;
    let prime_count = sieve.count_primes();
    let elapsed = start.elapsed();

    info!(
        bound = config.bound,
        workers = config.workers.unwrap_or(1),
        prime_count,
        elapsed = %format_duration(elapsed),
        sieve = %format_bytes(sieve.memory_bytes()),
        "sieve finished"
    );

    Ok(RunReport {
        bound: config.bound,
        prime_count,
        elapsed,
        sieve_bytes: sieve.memory_bytes(),
    })
}

// ─── Formatting ────────────────────────────────────────────────────────────

pub fn format_duration(d: Duration) -> String {
    let nanos = d.as_nanos();
    if nanos < 1_000 {
        format!("{} ns", nanos)
    } else if nanos < 1_000_000 {
        format!("{:.1} µs", nanos as f64 / 1_000.0)
    } else if nanos < 1_000_000_000 {
        format!("{:.2} ms", nanos as f64 / 1_000_000.0)
    } else {
        format!("{:.2} s", nanos as f64 / 1_000_000_000.0)
    }
}

pub fn format_bytes(b: usize) -> String {
    if b < 1024 {
        format!("{} B", b)
    } else if b < 1024 * 1024 {
        format!("{:.1} KB", b as f64 / 1024.0)
    } else {
        format!("{:.1} MB", b as f64 / (1024.0 * 1024.0))
    }
}

pub fn format_with_commas(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
