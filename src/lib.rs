//! Bit-packed Sieve of Eratosthenes.
//!
//! ```
//! use bitsieve::BitSieve;
//!
//! let sieve = BitSieve::run(20).unwrap();
//! assert_eq!(sieve.count_primes(), 8);
//! assert!(sieve.is_composite(1));
//! ```

pub mod bench;
pub mod bits;
pub mod config;
pub mod error;
mod parallel;
pub mod report;
pub mod sieve;

pub use config::{OuterLimit, SieveConfig};
pub use error::SieveError;
pub use sieve::BitSieve;

/// Install a `tracing` subscriber filtered by `RUST_LOG`, defaulting to
/// warnings only so the console summary stays clean.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();
}
