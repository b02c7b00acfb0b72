//! Stride-partitioned marking on a fixed-size worker pool.
//!
//! Worker `t` of `w` handles candidates `2 + t, 2 + t + w, 2 + t + 2w, ...`.
//! Workers share one [`AtomicBitArray`]; a candidate read as "prime" that is
//! really composite only causes redundant marks, never a wrong result.

use crate::bits::{AtomicBitArray, BitArray};
use crate::error::{Result, SieveError};
use rayon::ThreadPoolBuilder;
use tracing::debug;

/// Sieve `bound` with `workers` threads and return the finished array.
/// Every worker has joined before this returns.
pub(crate) fn sieve(bound: usize, workers: usize, outer_end: usize) -> Result<BitArray> {
    if workers == 0 {
        return Err(SieveError::InvalidWorkers { workers });
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("sieve-worker-{}", i))
        .build()?;

    let bits = AtomicBitArray::with_bound(bound);
    bits.set(1);
    debug!(bound, workers, outer_end, "marking composites in parallel");

    pool.scope(|s| {
        for t in 0..workers {
            let bits = &bits;
            s.spawn(move |_| mark_stride(bits, bound, outer_end, 2 + t, workers));
        }
    });

    Ok(bits.into_bit_array())
}

fn mark_stride(bits: &AtomicBitArray, bound: usize, outer_end: usize, start: usize, step: usize) {
    let mut n = start;
    while n < outer_end {
        if !bits.test(n) {
            for i in 2..=bound / n {
                bits.set(n * i);
            }
        }
        n += step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OuterLimit;
    use crate::sieve::BitSieve;

    #[test]
    fn test_four_workers_match_sequential() {
        for bound in [2, 3, 33, 100, 1_000, 100_000] {
            let sequential = BitSieve::run(bound).unwrap();
            let parallel = BitSieve::run_parallel(bound, 4, OuterLimit::Full).unwrap();
            assert_eq!(sequential.words(), parallel.words(), "bound={}", bound);
        }
    }

    #[test]
    fn test_worker_counts() {
        let expected = BitSieve::run(50_000).unwrap();
        for workers in [1, 2, 3, 7, 16] {
            let parallel = BitSieve::run_parallel(50_000, workers, OuterLimit::Full).unwrap();
            assert_eq!(expected.words(), parallel.words(), "workers={}", workers);
        }
    }

    #[test]
    fn test_sqrt_cutoff_in_parallel() {
        let expected = BitSieve::run(1_000_000).unwrap();
        let parallel = BitSieve::run_parallel(1_000_000, 4, OuterLimit::SquareRoot).unwrap();
        assert_eq!(expected.words(), parallel.words());
        assert_eq!(parallel.count_primes(), 78_498);
    }

    #[test]
    fn test_more_workers_than_candidates() {
        let parallel = BitSieve::run_parallel(5, 8, OuterLimit::Full).unwrap();
        assert_eq!(parallel.collect_primes(), vec![2, 3]);
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            BitSieve::run_parallel(100, 0, OuterLimit::Full),
            Err(SieveError::InvalidWorkers { workers: 0 })
        ));
        assert!(matches!(
            sieve(100, 0, 100),
            Err(SieveError::InvalidWorkers { workers: 0 })
        ));
    }
}
