//! Bit-packed Sieve of Eratosthenes over every integer below a bound.
//!
//! Layout:
//! - 1 bit per integer (32x memory reduction vs a `Vec<u32>` of flags)
//! - set bit = composite, clear bit = prime (0 is never counted)
//! - counting and enumeration work a whole word at a time

use crate::bits::{BitArray, ClearBits};
use crate::config::OuterLimit;
use crate::error::{Result, SieveError};
use crate::parallel;
use tracing::debug;

// ─── Helpers ───────────────────────────────────────────────────────────────

/// Integer square root, safe for all u64 values.
/// Newton-corrected from an f64 seed.
#[inline]
pub(crate) fn isqrt(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    let mut x = (n as f64).sqrt() as u64;
    while x > 0 && x.checked_mul(x).map_or(true, |sq| sq > n) {
        x -= 1;
    }
    while (x + 1).checked_mul(x + 1).map_or(false, |sq| sq <= n) {
        x += 1;
    }
    x
}

/// Upper bound on π(n) for pre-allocation. Overestimates by ~15%.
#[inline]
pub(crate) fn prime_count_upper(n: u64) -> usize {
    if n < 10 {
        return 4;
    }
    let nf = n as f64;
    (nf / nf.ln() * 1.15) as usize + 1
}

// ─── Sieve ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitSieve {
    bits: BitArray,
    bound: usize,
}

impl BitSieve {
    /// Allocate an unsieved array for `bound` with 1 already marked.
    pub fn new(bound: usize) -> Result<Self> {
        if bound < 2 {
            return Err(SieveError::InvalidBound { bound });
        }
        let bits = BitArray::with_bound(bound);
        debug!(
            bound,
            words = bits.words().len(),
            bytes = bits.memory_bytes(),
            "allocated sieve"
        );
        let mut sieve = Self { bits, bound };
        sieve.mark(1);
        Ok(sieve)
    }

    /// Sieve every integer below `bound` on the current thread.
    pub fn run(bound: usize) -> Result<Self> {
        Self::run_with(bound, OuterLimit::Full)
    }

    pub fn run_with(bound: usize, limit: OuterLimit) -> Result<Self> {
        let mut sieve = Self::new(bound)?;
        sieve.sieve(limit);
        Ok(sieve)
    }

    /// Sieve with `workers` threads, each taking every `workers`-th
    /// candidate. Produces the same words as [`BitSieve::run_with`].
    pub fn run_parallel(bound: usize, workers: usize, limit: OuterLimit) -> Result<Self> {
        if bound < 2 {
            return Err(SieveError::InvalidBound { bound });
        }
        let bits = parallel::sieve(bound, workers, limit.outer_end(bound))?;
        Ok(Self { bits, bound })
    }

    /// Mark `n` as composite. Panics if `n` is past the allocated words.
    #[inline]
    pub fn mark(&mut self, n: usize) {
        self.bits.set(n);
    }

    #[inline]
    pub fn is_composite(&self, n: usize) -> bool {
        self.bits.test(n)
    }

    /// Run the marking pass. Only ever adds marks, so calling it again
    /// leaves the array unchanged.
    pub fn sieve(&mut self, limit: OuterLimit) {
        let end = limit.outer_end(self.bound);
        debug!(bound = self.bound, outer_end = end, ?limit, "marking composites");
        for n in 2..end {
            self.process_number(n);
        }
    }

    /// Mark every multiple `n * i`, `2 <= i <= bound / n`, unless `n` was
    /// already eliminated by a smaller factor.
    fn process_number(&mut self, n: usize) {
        if self.is_composite(n) {
            return;
        }
        for i in 2..=self.bound / n {
            self.mark(n * i);
        }
    }

    /// Number of unmarked integers in `1..bound`.
    pub fn count_primes(&self) -> usize {
        self.bits.count_clear(1, self.bound)
    }

    /// Primes below the bound, ascending.
    pub fn primes(&self) -> ClearBits<'_> {
        self.bits.clear_bits(1, self.bound)
    }

    pub fn collect_primes(&self) -> Vec<usize> {
        let mut r = Vec::with_capacity(prime_count_upper(self.bound as u64));
        r.extend(self.primes());
        r
    }

    pub fn bound(&self) -> usize {
        self.bound
    }

    pub fn words(&self) -> &[u32] {
        self.bits.words()
    }

    pub fn memory_bytes(&self) -> usize {
        self.bits.memory_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_prime_trial(n: usize) -> bool {
        n >= 2 && (2..).take_while(|d| d * d <= n).all(|d| n % d != 0)
    }

    #[test]
    fn test_matches_trial_division() {
        for bound in [2, 3, 4, 31, 32, 33, 64, 100, 257, 1_000] {
            let sieve = BitSieve::run(bound).unwrap();
            for n in 2..bound {
                assert_eq!(
                    !sieve.is_composite(n),
                    is_prime_trial(n),
                    "n={} bound={}",
                    n,
                    bound
                );
            }
        }
    }

    #[test]
    fn test_one_is_composite() {
        assert!(BitSieve::new(2).unwrap().is_composite(1));
        assert!(BitSieve::new(500).unwrap().is_composite(1));
        assert!(BitSieve::run(500).unwrap().is_composite(1));
    }

    #[test]
    fn test_fresh_sieve_has_only_one_marked() {
        let sieve = BitSieve::new(100).unwrap();
        assert_eq!(sieve.words()[0], 0b10);
        assert!(sieve.words()[1..].iter().all(|&w| w == 0));
        assert_eq!(sieve.words().len(), 5);
    }

    #[test]
    fn test_known_counts() {
        assert_eq!(BitSieve::run(100).unwrap().count_primes(), 25);
        assert_eq!(BitSieve::run(1_000).unwrap().count_primes(), 168);
        assert_eq!(BitSieve::run(10_000).unwrap().count_primes(), 1_229);
        assert_eq!(BitSieve::run(1_000_000).unwrap().count_primes(), 78_498);
    }

    #[test]
    fn test_small_primes() {
        let sieve = BitSieve::run(20).unwrap();
        assert_eq!(sieve.collect_primes(), vec![2, 3, 5, 7, 11, 13, 17, 19]);
        assert_eq!(sieve.count_primes(), 8);
    }

    #[test]
    fn test_edge_cases() {
        assert_eq!(BitSieve::run(2).unwrap().count_primes(), 0);
        assert_eq!(BitSieve::run(2).unwrap().collect_primes(), Vec::<usize>::new());
        assert_eq!(BitSieve::run(3).unwrap().collect_primes(), vec![2]);
        // bound is exclusive even when prime
        assert_eq!(BitSieve::run(29).unwrap().count_primes(), 9);
        assert_eq!(BitSieve::run(30).unwrap().count_primes(), 10);
    }

    #[test]
    fn test_invalid_bound() {
        assert!(matches!(
            BitSieve::new(0),
            Err(SieveError::InvalidBound { bound: 0 })
        ));
        assert!(matches!(
            BitSieve::run(1),
            Err(SieveError::InvalidBound { bound: 1 })
        ));
    }

    #[test]
    fn test_bound_itself_is_marked_when_composite() {
        // i runs up to bound / n inclusive, so n * i may land on bound
        let sieve = BitSieve::run(100).unwrap();
        assert!(sieve.is_composite(100));
    }

    #[test]
    fn test_mark_is_idempotent() {
        let mut sieve = BitSieve::new(64).unwrap();
        sieve.mark(9);
        sieve.mark(9);
        assert!(sieve.is_composite(9));
        assert!(!sieve.is_composite(8));
    }

    #[test]
    fn test_marking_is_monotonic() {
        let mut sieve = BitSieve::new(1_000).unwrap();
        sieve.mark(7);
        let before = sieve.words().to_vec();
        sieve.sieve(OuterLimit::Full);
        for (b, a) in before.iter().zip(sieve.words()) {
            assert_eq!(b & !a, 0);
        }
        // 7 stays marked even though it is prime
        assert!(sieve.is_composite(7));

        let once = sieve.clone();
        sieve.sieve(OuterLimit::Full);
        assert_eq!(sieve, once);
    }

    #[test]
    fn test_sqrt_cutoff_matches_full() {
        for bound in [2, 3, 10, 25, 26, 121, 1_000, 65_536, 100_003] {
            let full = BitSieve::run_with(bound, OuterLimit::Full).unwrap();
            let cut = BitSieve::run_with(bound, OuterLimit::SquareRoot).unwrap();
            assert_eq!(full.words(), cut.words(), "bound={}", bound);
        }
    }

    #[test]
    fn test_primes_iterator_matches_count() {
        let sieve = BitSieve::run(100_000).unwrap();
        assert_eq!(sieve.primes().count(), sieve.count_primes());
        assert_eq!(sieve.primes().last(), Some(99_991));
        assert_eq!(sieve.primes().nth(9), Some(29));
    }

    #[test]
    fn test_isqrt_safety() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(1), 1);
        assert_eq!(isqrt(4), 2);
        assert_eq!(isqrt(99), 9);
        assert_eq!(isqrt(u64::MAX), 4_294_967_295);
        assert_eq!(isqrt(1 << 52), 1 << 26);
    }
}
