//! Packed bit storage for the sieve.
//!
//! One bit per integer, 32 integers per word: bit `b` of word `w` stands for
//! the integer `w * 32 + b`. A set bit means "composite".

use std::sync::atomic::{AtomicU32, Ordering};

// ─── Word layout ───────────────────────────────────────────────────────────

pub const WORD_BITS: usize = 32;

/// Number of words needed to hold every integer up to and including `bound`,
/// plus one spare word.
#[inline]
pub fn words_for_bound(bound: usize) -> usize {
    bound.div_ceil(WORD_BITS) + 1
}

#[inline]
fn split(index: usize) -> (usize, u32) {
    (index / WORD_BITS, (index % WORD_BITS) as u32)
}

// ─── Plain bit array ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitArray {
    words: Vec<u32>,
}

impl BitArray {
    /// All-clear array large enough for indices `0..=bound`.
    pub fn with_bound(bound: usize) -> Self {
        Self {
            words: vec![0; words_for_bound(bound)],
        }
    }

    #[inline]
    pub fn set(&mut self, index: usize) {
        let (word, bit) = split(index);
        self.words[word] |= 1u32 << bit;
    }

    #[inline]
    pub fn test(&self, index: usize) -> bool {
        let (word, bit) = split(index);
        (self.words[word] >> bit) & 1 == 1
    }

    pub fn words(&self) -> &[u32] {
        &self.words
    }

    pub fn memory_bytes(&self) -> usize {
        self.words.len() * std::mem::size_of::<u32>()
    }

    /// Number of clear bits in `start..end`.
    pub fn count_clear(&self, start: usize, end: usize) -> usize {
        if end <= start {
            return 0;
        }
        self.count_clear_below(end) - self.count_clear_below(start)
    }

    fn count_clear_below(&self, end: usize) -> usize {
        let (full, rem) = split(end);
        let mut count: usize = self.words[..full]
            .iter()
            .map(|w| w.count_zeros() as usize)
            .sum();
        if rem != 0 {
            let mask = (1u32 << rem) - 1;
            count += (!self.words[full] & mask).count_ones() as usize;
        }
        count
    }

    /// Iterate clear bit positions in `start..end`, ascending.
    pub fn clear_bits(&self, start: usize, end: usize) -> ClearBits<'_> {
        ClearBits::new(&self.words, start, end)
    }
}

// ─── Clear-bit iterator ────────────────────────────────────────────────────

/// Walks the zero bits of a word slice, skipping whole words at a time.
pub struct ClearBits<'a> {
    words: &'a [u32],
    word_index: usize,
    current: u32,
    end: usize,
}

impl<'a> ClearBits<'a> {
    fn new(words: &'a [u32], start: usize, end: usize) -> Self {
        let (word_index, bit) = split(start);
        let current = match words.get(word_index) {
            Some(&w) if start < end => !w & (!0u32 << bit),
            _ => 0,
        };
        Self {
            words,
            word_index: if start < end { word_index } else { words.len() },
            current,
            end,
        }
    }
}

impl Iterator for ClearBits<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current == 0 {
                self.word_index += 1;
                if self.word_index >= self.words.len() {
                    return None;
                }
                self.current = !self.words[self.word_index];
                continue;
            }

            let tz = self.current.trailing_zeros() as usize;
            // Brian Kernighan: clear lowest set bit
            self.current &= self.current - 1;
            let position = self.word_index * WORD_BITS + tz;
            if position >= self.end {
                self.word_index = self.words.len();
                self.current = 0;
                return None;
            }
            return Some(position);
        }
    }
}

// ─── Shared bit array for concurrent marking ───────────────────────────────

/// Same layout as [`BitArray`], but words are updated with atomic OR so
/// several workers can mark different bits of one word at the same time.
#[derive(Debug)]
pub struct AtomicBitArray {
    words: Box<[AtomicU32]>,
}

impl AtomicBitArray {
    pub fn with_bound(bound: usize) -> Self {
        Self {
            words: (0..words_for_bound(bound)).map(|_| AtomicU32::new(0)).collect(),
        }
    }

    #[inline]
    pub fn set(&self, index: usize) {
        let (word, bit) = split(index);
        self.words[word].fetch_or(1u32 << bit, Ordering::Relaxed);
    }

    /// May observe a stale word while other workers are still marking.
    #[inline]
    pub fn test(&self, index: usize) -> bool {
        let (word, bit) = split(index);
        (self.words[word].load(Ordering::Relaxed) >> bit) & 1 == 1
    }

    /// Freeze into a plain array. Taking `self` by value means every worker
    /// holding a reference has already finished.
    pub fn into_bit_array(self) -> BitArray {
        BitArray {
            words: self
                .words
                .into_vec()
                .into_iter()
                .map(AtomicU32::into_inner)
                .collect(),
        }
    }
}
