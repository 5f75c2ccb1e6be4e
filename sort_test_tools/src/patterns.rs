use once_cell::sync::OnceCell;
use rand::prelude::*;

use crate::{seed, NON_WORD_SIZE, WORD_SIZE};

/// Input distributions used by the sweeps. All values are `i32`, records are built from them
/// with `word_records` and `non_word_records`.

// --- Public ---

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pattern {
    Ascending,
    AscendingLastCorrupted,
    Descending,
    Random,
}

impl Pattern {
    pub const ALL: [Pattern; 4] = [
        Pattern::Ascending,
        Pattern::AscendingLastCorrupted,
        Pattern::Descending,
        Pattern::Random,
    ];

    pub fn desc(self) -> &'static str {
        match self {
            Pattern::Ascending => "already sorted",
            Pattern::AscendingLastCorrupted => "already sorted except last element",
            Pattern::Descending => "reverse sorted",
            Pattern::Random => "random sorted",
        }
    }

    /// `None` where the pattern has no meaning for `size`, only the corrupted tail at size 0.
    pub fn generate(self, size: usize, rng: &mut impl Rng) -> Option<Vec<i32>> {
        match self {
            Pattern::Ascending => Some(ascending(size)),
            Pattern::AscendingLastCorrupted if size == 0 => None,
            Pattern::AscendingLastCorrupted => Some(ascending_last_corrupted(size)),
            Pattern::Descending => Some(descending(size)),
            Pattern::Random => Some(random(size, rng)),
        }
    }
}

pub fn ascending(size: usize) -> Vec<i32> {
    //     .:
    //   .:::
    // .:::::

    (0..size as i32).collect::<Vec<_>>()
}

pub fn ascending_last_corrupted(size: usize) -> Vec<i32> {
    //     .
    //   .::
    // .::::.

    let mut vals = ascending(size);
    if let Some(last) = vals.last_mut() {
        *last = -1;
    }

    vals
}

pub fn descending(size: usize) -> Vec<i32> {
    // :.
    // :::.
    // :::::.

    (0..size as i32).rev().collect::<Vec<_>>()
}

pub fn random(size: usize, rng: &mut impl Rng) -> Vec<i32> {
    //     .
    // : . : :
    // :.:::.::

    (0..size).map(|_| rng.gen::<i32>()).collect()
}

pub fn strictly_descending(size: usize) -> Vec<i32> {
    // :.
    // :::.
    // :::::.
    // Starts at `size` and never reaches 0, used to feed contract-violating comparators.

    (1..=size as i32).rev().collect::<Vec<_>>()
}

/// Native-endian `i32` records.
pub fn word_records(vals: &[i32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vals.len() * WORD_SIZE);
    for val in vals {
        bytes.extend_from_slice(&val.to_ne_bytes());
    }

    bytes
}

/// Records of `NON_WORD_SIZE` bytes whose key byte is `val` truncated to 8 bits.
///
/// The filler bytes carry no meaning, nothing may depend on their value.
pub fn non_word_records(vals: &[i32]) -> Vec<u8> {
    let mut bytes = vec![0u8; vals.len() * NON_WORD_SIZE];
    for (record, val) in bytes.chunks_exact_mut(NON_WORD_SIZE).zip(vals) {
        record[0] = *val as i8 as u8;
    }

    bytes
}

/// Seed shared by every test in this process, it satisfies `seed::validate`.
pub fn random_init_seed() -> u64 {
    static SEED: OnceCell<u64> = OnceCell::new();
    *SEED.get_or_init(|| {
        let high = thread_rng().gen_range(1..=u32::MAX) as u64;
        let low = thread_rng().gen::<u32>() as u64;

        (high << 32) | low
    })
}

pub fn new_rng(seed: u64) -> StdRng {
    debug_assert!(seed::validate(seed).is_ok());

    StdRng::seed_from_u64(seed)
}
