use std::cell::Cell;
use std::cmp::Ordering;
use std::ptr;

use log::error;
use rand::Rng;

use crate::report::Fault;
use crate::{Word, WORD_SIZE};

/// Comparators the harness drives a sort with.
///
/// `NonTransitive` and `RandomAny` violate the comparator contract on purpose. Runs with them
/// may only be judged on termination and element retention, never on ordering.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ComparatorKind {
    Plain,
    WithContext,
    NonTransitive,
    RandomAny,
}

impl ComparatorKind {
    pub fn violates_contract(self) -> bool {
        matches!(self, ComparatorKind::NonTransitive | ComparatorKind::RandomAny)
    }

    pub fn desc(self) -> &'static str {
        match self {
            ComparatorKind::Plain => "plain",
            ComparatorKind::WithContext => "with context",
            ComparatorKind::NonTransitive => "non-transitive",
            ComparatorKind::RandomAny => "random any",
        }
    }
}

/// Value handed to context-threaded sorts. Identity matters, not contents.
#[derive(Debug)]
pub struct SortContext {
    tag: u32,
}

impl SortContext {
    pub const fn new(tag: u32) -> Self {
        Self { tag }
    }

    pub fn tag(&self) -> u32 {
        self.tag
    }
}

/// The only context a context-threaded comparator accepts.
pub static EXPECTED_CONTEXT: SortContext = SortContext::new(77);

/// Tracks whether every comparator call saw the expected context.
pub struct ContextCheck<'a> {
    expected: &'a SortContext,
    mismatches: Cell<usize>,
}

impl<'a> ContextCheck<'a> {
    pub fn new(expected: &'a SortContext) -> Self {
        Self {
            expected,
            mismatches: Cell::new(0),
        }
    }

    pub fn verify(&self, got: &SortContext) {
        if ptr::eq(got, self.expected) {
            return;
        }

        // One line per sort call, the count carries the rest.
        if self.mismatches.get() == 0 {
            error!(
                "Uhoh, invalid context during sort! expected tag {} at {:p}, got tag {} at {:p}",
                self.expected.tag, self.expected, got.tag, got
            );
        }
        self.mismatches.set(self.mismatches.get() + 1);
    }

    pub fn mismatches(&self) -> usize {
        self.mismatches.get()
    }

    pub fn finish(self) -> Option<Fault> {
        match self.mismatches.get() {
            0 => None,
            calls => Some(Fault::ContextMismatch { calls }),
        }
    }
}

// --- Keys ---

pub fn word_key(record: &[u8]) -> Word {
    let mut bytes = [0u8; WORD_SIZE];
    bytes.copy_from_slice(&record[..WORD_SIZE]);

    Word::from_ne_bytes(bytes)
}

pub fn non_word_key(record: &[u8]) -> i8 {
    record[0] as i8
}

// --- Well formed ---

pub fn word(a: &[u8], b: &[u8]) -> Ordering {
    word_key(a).cmp(&word_key(b))
}

pub fn word_with_context(
    check: &ContextCheck,
    context: &SortContext,
    a: &[u8],
    b: &[u8],
) -> Ordering {
    check.verify(context);
    word(a, b)
}

pub fn non_word(a: &[u8], b: &[u8]) -> Ordering {
    non_word_key(a).cmp(&non_word_key(b))
}

pub fn non_word_with_context(
    check: &ContextCheck,
    context: &SortContext,
    a: &[u8],
    b: &[u8],
) -> Ordering {
    check.verify(context);
    non_word(a, b)
}

// --- Contract violating ---

/// Two valued: `Less` only for `a < b`, otherwise `Greater`. Equal keys are each reported
/// greater than the other.
pub fn non_transitive<K: Ord>(a: K, b: K) -> Ordering {
    if a < b {
        Ordering::Less
    } else {
        Ordering::Greater
    }
}

pub fn word_non_transitive(a: &[u8], b: &[u8]) -> Ordering {
    non_transitive(word_key(a), word_key(b))
}

pub fn non_word_non_transitive(a: &[u8], b: &[u8]) -> Ordering {
    non_transitive(non_word_key(a), non_word_key(b))
}

/// Ignores the operands and never returns `Equal`.
pub fn random_any(rng: &mut impl Rng) -> Ordering {
    if rng.gen::<u32>() > i32::MAX as u32 {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}
