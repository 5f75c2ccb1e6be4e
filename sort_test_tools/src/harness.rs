use std::cmp::Ordering;
use std::fmt::Debug;
use std::panic::{self, AssertUnwindSafe};

use log::{info, warn};
use rand::rngs::StdRng;

use crate::buffer::TestBuffer;
use crate::check;
use crate::compare::{self, ComparatorKind, ContextCheck, SortContext, EXPECTED_CONTEXT};
use crate::patterns::{self, Pattern};
use crate::report::Report;
use crate::{Sort, Word, NON_WORD_SIZE, WORD_SIZE};

#[cfg(not(miri))]
pub const MAX_LEN: usize = 1024 * 128;

#[cfg(miri)]
pub const MAX_LEN: usize = 200;

// Contract-violating comparators cost far more per element.
#[cfg(not(miri))]
pub const ADVERSARIAL_MAX_LEN: usize = 16384;

#[cfg(miri)]
pub const ADVERSARIAL_MAX_LEN: usize = 100;

/// Smallest accepted replacement for the largest adversarial length, so the sweep keeps one
/// input long enough to reach partitioning and recursion in the sort.
#[cfg(not(miri))]
pub const MIN_ADVERSARIAL_CEILING: usize = 1024;

#[cfg(miri)]
pub const MIN_ADVERSARIAL_CEILING: usize = 64;

pub const TRUNCATION_POINTS: [usize; 5] = [0, 12, 15, 12 * WORD_SIZE, MAX_LEN];

pub const ADVERSARIAL_POINTS: [usize; 5] = [0, 12, 15, 12 * WORD_SIZE, ADVERSARIAL_MAX_LEN];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    pub truncation_points: Vec<usize>,
    pub adversarial_points: Vec<usize>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            truncation_points: TRUNCATION_POINTS.to_vec(),
            adversarial_points: ADVERSARIAL_POINTS.to_vec(),
        }
    }
}

impl SweepConfig {
    /// Replaces the largest adversarial length, which must be at least
    /// `MIN_ADVERSARIAL_CEILING`.
    pub fn with_adversarial_ceiling(mut self, len: usize) -> Self {
        assert!(
            len >= MIN_ADVERSARIAL_CEILING,
            "adversarial ceiling {len} is below {MIN_ADVERSARIAL_CEILING}"
        );

        if let Some(last) = self.adversarial_points.last_mut() {
            *last = len;
        }

        self
    }
}

/// One run over both sweeps, owning the random state.
pub struct Session {
    seed: u64,
    rng: StdRng,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: patterns::new_rng(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn run<S: Sort>(&mut self, config: &SweepConfig) -> Report {
        info!("Using random seed {:#018x}", self.seed);
        info!("Testing: {}", <S as Sort>::name());

        let mut report = Report::new();

        for &len in &config.truncation_points {
            report.merge(self.ordering_sweep::<S>(len));
        }

        for &len in &config.adversarial_points {
            report.merge(test_sort_non_transitive::<S>(len, &mut self.rng));
        }

        report
    }

    /// Every base distribution at `len`, as word and as non-word records.
    pub fn ordering_sweep<S: Sort>(&mut self, len: usize) -> Report {
        let mut report = Report::new();

        for pattern in Pattern::ALL {
            let Some(nums) = pattern.generate(len, &mut self.rng) else {
                continue;
            };

            report.merge(test_sort::<S>(self.seed, pattern.desc(), &nums));
            report.merge(test_sort_non_word::<S>(self.seed, pattern.desc(), &nums));
        }

        report
    }
}

struct RecordLayout<K> {
    elem_size: usize,
    key: fn(&[u8]) -> K,
    compare: fn(&[u8], &[u8]) -> Ordering,
    compare_with_context: fn(&ContextCheck<'_>, &SortContext, &[u8], &[u8]) -> Ordering,
    non_transitive: fn(&[u8], &[u8]) -> Ordering,
}

const WORD_LAYOUT: RecordLayout<Word> = RecordLayout {
    elem_size: WORD_SIZE,
    key: compare::word_key,
    compare: compare::word,
    compare_with_context: compare::word_with_context,
    non_transitive: compare::word_non_transitive,
};

const NON_WORD_LAYOUT: RecordLayout<i8> = RecordLayout {
    elem_size: NON_WORD_SIZE,
    key: compare::non_word_key,
    compare: compare::non_word,
    compare_with_context: compare::non_word_with_context,
    non_transitive: compare::non_word_non_transitive,
};

impl<K> RecordLayout<K> {
    fn keys(&self, view: &[u8]) -> Vec<K> {
        view.chunks_exact(self.elem_size).map(self.key).collect()
    }
}

/// Sorts word records through the aligned view, plain and with context, and compares.
pub fn test_sort<S: Sort>(seed: u64, desc: &str, nums: &[i32]) -> Report {
    let mut report = Report::new();
    let records = patterns::word_records(nums);

    let mut buffer = TestBuffer::new(WORD_SIZE, nums.len());
    let mut buffer_r = TestBuffer::new(WORD_SIZE, nums.len());

    info!("test: {desc} bufferlen={}", buffer.len());

    sort_and_check::<S, _>(
        seed,
        desc,
        &WORD_LAYOUT,
        &records,
        buffer.aligned_mut().unwrap_or_default(),
        buffer_r.aligned_mut().unwrap_or_default(),
        &mut report,
    );

    // Word records never go through the unaligned view, a sort may load them as integers.

    report
}

/// Sorts non-word records through both views, plain and with context, and compares all four.
pub fn test_sort_non_word<S: Sort>(seed: u64, desc: &str, nums: &[i32]) -> Report {
    let mut report = Report::new();
    let records = patterns::non_word_records(nums);

    let mut buffer = TestBuffer::new(NON_WORD_SIZE, nums.len());
    let mut buffer_r = TestBuffer::new(NON_WORD_SIZE, nums.len());

    info!("test: {desc} non-word numlen={}", nums.len());

    let aligned_keys = sort_and_check::<S, _>(
        seed,
        desc,
        &NON_WORD_LAYOUT,
        &records,
        buffer.aligned_mut().unwrap_or_default(),
        buffer_r.aligned_mut().unwrap_or_default(),
        &mut report,
    );

    let unaligned_desc = format!("{desc} unaligned");
    let unaligned_keys = sort_and_check::<S, _>(
        seed,
        &unaligned_desc,
        &NON_WORD_LAYOUT,
        &records,
        buffer.unaligned_mut().unwrap_or_default(),
        buffer_r.unaligned_mut().unwrap_or_default(),
        &mut report,
    );

    report.record_if(
        &unaligned_desc,
        check::check_equivalent(&aligned_keys, &unaligned_keys),
    );

    report
}

// Returns the keys of the plain comparator result.
fn sort_and_check<S, K>(
    seed: u64,
    desc: &str,
    layout: &RecordLayout<K>,
    records: &[u8],
    view: &mut [u8],
    view_r: &mut [u8],
    report: &mut Report,
) -> Vec<K>
where
    S: Sort,
    K: Copy + Ord + Debug + Into<i64>,
{
    report.scenario();

    view.copy_from_slice(records);
    view_r.copy_from_slice(records);

    let context_check = ContextCheck::new(&EXPECTED_CONTEXT);

    <S as Sort>::sort_by(view, layout.elem_size, layout.compare);
    <S as Sort>::sort_by_with_context(
        view_r,
        layout.elem_size,
        &EXPECTED_CONTEXT,
        |context, a, b| (layout.compare_with_context)(&context_check, context, a, b),
    );

    if let Some(fault) = context_check.finish() {
        report.record(&format!("{desc} {}", ComparatorKind::WithContext.desc()), fault);
    }

    let keys = layout.keys(view);
    let keys_r = layout.keys(view_r);

    if let Err(fault) = check::check_sort(&keys, &keys_r) {
        check::dump_failure(seed, &keys, &keys_r);
        let scenario = format!(
            "{desc} {} vs {}",
            ComparatorKind::Plain.desc(),
            ComparatorKind::WithContext.desc()
        );
        report.record(&scenario, fault);
    }

    keys
}

/// Drives contract-violating comparators over strictly descending input. Only termination
/// and retention of the original records are judged, never order.
pub fn test_sort_non_transitive<S: Sort>(len: usize, rng: &mut StdRng) -> Report {
    let mut report = Report::new();

    info!("test: non-transitive numlen={len}");

    let nums = patterns::strictly_descending(len);
    let word_records = patterns::word_records(&nums);
    let non_word_records = patterns::non_word_records(&nums);

    let mut buffer = TestBuffer::new(WORD_SIZE, len);
    let mut non_word_buffer = TestBuffer::new(NON_WORD_SIZE, len);

    let view = buffer.aligned_mut().unwrap_or_default();
    view.copy_from_slice(&word_records);
    run_violating::<S, _>(
        &mut report,
        "word",
        &WORD_LAYOUT,
        view,
        ComparatorKind::NonTransitive,
        WORD_LAYOUT.non_transitive,
    );
    // What's inside doesn't matter for random comparison.
    run_violating::<S, _>(
        &mut report,
        "word",
        &WORD_LAYOUT,
        view,
        ComparatorKind::RandomAny,
        |_, _| compare::random_any(&mut *rng),
    );

    let view = non_word_buffer.aligned_mut().unwrap_or_default();
    view.copy_from_slice(&non_word_records);
    run_violating::<S, _>(
        &mut report,
        "non-word",
        &NON_WORD_LAYOUT,
        view,
        ComparatorKind::NonTransitive,
        NON_WORD_LAYOUT.non_transitive,
    );
    run_violating::<S, _>(
        &mut report,
        "non-word",
        &NON_WORD_LAYOUT,
        view,
        ComparatorKind::RandomAny,
        |_, _| compare::random_any(&mut *rng),
    );

    let view = non_word_buffer.unaligned_mut().unwrap_or_default();
    view.copy_from_slice(&non_word_records);
    run_violating::<S, _>(
        &mut report,
        "non-word unaligned",
        &NON_WORD_LAYOUT,
        view,
        ComparatorKind::NonTransitive,
        NON_WORD_LAYOUT.non_transitive,
    );
    run_violating::<S, _>(
        &mut report,
        "non-word unaligned",
        &NON_WORD_LAYOUT,
        view,
        ComparatorKind::RandomAny,
        |_, _| compare::random_any(&mut *rng),
    );

    report
}

fn run_violating<S, K>(
    report: &mut Report,
    desc: &str,
    layout: &RecordLayout<K>,
    view: &mut [u8],
    kind: ComparatorKind,
    compare: impl FnMut(&[u8], &[u8]) -> Ordering,
) where
    S: Sort,
{
    debug_assert!(kind.violates_contract());
    report.scenario();

    let before = view.to_vec();

    // The sort contract allows a panic on a non-total order. Control came back, which is all
    // that is asked of the sort here.
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        <S as Sort>::sort_by(&mut *view, layout.elem_size, compare);
    }));
    if result.is_err() {
        warn!(
            "{desc}: {} panicked on a {} comparator",
            <S as Sort>::name(),
            kind.desc()
        );
    }

    let scenario = format!("{desc} {}", kind.desc());
    report.record_if(
        &scenario,
        check::check_retained(&before, view, layout.elem_size),
    );
}
