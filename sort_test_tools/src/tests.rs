use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Mutex;

use crate::buffer::TestBuffer;
use crate::check;
use crate::compare::{self, ContextCheck, SortContext, EXPECTED_CONTEXT};
use crate::harness::{self, Session, SweepConfig, ADVERSARIAL_MAX_LEN};
use crate::patterns::{self, Pattern};
use crate::report::{Fault, Report};
use crate::{seed, Sort, NON_WORD_SIZE, WORD_SIZE};

#[cfg(miri)]
const TEST_SIZES: [usize; 14] = [0, 1, 2, 3, 4, 5, 8, 12, 15, 16, 17, 33, 48, 100];

#[cfg(not(miri))]
const TEST_SIZES: [usize; 22] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 12, 15, 16, 17, 20, 33, 48, 100, 500, 1_000, 2_048,
];

fn get_or_init_random_seed<S: Sort>() -> u64 {
    static SEED_WRITTEN: Mutex<bool> = Mutex::new(false);
    let seed = patterns::random_init_seed();

    let mut seed_writer = SEED_WRITTEN.lock().unwrap();
    if !*seed_writer {
        // Always write the seed before doing anything to ensure reproducibility of crashes.
        io::stdout()
            .write_all(
                format!("\nSeed: {seed:#018x}\nTesting: {}\n\n", <S as Sort>::name()).as_bytes(),
            )
            .unwrap();
        io::stdout().flush().unwrap();

        *seed_writer = true;
    }

    seed
}

fn sort_words<S: Sort>(nums: &[i32]) -> Vec<i32> {
    let mut buffer = TestBuffer::new(WORD_SIZE, nums.len());
    let view = buffer.aligned_mut().unwrap_or_default();
    view.copy_from_slice(&patterns::word_records(nums));

    <S as Sort>::sort_by(view, WORD_SIZE, compare::word);

    view.chunks_exact(WORD_SIZE).map(compare::word_key).collect()
}

fn assert_not_broken(report: &Report) {
    assert!(!report.is_broken(), "faults: {:?}", report.faults());
}

fn test_pattern<S: Sort>(pattern: Pattern) {
    let seed = get_or_init_random_seed::<S>();
    let mut rng = patterns::new_rng(seed);

    for test_size in TEST_SIZES {
        let Some(nums) = pattern.generate(test_size, &mut rng) else {
            continue;
        };

        let sorted = sort_words::<S>(&nums);
        let mut expected = nums.clone();
        expected.sort();
        assert_eq!(sorted, expected);

        assert_not_broken(&harness::test_sort::<S>(seed, pattern.desc(), &nums));
        assert_not_broken(&harness::test_sort_non_word::<S>(seed, pattern.desc(), &nums));
    }
}

// --- TESTS ---

pub fn basic<S: Sort>() {
    assert_eq!(sort_words::<S>(&[4, 3, 2, 1, 0]), vec![0, 1, 2, 3, 4]);
    assert_eq!(sort_words::<S>(&[2, 3]), vec![2, 3]);
    assert_eq!(sort_words::<S>(&[15, -1, 3, -1, -3, -1, 7]), vec![-3, -1, -1, -1, 3, 7, 15]);
    assert_eq!(
        sort_words::<S>(&[i32::MAX, 0, i32::MIN, -1]),
        vec![i32::MIN, -1, 0, i32::MAX]
    );
}

pub fn empty<S: Sort>() {
    let _seed = get_or_init_random_seed::<S>();

    assert!(sort_words::<S>(&[]).is_empty());
    <S as Sort>::sort_by(&mut [], NON_WORD_SIZE, compare::non_word);

    let report = harness::test_sort::<S>(0, "empty", &[]);
    assert_not_broken(&report);
    assert_eq!(report.scenarios(), 1);

    let report = harness::test_sort_non_word::<S>(0, "empty", &[]);
    assert_not_broken(&report);
    assert_eq!(report.scenarios(), 2);
}

pub fn ascending<S: Sort>() {
    test_pattern::<S>(Pattern::Ascending);
}

pub fn ascending_last_corrupted<S: Sort>() {
    test_pattern::<S>(Pattern::AscendingLastCorrupted);

    let nums = patterns::ascending_last_corrupted(15);
    let expected = (-1..=13).collect::<Vec<i32>>();
    assert_eq!(sort_words::<S>(&nums), expected);
}

pub fn descending<S: Sort>() {
    test_pattern::<S>(Pattern::Descending);
}

pub fn random<S: Sort>() {
    test_pattern::<S>(Pattern::Random);
}

pub fn non_word_unaligned<S: Sort>() {
    let seed = get_or_init_random_seed::<S>();
    let nums = patterns::ascending(128);
    let records = patterns::non_word_records(&nums);

    let mut buffer = TestBuffer::new(NON_WORD_SIZE, nums.len());

    let view = buffer.aligned_mut().unwrap();
    view.copy_from_slice(&records);
    <S as Sort>::sort_by(view, NON_WORD_SIZE, compare::non_word);
    let aligned_keys = view
        .chunks_exact(NON_WORD_SIZE)
        .map(compare::non_word_key)
        .collect::<Vec<_>>();

    let view = buffer.unaligned_mut().unwrap();
    view.copy_from_slice(&records);
    <S as Sort>::sort_by(view, NON_WORD_SIZE, compare::non_word);
    let unaligned_keys = view
        .chunks_exact(NON_WORD_SIZE)
        .map(compare::non_word_key)
        .collect::<Vec<_>>();

    // Keys 0..=127 fit into an i8 without wrapping.
    let expected = (0..128).map(|val| val as i8).collect::<Vec<_>>();
    assert_eq!(aligned_keys, expected);
    assert_eq!(unaligned_keys, expected);

    assert_not_broken(&harness::test_sort_non_word::<S>(seed, "unaligned", &nums));
}

pub fn context_forwarded<S: Sort>() {
    let seed = get_or_init_random_seed::<S>();
    let nums = patterns::random(500, &mut patterns::new_rng(seed));
    let mut view = patterns::word_records(&nums);

    let context_check = ContextCheck::new(&EXPECTED_CONTEXT);
    <S as Sort>::sort_by_with_context(&mut view, WORD_SIZE, &EXPECTED_CONTEXT, |ctx, a, b| {
        compare::word_with_context(&context_check, ctx, a, b)
    });

    assert_eq!(context_check.mismatches(), 0);
    assert_eq!(context_check.finish(), None);
}

pub fn context_mismatch<S: Sort>() {
    let _seed = get_or_init_random_seed::<S>();

    // Same contents, different identity.
    let impostor = SortContext::new(EXPECTED_CONTEXT.tag());

    let nums = patterns::descending(5);
    let mut view = patterns::word_records(&nums);

    let context_check = ContextCheck::new(&EXPECTED_CONTEXT);
    <S as Sort>::sort_by_with_context(&mut view, WORD_SIZE, &impostor, |ctx, a, b| {
        compare::word_with_context(&context_check, ctx, a, b)
    });

    // Ordering still follows the keys.
    let keys = view
        .chunks_exact(WORD_SIZE)
        .map(compare::word_key)
        .collect::<Vec<_>>();
    assert_eq!(keys, vec![0, 1, 2, 3, 4]);

    let calls = context_check.mismatches();
    assert!(calls > 0);

    let mut report = Report::new();
    report.record("context mismatch", context_check.finish().unwrap());
    assert!(report.is_broken());
    assert_eq!(report.faults(), &[Fault::ContextMismatch { calls }]);
}

pub fn non_transitive<S: Sort>() {
    let seed = get_or_init_random_seed::<S>();
    let mut rng = patterns::new_rng(seed);

    for len in harness::ADVERSARIAL_POINTS {
        let report = harness::test_sort_non_transitive::<S>(len, &mut rng);
        assert_not_broken(&report);
        assert_eq!(report.scenarios(), 6);
    }
}

pub fn non_transitive_large<S: Sort>() {
    let seed = get_or_init_random_seed::<S>();
    let nums = patterns::strictly_descending(ADVERSARIAL_MAX_LEN);
    let records = patterns::non_word_records(&nums);

    let mut buffer = TestBuffer::new(NON_WORD_SIZE, nums.len());
    let view = buffer.unaligned_mut().unwrap();
    view.copy_from_slice(&records);

    // Panicking on a non-total order is allowed, returning is what counts.
    let _ = panic::catch_unwind(AssertUnwindSafe(|| {
        <S as Sort>::sort_by(&mut *view, NON_WORD_SIZE, compare::non_word_non_transitive);
    }));
    assert_eq!(check::check_retained(&records, view, NON_WORD_SIZE), Ok(()));

    let mut rng = patterns::new_rng(seed);
    let word_records = patterns::word_records(&nums);
    let mut words = word_records.clone();
    let _ = panic::catch_unwind(AssertUnwindSafe(|| {
        <S as Sort>::sort_by(&mut words, WORD_SIZE, |_, _| compare::random_any(&mut rng));
    }));
    assert_eq!(check::check_retained(&word_records, &words, WORD_SIZE), Ok(()));
}

pub fn fixed_seed<S: Sort>() {
    let fixed_seed_a = patterns::random_init_seed();
    let fixed_seed_b = patterns::random_init_seed();

    assert_eq!(fixed_seed_a, fixed_seed_b);
    assert_eq!(seed::validate(fixed_seed_a), Ok(fixed_seed_a));
}

pub fn session<S: Sort>() {
    let seed = get_or_init_random_seed::<S>();

    let config = SweepConfig {
        truncation_points: vec![0, 1, 12, 15, 12 * WORD_SIZE, 1_000],
        adversarial_points: vec![0, 12, 15, 12 * WORD_SIZE, 2_048],
    };

    let report = Session::new(seed).run::<S>(&config);
    assert_not_broken(&report);

    // Three scenarios per distribution, the corrupted tail is skipped at length 0. Six per
    // adversarial length.
    let ordering = config
        .truncation_points
        .iter()
        .map(|&len| if len == 0 { 3 * 3 } else { 4 * 3 })
        .sum::<usize>();
    let adversarial = config.adversarial_points.len() * 6;
    assert_eq!(report.scenarios(), ordering + adversarial);
}

#[doc(hidden)]
#[macro_export]
macro_rules! instantiate_sort_test_impl_inner {
    ($sort_impl:ty, miri_yes, $sort_name:ident) => {
        #[test]
        fn $sort_name() {
            sort_test_tools::tests::$sort_name::<$sort_impl>();
        }
    };
    ($sort_impl:ty, miri_no, $sort_name:ident) => {
        #[test]
        #[cfg(not(miri))]
        fn $sort_name() {
            sort_test_tools::tests::$sort_name::<$sort_impl>();
        }

        #[test]
        #[cfg(miri)]
        #[ignore]
        fn $sort_name() {}
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! instantiate_sort_test_impl {
    ($sort_impl:ty, $([$miri_use:ident, $sort_name:ident]),*) => {
        $(
            sort_test_tools::instantiate_sort_test_impl_inner!($sort_impl, $miri_use, $sort_name);
        )*
    };
}

#[macro_export]
macro_rules! instantiate_sort_tests {
    ($sort_impl:ty) => {
        sort_test_tools::instantiate_sort_test_impl!(
            $sort_impl,
            [miri_yes, ascending],
            [miri_yes, ascending_last_corrupted],
            [miri_yes, basic],
            [miri_yes, context_forwarded],
            [miri_yes, context_mismatch],
            [miri_yes, descending],
            [miri_yes, empty],
            [miri_yes, fixed_seed],
            [miri_yes, non_transitive],
            [miri_no, non_transitive_large],
            [miri_yes, non_word_unaligned],
            [miri_yes, random],
            [miri_no, session]
        );
    };
}
