use std::env;
use std::fmt::Debug;
use std::fs;

use log::{debug, error};

use crate::report::Fault;

/// Walks `sorted` once. Reports the first position where it decreases, or where it differs
/// from `sorted_other`, which was produced from the same input by a different code path.
pub fn check_sort<K>(sorted: &[K], sorted_other: &[K]) -> Result<(), Fault>
where
    K: Copy + Ord + Into<i64>,
{
    assert_eq!(sorted.len(), sorted_other.len());

    let mut prev: Option<K> = None;
    for (index, (&val, &val_other)) in sorted.iter().zip(sorted_other).enumerate() {
        if let Some(prev) = prev {
            if val < prev {
                return Err(Fault::NotSorted {
                    index,
                    prev: prev.into(),
                    val: val.into(),
                });
            }
        }

        if val != val_other {
            return Err(Fault::Diverged {
                index,
                a: val.into(),
                b: val_other.into(),
            });
        }

        prev = Some(val);
    }

    Ok(())
}

/// Elementwise equality only, for results that were already checked for order.
pub fn check_equivalent<K>(a: &[K], b: &[K]) -> Result<(), Fault>
where
    K: Copy + Eq + Into<i64>,
{
    assert_eq!(a.len(), b.len());

    match a.iter().zip(b).position(|(x, y)| x != y) {
        Some(index) => Err(Fault::Diverged {
            index,
            a: a[index].into(),
            b: b[index].into(),
        }),
        None => Ok(()),
    }
}

/// `after` must hold the same multiset of `elem_size` records as `before`.
pub fn check_retained(before: &[u8], after: &[u8], elem_size: usize) -> Result<(), Fault> {
    assert_eq!(before.len(), after.len());

    fn sorted_records(bytes: &[u8], elem_size: usize) -> Vec<&[u8]> {
        let mut records = bytes.chunks_exact(elem_size).collect::<Vec<_>>();
        records.sort_unstable();
        records
    }

    if sorted_records(before, elem_size) != sorted_records(after, elem_size) {
        return Err(Fault::ElementsLost {
            len: before.len() / elem_size,
        });
    }

    Ok(())
}

/// Makes a failed comparison reproducible. Small inputs go to the log, large ones to files if
/// `WRITE_LARGE_FAILURE` is set.
pub fn dump_failure<K: Debug>(seed: u64, sorted: &[K], sorted_other: &[K]) {
    if sorted.len() <= 100 {
        debug!("Sorted:         {:?}", sorted);
        debug!("Sorted context: {:?}", sorted_other);
        return;
    }

    if env::var("WRITE_LARGE_FAILURE").is_err() {
        error!("Failed comparison, re-run with WRITE_LARGE_FAILURE env var set, to get output.");
        return;
    }

    let sorted_name = format!("sorted_{seed}.txt");
    let other_name = format!("sorted_context_{seed}.txt");

    let written = fs::write(&sorted_name, format!("{sorted:?}"))
        .and_then(|()| fs::write(&other_name, format!("{sorted_other:?}")));
    match written {
        Ok(()) => error!("Failed comparison, see files {sorted_name} and {other_name}"),
        Err(err) => error!("Failed comparison, writing {sorted_name} failed: {err}"),
    }
}
