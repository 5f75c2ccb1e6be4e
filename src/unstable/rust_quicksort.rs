use std::cmp::Ordering;

use crate::raw;

sort_impl!("rust_quicksort_unstable");

// Slices of up to this many records get sorted using insertion sort.
const SMALL_SORT_THRESHOLD: usize = 20;

#[inline]
pub fn sort_by<F>(v: &mut [u8], elem_size: usize, mut compare: F)
where
    F: FnMut(&[u8], &[u8]) -> Ordering,
{
    let len = raw::len(v, elem_size);

    if len < 2 {
        return;
    }

    // Limit the number of partitioning steps on any one path to `2 * floor(log2(len))`.
    // The binary OR by one is used to eliminate the zero-check in the logarithm.
    let limit = 2 * (len | 1).ilog2();

    quicksort(v, elem_size, &mut raw::is_less(&mut compare), limit);
}

#[inline]
pub fn sort_by_with_context<C, F>(v: &mut [u8], elem_size: usize, context: &C, mut compare: F)
where
    C: ?Sized,
    F: FnMut(&C, &[u8], &[u8]) -> Ordering,
{
    sort_by(v, elem_size, |a, b| compare(context, a, b));
}

/// Sorts `v` recursively.
///
/// `limit` is the number of partitioning steps left on this path before switching to
/// `heapsort`. A balanced sort needs about `log2(len)` of them. If zero, this function will
/// immediately switch to heapsort.
fn quicksort<F>(mut v: &mut [u8], elem_size: usize, is_less: &mut F, mut limit: u32)
where
    F: FnMut(&[u8], &[u8]) -> bool,
{
    loop {
        let len = v.len() / elem_size;

        if len <= SMALL_SORT_THRESHOLD {
            if len >= 2 {
                raw::insertion_sort_shift_left(v, elem_size, 1, is_less);
            }
            return;
        }

        // If too many bad pivot choices were made, simply fall back to heapsort in order to
        // guarantee `O(n * log(n))` worst-case.
        if limit == 0 {
            raw::heapsort(v, elem_size, is_less);
            return;
        }

        limit -= 1;

        let pivot_pos = choose_pivot(v, elem_size, is_less);
        let mid = partition(v, elem_size, pivot_pos, is_less);

        // Split the slice into `left`, `pivot`, and `right`.
        let (left, right) = v.split_at_mut(mid * elem_size);
        let right = &mut right[elem_size..];

        // Recurse into the shorter side, loop on the longer one to bound stack depth.
        if left.len() < right.len() {
            quicksort(left, elem_size, is_less, limit);
            v = right;
        } else {
            quicksort(right, elem_size, is_less, limit);
            v = left;
        }
    }
}

// Median of the records at 1/4, 2/4 and 3/4. With a broken comparator the result is still one
// of the three candidates.
fn choose_pivot<F>(v: &[u8], elem_size: usize, is_less: &mut F) -> usize
where
    F: FnMut(&[u8], &[u8]) -> bool,
{
    let len = v.len() / elem_size;
    let (mut a, b, mut c) = (len / 4, len / 2, len / 4 * 3);

    let mut lt = |x: usize, y: usize| {
        is_less(raw::elem(v, elem_size, x), raw::elem(v, elem_size, y))
    };

    if lt(c, a) {
        std::mem::swap(&mut a, &mut c);
    }
    if lt(b, a) {
        return a;
    }
    if lt(c, b) {
        return c;
    }

    b
}

/// Places the pivot at its final position and returns it. Records before it compared less than
/// the pivot, records after it did not.
///
/// If `is_less` does not implement a total order the resulting order is unspecified, but all
/// original records remain in `v`.
fn partition<F>(v: &mut [u8], elem_size: usize, pivot: usize, is_less: &mut F) -> usize
where
    F: FnMut(&[u8], &[u8]) -> bool,
{
    let len = v.len() / elem_size;

    // Place the pivot at the beginning of slice.
    raw::swap(v, elem_size, 0, pivot);

    let mut num_lt = 0;
    for i in 1..len {
        if is_less(raw::elem(v, elem_size, i), raw::elem(v, elem_size, 0)) {
            num_lt += 1;
            raw::swap(v, elem_size, num_lt, i);
        }
    }

    // Place the pivot between the two partitions.
    raw::swap(v, elem_size, 0, num_lt);

    num_lt
}
