//! Records addressed by index inside a byte slice. Nothing here assumes the slice start is
//! aligned, records are only ever copied or swapped as bytes.

use std::cmp::Ordering;

/// Number of `elem_size` records in `v`.
#[inline]
pub fn len(v: &[u8], elem_size: usize) -> usize {
    assert!(elem_size != 0, "zero sized records are not supported");
    assert_eq!(v.len() % elem_size, 0, "slice is not a whole number of records");

    v.len() / elem_size
}

#[inline]
pub fn elem(v: &[u8], elem_size: usize, i: usize) -> &[u8] {
    &v[i * elem_size..(i + 1) * elem_size]
}

#[inline]
pub fn swap(v: &mut [u8], elem_size: usize, a: usize, b: usize) {
    if a == b {
        return;
    }

    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    let (left, right) = v.split_at_mut(hi * elem_size);
    left[lo * elem_size..(lo + 1) * elem_size].swap_with_slice(&mut right[..elem_size]);
}

/// `is_less(a, b)` for a three way comparison.
#[inline]
pub fn is_less<F>(compare: &mut F) -> impl FnMut(&[u8], &[u8]) -> bool + '_
where
    F: FnMut(&[u8], &[u8]) -> Ordering,
{
    move |a: &[u8], b: &[u8]| compare(a, b) == Ordering::Less
}

/// Sorts `v` using heapsort, which guarantees *O*(*n* \* log(*n*)) worst-case.
///
/// Every access is bounded by the record count, so a comparator that violates a total order can
/// only produce an unspecified permutation.
pub fn heapsort<F>(v: &mut [u8], elem_size: usize, is_less: &mut F)
where
    F: FnMut(&[u8], &[u8]) -> bool,
{
    let len = len(v, elem_size);

    // Build the heap in linear time.
    for i in (0..len / 2).rev() {
        sift_down(v, elem_size, len, i, is_less);
    }

    // Pop maximal elements from the heap.
    for i in (1..len).rev() {
        swap(v, elem_size, 0, i);
        sift_down(v, elem_size, i, 0, is_less);
    }
}

// This binary heap respects the invariant `parent >= child` over the first `end` records.
fn sift_down<F>(v: &mut [u8], elem_size: usize, end: usize, mut node: usize, is_less: &mut F)
where
    F: FnMut(&[u8], &[u8]) -> bool,
{
    loop {
        // Children of `node`.
        let mut child = 2 * node + 1;
        if child >= end {
            break;
        }

        // Choose the greater child.
        if child + 1 < end
            && is_less(elem(v, elem_size, child), elem(v, elem_size, child + 1))
        {
            child += 1;
        }

        // Stop if the invariant holds at `node`.
        if !is_less(elem(v, elem_size, node), elem(v, elem_size, child)) {
            break;
        }

        // Swap `node` with the greater child, move one step down, and continue sifting.
        swap(v, elem_size, node, child);
        node = child;
    }
}

/// Sort `v` assuming `v[..offset]` is already sorted.
pub fn insertion_sort_shift_left<F>(v: &mut [u8], elem_size: usize, offset: usize, is_less: &mut F)
where
    F: FnMut(&[u8], &[u8]) -> bool,
{
    let len = len(v, elem_size);

    // This would be a logic bug.
    assert!(offset != 0 && offset <= len);

    // Shift each element of the unsorted region v[i..] as far left as is needed to make v sorted.
    for i in offset..len {
        let mut j = i;
        while j > 0 && is_less(elem(v, elem_size, j), elem(v, elem_size, j - 1)) {
            swap(v, elem_size, j, j - 1);
            j -= 1;
        }
    }
}
