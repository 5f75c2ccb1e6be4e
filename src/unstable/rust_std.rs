use std::cmp::Ordering;

use crate::raw;

sort_impl!("rust_std_unstable");

/// Copies the records out, sorts them with the standard library and writes them back. `v` is
/// left untouched if `compare` panics.
#[inline]
pub fn sort_by<F>(v: &mut [u8], elem_size: usize, mut compare: F)
where
    F: FnMut(&[u8], &[u8]) -> Ordering,
{
    // Only asserts the record layout.
    raw::len(v, elem_size);

    let mut records = v
        .chunks_exact(elem_size)
        .map(<[u8]>::to_vec)
        .collect::<Vec<_>>();
    records.sort_unstable_by(|a, b| compare(a, b));

    for (dst, src) in v.chunks_exact_mut(elem_size).zip(&records) {
        dst.copy_from_slice(src);
    }
}

#[inline]
pub fn sort_by_with_context<C, F>(v: &mut [u8], elem_size: usize, context: &C, mut compare: F)
where
    C: ?Sized,
    F: FnMut(&C, &[u8], &[u8]) -> Ordering,
{
    sort_by(v, elem_size, |a, b| compare(context, a, b));
}
