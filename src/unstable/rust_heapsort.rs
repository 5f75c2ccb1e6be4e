use std::cmp::Ordering;

use crate::raw;

sort_impl!("rust_heapsort_unstable");

#[inline]
pub fn sort_by<F>(v: &mut [u8], elem_size: usize, mut compare: F)
where
    F: FnMut(&[u8], &[u8]) -> Ordering,
{
    raw::heapsort(v, elem_size, &mut raw::is_less(&mut compare));
}

#[inline]
pub fn sort_by_with_context<C, F>(v: &mut [u8], elem_size: usize, context: &C, mut compare: F)
where
    C: ?Sized,
    F: FnMut(&C, &[u8], &[u8]) -> Ordering,
{
    sort_by(v, elem_size, |a, b| compare(context, a, b));
}
