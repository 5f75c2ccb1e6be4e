use std::cmp::Ordering;
use std::mem;

/// An in-place sort over untyped memory, the shape of a C `qsort` / `qsort_r` pair.
///
/// `v` holds `v.len() / elem_size` records back to back. The buffer start carries no
/// alignment guarantee, so implementations must not reinterpret records as typed values.
pub trait Sort {
    fn name() -> String;

    fn sort_by<F>(v: &mut [u8], elem_size: usize, compare: F)
    where
        F: FnMut(&[u8], &[u8]) -> Ordering;

    /// Same as `sort_by`, but every call of `compare` must receive `context` unchanged.
    fn sort_by_with_context<C, F>(v: &mut [u8], elem_size: usize, context: &C, compare: F)
    where
        C: ?Sized,
        F: FnMut(&C, &[u8], &[u8]) -> Ordering;
}

/// Word-sized element, sorted by value.
pub type Word = i32;

pub const WORD_SIZE: usize = mem::size_of::<Word>();

/// Record that is not a single word. Only the first byte is the sort key.
pub type NonWordValue = [u8; WORD_SIZE * 2];

pub const NON_WORD_SIZE: usize = mem::size_of::<NonWordValue>();

pub mod buffer;
pub mod check;
pub mod compare;
pub mod harness;
pub mod patterns;
pub mod report;
pub mod seed;
pub mod tests;
