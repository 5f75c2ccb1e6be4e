use std::alloc::{self, Layout};
use std::mem;
use std::ptr::NonNull;
use std::slice;

use crate::WORD_SIZE;

/// Heap region holding `len` records of `item_size` bytes, reachable from two start addresses.
///
/// The allocation is `(len + 1) * item_size + 1` bytes. The aligned view starts at the
/// allocation base, the unaligned view one byte later. Both views cover `len * item_size` bytes
/// of the same memory, so writing through one is visible through the other.
pub struct TestBuffer {
    len: usize,
    item_size: usize,
    storage: Option<(NonNull<u8>, Layout)>,
}

impl TestBuffer {
    pub fn new(item_size: usize, len: usize) -> Self {
        assert!(item_size != 0, "zero sized records are not supported");

        if len == 0 {
            return Self {
                len,
                item_size,
                storage: None,
            };
        }

        let size = (len + 1)
            .checked_mul(item_size)
            .and_then(|bytes| bytes.checked_add(1))
            .expect("test buffer size overflows usize");
        let layout = Layout::from_size_align(size, mem::align_of::<usize>())
            .expect("test buffer layout exceeds isize::MAX");

        // SAFETY: `layout` has a non-zero size. Zeroing means every byte is initialized before
        // a view hands it out as `&mut [u8]`.
        let ptr = unsafe { alloc::alloc_zeroed(layout) };
        let Some(base) = NonNull::new(ptr) else {
            alloc::handle_alloc_error(layout);
        };

        // The allocator is relied upon for word alignment, a miss is not recoverable.
        assert_eq!(
            base.as_ptr() as usize % WORD_SIZE,
            0,
            "allocation is not word aligned"
        );

        Self {
            len,
            item_size,
            storage: Some((base, layout)),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn item_size(&self) -> usize {
        self.item_size
    }

    /// `None` for an empty buffer.
    pub fn aligned(&self) -> Option<&[u8]> {
        let len = self.view_len();
        // SAFETY: See `view_start`, shared borrow of `self` for a shared view.
        self.view_start(0)
            .map(|start| unsafe { slice::from_raw_parts(start, len) })
    }

    pub fn aligned_mut(&mut self) -> Option<&mut [u8]> {
        let len = self.view_len();
        // SAFETY: See `view_start`, unique borrow of `self` for a unique view.
        self.view_start(0)
            .map(|start| unsafe { slice::from_raw_parts_mut(start, len) })
    }

    /// `None` for an empty buffer.
    pub fn unaligned(&self) -> Option<&[u8]> {
        let len = self.view_len();
        // SAFETY: See `view_start`, shared borrow of `self` for a shared view.
        self.view_start(1)
            .map(|start| unsafe { slice::from_raw_parts(start, len) })
    }

    pub fn unaligned_mut(&mut self) -> Option<&mut [u8]> {
        let len = self.view_len();
        // SAFETY: See `view_start`, unique borrow of `self` for a unique view.
        self.view_start(1)
            .map(|start| unsafe { slice::from_raw_parts_mut(start, len) })
    }

    fn view_len(&self) -> usize {
        self.len * self.item_size
    }

    // `offset` is 0 or 1 and the allocation holds `view_len() + item_size + 1` bytes, so
    // `start..start + view_len()` is in bounds and zero initialized for either offset.
    fn view_start(&self, offset: usize) -> Option<*mut u8> {
        debug_assert!(offset <= 1);
        let (base, _) = self.storage?;

        // SAFETY: in bounds, see above.
        Some(unsafe { base.as_ptr().add(offset) })
    }
}

impl Drop for TestBuffer {
    fn drop(&mut self) {
        if let Some((base, layout)) = self.storage.take() {
            // SAFETY: `base` was returned by `alloc_zeroed` with exactly this `layout`.
            unsafe { alloc::dealloc(base.as_ptr(), layout) };
        }
    }
}
