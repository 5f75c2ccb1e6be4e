macro_rules! sort_impl {
    ($name:expr) => {
        pub struct SortImpl;

        impl sort_test_tools::Sort for SortImpl {
            fn name() -> String {
                $name.into()
            }

            #[inline]
            fn sort_by<F>(v: &mut [u8], elem_size: usize, compare: F)
            where
                F: FnMut(&[u8], &[u8]) -> Ordering,
            {
                sort_by(v, elem_size, compare);
            }

            #[inline]
            fn sort_by_with_context<C, F>(v: &mut [u8], elem_size: usize, context: &C, compare: F)
            where
                C: ?Sized,
                F: FnMut(&C, &[u8], &[u8]) -> Ordering,
            {
                sort_by_with_context(v, elem_size, context, compare);
            }
        }
    };
}

pub mod raw;
pub mod unstable;
