pub mod rust_heapsort;
pub mod rust_quicksort;
pub mod rust_std;
