//! Readers for the raw dataset files.

pub use tu::{compute_slices, read_tu_files, tu_filenames, TuConfig};
pub use txt::read_txt;

pub mod tu;

mod txt;
