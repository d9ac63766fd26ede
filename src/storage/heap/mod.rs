mod file_scan;
mod heap_file;

pub use file_scan::*;
pub use heap_file::*;
