mod blob_file;
mod disk_scheduler;

pub use blob_file::*;
pub use disk_scheduler::*;
