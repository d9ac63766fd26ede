use thiserror::Error;

use super::types::PageId;

/// Error surface of the index engine and its storage collaborators
#[derive(Error, Debug)]
pub enum TiliaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Page {0} not found")]
    PageNotFound(PageId),

    #[error("Invalid page ID: {0}")]
    InvalidPageId(PageId),

    #[error("Buffer pool is full, no evictable frames available")]
    BufferPoolFull,

    #[error("Disk scheduler error: {0}")]
    DiskScheduler(String),

    #[error("Page overflow: record of {record_size} bytes exceeds available space {available}")]
    PageOverflow { record_size: usize, available: usize },

    #[error("Invalid slot ID: {0}")]
    InvalidSlotId(u16),

    #[error("Slot {0} is empty")]
    EmptySlot(u16),

    #[error("Record of {record_len} bytes cannot hold a key at byte offset {attr_byte_offset}")]
    RecordTooShort {
        record_len: usize,
        attr_byte_offset: usize,
    },

    #[error("Index metadata mismatch: {0}")]
    BadIndexInfo(String),

    #[error("Bad scan opcodes: low operator must be GT or GTE, high operator LT or LTE")]
    BadOpcodes,

    #[error("Bad scan range: low bound exceeds high bound")]
    BadScanRange,

    #[error("No key satisfies the scan range")]
    NoSuchKeyFound,

    #[error("No scan has been initialized")]
    ScanNotInitialized,

    #[error("Index scan completed")]
    IndexScanCompleted,
}

pub type Result<T> = std::result::Result<T, TiliaError>;
