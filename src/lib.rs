//! Tilia - a disk-resident B+Tree index over integer record attributes
//!
//! This crate indexes a single integer-valued attribute of a record
//! relation: the relation lives in an append-only heap file, and the index
//! maps attribute values to the record ids of the tuples that carry them.
//! Both structures store their state in fixed-size pages cached by a
//! buffer pool.
//!
//! # Architecture
//!
//! The system is organized into several layers:
//!
//! - **Storage Layer** (`storage`): disk I/O and page organization
//!   - `BlobFile`: maps 1-based page numbers to regions of a single file
//!   - `DiskScheduler`: background worker serializing page I/O
//!   - `HeapPage`: slotted record page with a next-page chain
//!   - `HeapFile` / `FileScan`: append-only relation heap and its scanner
//!
//! - **Buffer Pool** (`buffer`): memory management for pages
//!   - `BufferPoolManager`: caches blob-file pages in a fixed frame set
//!   - `LruKReplacer`: LRU-K page replacement policy
//!   - `ReadPageGuard` / `WritePageGuard`: RAII pin guards
//!
//! - **Index** (`index`): the B+Tree engine
//!   - `BTreeIndex`: bulk construction, insertion with node splitting and
//!     root growth, and single-cursor range scans over linked leaves
//!   - `LeafNode` / `InternalNode`: on-page node layouts
//!   - `MetaPage`: index header with relation metadata
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use tilia::buffer::BufferPoolManager;
//! use tilia::index::{AttrType, BTreeIndex, ScanOp};
//! use tilia::storage::disk::BlobFile;
//! use tilia::storage::heap::HeapFile;
//!
//! // Build a small relation: each record starts with its i32 key.
//! let relation = Arc::new(BlobFile::create("demo.rel").unwrap());
//! let heap_bpm = Arc::new(BufferPoolManager::new(16, 2, relation));
//! let mut heap = HeapFile::create(Arc::clone(&heap_bpm)).unwrap();
//! heap.append(&42i32.to_le_bytes()).unwrap();
//! heap.append(&7i32.to_le_bytes()).unwrap();
//!
//! // Index the attribute at byte offset 0 and scan the range [0, 100].
//! let mut index =
//!     BTreeIndex::open_or_create(Path::new("."), "demo.rel", 0, AttrType::Integer, 16).unwrap();
//! index.bulk_load(&mut heap.scan()).unwrap();
//!
//! index.start_scan(0, ScanOp::Gte, 100, ScanOp::Lte).unwrap();
//! while let Ok(rid) = index.scan_next() {
//!     println!("matched record {:?}", rid);
//! }
//! index.end_scan().unwrap();
//! ```

pub mod buffer;
pub mod common;
pub mod index;
pub mod storage;

// Re-export commonly used types at the crate root
pub use common::{PageId, RecordId, Result, SlotId, TiliaError};
