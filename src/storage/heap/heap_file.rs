use std::sync::Arc;

use crate::buffer::BufferPoolManager;
use crate::common::{PageId, RecordId, Result, TiliaError};
use crate::storage::page::{HeapPage, HeapPageRef};

use super::FileScan;

/// Append-only heap of variable-length records, chained page to page
/// through each page's next link. Records are never deleted or moved, so a
/// `RecordId` handed out by [`HeapFile::append`] stays valid for the life
/// of the file.
pub struct HeapFile {
    bpm: Arc<BufferPoolManager>,
    first_page_id: PageId,
    /// Tail of the chain; appends go here.
    last_page_id: PageId,
}

impl HeapFile {
    /// Creates a heap with a single empty page.
    pub fn create(bpm: Arc<BufferPoolManager>) -> Result<Self> {
        let first_page_id = bpm.new_page()?;

        {
            let mut guard = bpm
                .checked_write_page(first_page_id)?
                .ok_or(TiliaError::PageNotFound(first_page_id))?;
            HeapPage::new(guard.data_mut()).init(first_page_id);
        }

        Ok(Self {
            bpm,
            first_page_id,
            last_page_id: first_page_id,
        })
    }

    /// Opens an existing heap from its first page, walking the chain to
    /// find the append target.
    pub fn open(bpm: Arc<BufferPoolManager>, first_page_id: PageId) -> Result<Self> {
        let mut last_page_id = first_page_id;

        loop {
            let next = {
                let guard = bpm
                    .checked_read_page(last_page_id)?
                    .ok_or(TiliaError::PageNotFound(last_page_id))?;
                HeapPageRef::new(guard.data()).next_page()
            };
            if !next.is_valid() {
                break;
            }
            last_page_id = next;
        }

        Ok(Self {
            bpm,
            first_page_id,
            last_page_id,
        })
    }

    pub fn first_page_id(&self) -> PageId {
        self.first_page_id
    }

    /// Appends a record, growing the chain when the tail page is full.
    pub fn append(&mut self, record: &[u8]) -> Result<RecordId> {
        {
            let mut guard = self
                .bpm
                .checked_write_page(self.last_page_id)?
                .ok_or(TiliaError::PageNotFound(self.last_page_id))?;
            let mut page = HeapPage::new(guard.data_mut());
            if page.can_insert(record.len()) {
                let slot_id = page.insert_record(record)?;
                return Ok(RecordId::new(self.last_page_id, slot_id));
            }
        }

        let new_page_id = self.bpm.new_page()?;
        {
            let mut guard = self
                .bpm
                .checked_write_page(new_page_id)?
                .ok_or(TiliaError::PageNotFound(new_page_id))?;
            HeapPage::new(guard.data_mut()).init(new_page_id);
        }
        {
            let mut guard = self
                .bpm
                .checked_write_page(self.last_page_id)?
                .ok_or(TiliaError::PageNotFound(self.last_page_id))?;
            HeapPage::new(guard.data_mut()).set_next_page(new_page_id);
        }
        self.last_page_id = new_page_id;

        let mut guard = self
            .bpm
            .checked_write_page(new_page_id)?
            .ok_or(TiliaError::PageNotFound(new_page_id))?;
        let mut page = HeapPage::new(guard.data_mut());
        let slot_id = page.insert_record(record)?;
        Ok(RecordId::new(new_page_id, slot_id))
    }

    /// Sequential scan over every record in insertion order.
    pub fn scan(&self) -> FileScan {
        FileScan::new(Arc::clone(&self.bpm), self.first_page_id)
    }
}
