use std::sync::Arc;

use crate::buffer::BufferPoolManager;
use crate::common::{PageId, RecordId, Result, SlotId, TiliaError};
use crate::storage::page::HeapPageRef;

/// Forward cursor over a heap file, yielding each record together with its
/// record id. Exhaustion is reported as `Ok(None)`, never as an error.
pub struct FileScan {
    bpm: Arc<BufferPoolManager>,
    current_page_id: PageId,
    next_slot: u16,
}

impl FileScan {
    pub(crate) fn new(bpm: Arc<BufferPoolManager>, first_page_id: PageId) -> Self {
        Self {
            bpm,
            current_page_id: first_page_id,
            next_slot: 0,
        }
    }

    /// Returns the next `(record id, record bytes)` pair, or `None` once
    /// the heap is drained.
    pub fn next(&mut self) -> Result<Option<(RecordId, Vec<u8>)>> {
        loop {
            if !self.current_page_id.is_valid() {
                return Ok(None);
            }

            let guard = self
                .bpm
                .checked_read_page(self.current_page_id)?
                .ok_or(TiliaError::PageNotFound(self.current_page_id))?;
            let page = HeapPageRef::new(guard.data());

            if self.next_slot < page.num_slots() {
                let slot_id = SlotId::new(self.next_slot);
                self.next_slot += 1;
                let record = page.get_record(slot_id)?.to_vec();
                return Ok(Some((RecordId::new(self.current_page_id, slot_id), record)));
            }

            self.current_page_id = page.next_page();
            self.next_slot = 0;
        }
    }
}
