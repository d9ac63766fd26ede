use std::path::Path;
use std::sync::Arc;

use log::debug;

use crate::buffer::{BufferPoolManager, ReadPageGuard};
use crate::common::{
    PageId, RecordId, Result, TiliaError, DEFAULT_LRUK_K, INVALID_PAGE_ID, KEY_SENTINEL,
};
use crate::storage::disk::BlobFile;
use crate::storage::heap::FileScan;

use super::btree_meta::{AttrType, MetaPage, MetaPageRef, RELATION_NAME_LEN};
use super::btree_node::{InternalNode, InternalNodeRef, LeafNode, LeafNodeRef, LEAF_CAPACITY};

/// Comparison operators accepted by [`BTreeIndex::start_scan`]. The
/// numeric values are stable so callers can persist operator choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ScanOp {
    Lt = 0,
    Lte = 1,
    Gte = 2,
    Gt = 3,
}

impl ScanOp {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Lt),
            1 => Some(Self::Lte),
            2 => Some(Self::Gte),
            3 => Some(Self::Gt),
            _ => None,
        }
    }
}

/// The meta page is always the first page of the index file.
const HEADER_PAGE_ID: PageId = PageId::new(1);

/// Cursor state for the single in-flight range scan. The low bound is
/// consumed while positioning; only the high bound is needed to advance.
struct ScanState {
    active: bool,
    current_page_id: PageId,
    /// Pinned leaf currently being read
    current_page: Option<ReadPageGuard>,
    /// Index of the next unread entry within the current leaf
    next_entry: usize,
    high: i32,
    high_op: ScanOp,
}

impl ScanState {
    fn idle() -> Self {
        Self {
            active: false,
            current_page_id: INVALID_PAGE_ID,
            current_page: None,
            next_entry: 0,
            high: 0,
            high_op: ScanOp::Lte,
        }
    }
}

/// Operators are validated before a scan starts, so only GT/GTE reach the
/// low predicate and only LT/LTE the high one.
fn low_bound_ok(key: i32, bound: i32, op: ScanOp) -> bool {
    match op {
        ScanOp::Gt => key > bound,
        _ => key >= bound,
    }
}

fn high_bound_ok(key: i32, bound: i32, op: ScanOp) -> bool {
    match op {
        ScanOp::Lt => key < bound,
        _ => key <= bound,
    }
}

/// A disk-resident B+Tree index over one integer attribute of a record
/// relation.
///
/// The index file is named `"<relation>.<attr_byte_offset>"` and owns its
/// pages through a buffer pool: page 1 is the meta page, page 2 the first
/// root, and further pages are allocated as the tree grows. The root is
/// always an internal node, so a fresh tree bootstraps through two special
/// shapes before the general insert path takes over: an empty root, then a
/// root with a single (possibly under-filled) leaf child.
///
/// One range scan may be in flight at a time; the scan keeps its current
/// leaf pinned between calls and walks the right-sibling chain.
pub struct BTreeIndex {
    bpm: Arc<BufferPoolManager>,
    root_page_id: PageId,
    attr_byte_offset: usize,
    attr_type: AttrType,
    /// Mirror of the meta page's allocation counter
    num_pages: u32,
    scan: ScanState,
}

impl BTreeIndex {
    /// Derives the index file name for a relation and attribute offset.
    pub fn index_file_name(relation_name: &str, attr_byte_offset: usize) -> String {
        format!("{}.{}", relation_name, attr_byte_offset)
    }

    /// Opens the index for `relation_name` over the integer attribute at
    /// `attr_byte_offset`, creating the index file under `dir` when it
    /// does not exist. On reopen the stored metadata must match the
    /// requested parameters or the index fails to open with
    /// `BadIndexInfo`.
    pub fn open_or_create(
        dir: &Path,
        relation_name: &str,
        attr_byte_offset: usize,
        attr_type: AttrType,
        pool_size: usize,
    ) -> Result<Self> {
        let path = dir.join(Self::index_file_name(relation_name, attr_byte_offset));

        if BlobFile::exists(&path) {
            let file = Arc::new(BlobFile::open(&path)?);
            let bpm = Arc::new(BufferPoolManager::new(pool_size, DEFAULT_LRUK_K, file));

            let (root_page_id, num_pages) = {
                let guard = bpm
                    .checked_read_page(HEADER_PAGE_ID)?
                    .ok_or(TiliaError::PageNotFound(HEADER_PAGE_ID))?;
                let meta = MetaPageRef::new(guard.data());

                let requested_name =
                    &relation_name.as_bytes()[..relation_name.len().min(RELATION_NAME_LEN)];
                if meta.relation_name() != requested_name
                    || meta.attr_byte_offset() != attr_byte_offset
                    || meta.attr_type_raw() != attr_type.as_i32()
                {
                    return Err(TiliaError::BadIndexInfo(path.display().to_string()));
                }
                (meta.root_page(), meta.num_pages())
            };

            debug!(
                "opened index {} (root={}, pages={})",
                path.display(),
                root_page_id,
                num_pages
            );
            Ok(Self {
                bpm,
                root_page_id,
                attr_byte_offset,
                attr_type,
                num_pages,
                scan: ScanState::idle(),
            })
        } else {
            let file = Arc::new(BlobFile::create(&path)?);
            let bpm = Arc::new(BufferPoolManager::new(pool_size, DEFAULT_LRUK_K, file));

            let header_page_id = bpm.new_page()?;
            debug_assert_eq!(header_page_id, HEADER_PAGE_ID);
            let root_page_id = bpm.new_page()?;

            {
                let mut guard = bpm
                    .checked_write_page(root_page_id)?
                    .ok_or(TiliaError::PageNotFound(root_page_id))?;
                InternalNode::new(guard.data_mut()).init(1);
            }
            {
                let mut guard = bpm
                    .checked_write_page(header_page_id)?
                    .ok_or(TiliaError::PageNotFound(header_page_id))?;
                MetaPage::new(guard.data_mut()).init(
                    relation_name,
                    attr_byte_offset,
                    attr_type,
                    root_page_id,
                    2,
                );
            }

            debug!("created index {} (root={})", path.display(), root_page_id);
            Ok(Self {
                bpm,
                root_page_id,
                attr_byte_offset,
                attr_type,
                num_pages: 2,
                scan: ScanState::idle(),
            })
        }
    }

    pub fn root_page_id(&self) -> PageId {
        self.root_page_id
    }

    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    pub fn attr_byte_offset(&self) -> usize {
        self.attr_byte_offset
    }

    pub fn attr_type(&self) -> AttrType {
        self.attr_type
    }

    /// Returns the buffer pool backing this index.
    pub fn buffer_pool(&self) -> &Arc<BufferPoolManager> {
        &self.bpm
    }

    /// Flushes every dirty index page to the file.
    pub fn flush(&self) -> Result<()> {
        self.bpm.flush_all_pages()
    }

    /// Allocates a fresh node page and records it in the meta page.
    fn allocate_node_page(&mut self) -> Result<PageId> {
        let page_id = self.bpm.new_page()?;
        self.num_pages += 1;

        let mut guard = self
            .bpm
            .checked_write_page(HEADER_PAGE_ID)?
            .ok_or(TiliaError::PageNotFound(HEADER_PAGE_ID))?;
        MetaPage::new(guard.data_mut()).set_num_pages(self.num_pages);

        Ok(page_id)
    }

    fn set_root(&mut self, root_page_id: PageId) -> Result<()> {
        self.root_page_id = root_page_id;

        let mut guard = self
            .bpm
            .checked_write_page(HEADER_PAGE_ID)?
            .ok_or(TiliaError::PageNotFound(HEADER_PAGE_ID))?;
        MetaPage::new(guard.data_mut()).set_root_page(root_page_id);

        Ok(())
    }

    /// Inserts a `(key, record id)` entry. Duplicate keys are permitted;
    /// real keys must stay strictly below the sentinel.
    pub fn insert(&mut self, key: i32, rid: RecordId) -> Result<()> {
        debug_assert!(key < KEY_SENTINEL);
        debug_assert!(rid.is_valid());

        let first_child = {
            let guard = self
                .bpm
                .checked_read_page(self.root_page_id)?
                .ok_or(TiliaError::PageNotFound(self.root_page_id))?;
            InternalNodeRef::new(guard.data()).child(0)
        };

        if !first_child.is_valid() {
            return self.insert_first_entry(key, rid);
        }
        if self.num_pages == 3 {
            return self.insert_into_sole_leaf(first_child, key, rid);
        }
        self.insert_general(key, rid)
    }

    /// First insert into an empty tree: materialize the first leaf under
    /// the root. The bootstrap separator `key + 1` routes every key up to
    /// and including `key` into the sole child; it is rewritten when that
    /// leaf first splits.
    fn insert_first_entry(&mut self, key: i32, rid: RecordId) -> Result<()> {
        let leaf_page_id = self.allocate_node_page()?;

        {
            let mut guard = self
                .bpm
                .checked_write_page(leaf_page_id)?
                .ok_or(TiliaError::PageNotFound(leaf_page_id))?;
            let mut leaf = LeafNode::new(guard.data_mut());
            leaf.init();
            leaf.insert(key, rid);
        }
        {
            let mut guard = self
                .bpm
                .checked_write_page(self.root_page_id)?
                .ok_or(TiliaError::PageNotFound(self.root_page_id))?;
            let mut root = InternalNode::new(guard.data_mut());
            root.set_key(0, key + 1);
            root.set_child(0, leaf_page_id);
        }

        debug!("created first leaf {} for key {}", leaf_page_id, key);
        Ok(())
    }

    /// While the tree holds a single leaf, inserts bypass navigation: the
    /// sole child may stay under half-full until it first fills up.
    fn insert_into_sole_leaf(
        &mut self,
        leaf_page_id: PageId,
        key: i32,
        rid: RecordId,
    ) -> Result<()> {
        let full = {
            let guard = self
                .bpm
                .checked_read_page(leaf_page_id)?
                .ok_or(TiliaError::PageNotFound(leaf_page_id))?;
            LeafNodeRef::new(guard.data()).is_full()
        };

        if !full {
            let mut guard = self
                .bpm
                .checked_write_page(leaf_page_id)?
                .ok_or(TiliaError::PageNotFound(leaf_page_id))?;
            LeafNode::new(guard.data_mut()).insert(key, rid);
            return Ok(());
        }

        // First split: the new leaf's first key replaces the bootstrap
        // separator, leaving a consistent two-child root.
        let (new_leaf_id, split_key) = self.split_leaf(leaf_page_id, key, rid)?;
        {
            let mut guard = self
                .bpm
                .checked_write_page(self.root_page_id)?
                .ok_or(TiliaError::PageNotFound(self.root_page_id))?;
            let mut root = InternalNode::new(guard.data_mut());
            root.set_key(0, split_key);
            root.set_child(1, new_leaf_id);
        }
        Ok(())
    }

    /// General insert: descend to the target leaf, insert in place when it
    /// has room, otherwise split and propagate separators up the recorded
    /// path, growing a new root if the promotion outruns it.
    fn insert_general(&mut self, key: i32, rid: RecordId) -> Result<()> {
        let (path, leaf_page_id) = self.locate_insert_path(key)?;

        let has_room = {
            let guard = self
                .bpm
                .checked_read_page(leaf_page_id)?
                .ok_or(TiliaError::PageNotFound(leaf_page_id))?;
            !LeafNodeRef::new(guard.data()).is_full()
        };

        if has_room {
            let mut guard = self
                .bpm
                .checked_write_page(leaf_page_id)?
                .ok_or(TiliaError::PageNotFound(leaf_page_id))?;
            LeafNode::new(guard.data_mut()).insert(key, rid);
            return Ok(());
        }

        let (new_leaf_id, split_key) = self.split_leaf(leaf_page_id, key, rid)?;

        let mut carry = (split_key, new_leaf_id);
        let mut absorbed = false;
        for &(node_page_id, child_slot) in path.iter().rev() {
            let full = {
                let guard = self
                    .bpm
                    .checked_read_page(node_page_id)?
                    .ok_or(TiliaError::PageNotFound(node_page_id))?;
                InternalNodeRef::new(guard.data()).is_full()
            };

            if !full {
                let mut guard = self
                    .bpm
                    .checked_write_page(node_page_id)?
                    .ok_or(TiliaError::PageNotFound(node_page_id))?;
                InternalNode::new(guard.data_mut()).insert_at(child_slot, carry.0, carry.1);
                absorbed = true;
                break;
            }

            carry = self.split_internal(node_page_id, child_slot, carry.0, carry.1)?;
        }

        if !absorbed {
            self.grow_root(carry.0, carry.1)?;
        }
        Ok(())
    }

    /// Splits the full leaf around the incoming pair and splices the new
    /// leaf into the sibling chain. Returns the new leaf's page id and its
    /// first key (the separator for the parent).
    fn split_leaf(
        &mut self,
        leaf_page_id: PageId,
        key: i32,
        rid: RecordId,
    ) -> Result<(PageId, i32)> {
        let new_leaf_id = self.allocate_node_page()?;

        let (upper, old_sibling) = {
            let mut guard = self
                .bpm
                .checked_write_page(leaf_page_id)?
                .ok_or(TiliaError::PageNotFound(leaf_page_id))?;
            let mut leaf = LeafNode::new(guard.data_mut());
            let old_sibling = leaf.right_sibling();
            let upper = leaf.split_with(key, rid);
            leaf.set_right_sibling(new_leaf_id);
            (upper, old_sibling)
        };

        let split_key = upper[0].0;
        {
            let mut guard = self
                .bpm
                .checked_write_page(new_leaf_id)?
                .ok_or(TiliaError::PageNotFound(new_leaf_id))?;
            let mut leaf = LeafNode::new(guard.data_mut());
            leaf.init();
            leaf.extend_from(&upper);
            leaf.set_right_sibling(old_sibling);
        }

        debug!(
            "split leaf {} -> {} ({} entries moved)",
            leaf_page_id,
            new_leaf_id,
            upper.len()
        );
        Ok((new_leaf_id, split_key))
    }

    /// Splits a full internal node around a pending separator. Returns the
    /// promoted key and the new right node's page id.
    fn split_internal(
        &mut self,
        node_page_id: PageId,
        child_slot: usize,
        key: i32,
        right_child: PageId,
    ) -> Result<(i32, PageId)> {
        let new_node_id = self.allocate_node_page()?;

        let (promoted, right_keys, right_children, level) = {
            let mut guard = self
                .bpm
                .checked_write_page(node_page_id)?
                .ok_or(TiliaError::PageNotFound(node_page_id))?;
            let mut node = InternalNode::new(guard.data_mut());
            let level = node.level();
            let (promoted, right_keys, right_children) =
                node.split_with(child_slot, key, right_child);
            (promoted, right_keys, right_children, level)
        };

        {
            let mut guard = self
                .bpm
                .checked_write_page(new_node_id)?
                .ok_or(TiliaError::PageNotFound(new_node_id))?;
            let mut node = InternalNode::new(guard.data_mut());
            node.init(level);
            node.extend_from(&right_keys, &right_children);
        }

        debug!(
            "split internal {} -> {} (promoted key {})",
            node_page_id, new_node_id, promoted
        );
        Ok((promoted, new_node_id))
    }

    /// Installs a new root above the old one after a root split.
    fn grow_root(&mut self, separator: i32, right_child: PageId) -> Result<()> {
        let old_root = self.root_page_id;
        let old_level = {
            let guard = self
                .bpm
                .checked_read_page(old_root)?
                .ok_or(TiliaError::PageNotFound(old_root))?;
            InternalNodeRef::new(guard.data()).level()
        };

        let new_root_id = self.allocate_node_page()?;
        {
            let mut guard = self
                .bpm
                .checked_write_page(new_root_id)?
                .ok_or(TiliaError::PageNotFound(new_root_id))?;
            let mut root = InternalNode::new(guard.data_mut());
            root.init(old_level + 1);
            root.extend_from(&[separator], &[old_root, right_child]);
        }
        self.set_root(new_root_id)?;

        debug!(
            "root grew: {} above {} (level {})",
            new_root_id,
            old_root,
            old_level + 1
        );
        Ok(())
    }

    /// Descends from the root to the leaf that owns `key`, recording each
    /// internal node and the child slot taken. The last path element is
    /// the level-1 parent of the returned leaf; the leaf itself comes back
    /// unpinned. Each internal page is pinned only while its slot is read.
    fn locate_insert_path(&self, key: i32) -> Result<(Vec<(PageId, usize)>, PageId)> {
        let mut path = Vec::new();
        let mut current = self.root_page_id;

        loop {
            let (slot, child, at_leaf_parent) = {
                let guard = self
                    .bpm
                    .checked_read_page(current)?
                    .ok_or(TiliaError::PageNotFound(current))?;
                let node = InternalNodeRef::new(guard.data());
                let slot = node.child_index(key);
                (slot, node.child(slot), node.level() == 1)
            };

            path.push((current, slot));
            if at_leaf_parent {
                return Ok((path, child));
            }
            current = child;
        }
    }

    /// Leaf page where a scan bounded below by `low` starts; returned
    /// unpinned. The descent picks the smallest separator greater than or
    /// equal to `low` at each node, so entries equal to a separator stay
    /// reachable even when they sit at the end of the left subtree.
    fn locate_scan_leaf(&self, low: i32) -> Result<PageId> {
        let mut current = self.root_page_id;

        loop {
            let (child, at_leaf_parent) = {
                let guard = self
                    .bpm
                    .checked_read_page(current)?
                    .ok_or(TiliaError::PageNotFound(current))?;
                let node = InternalNodeRef::new(guard.data());
                let slot = node.scan_child_index(low);
                (node.child(slot), node.level() == 1)
            };

            if at_leaf_parent {
                return Ok(child);
            }
            current = child;
        }
    }

    /// Begins a range scan bounded below by `(low, low_op)` and above by
    /// `(high, high_op)`. Any scan already in flight is ended first. On
    /// success the cursor is positioned on the first qualifying entry and
    /// its leaf stays pinned until the scan advances past it or ends.
    pub fn start_scan(&mut self, low: i32, low_op: ScanOp, high: i32, high_op: ScanOp) -> Result<()> {
        if !matches!(low_op, ScanOp::Gt | ScanOp::Gte)
            || !matches!(high_op, ScanOp::Lt | ScanOp::Lte)
        {
            return Err(TiliaError::BadOpcodes);
        }
        if low > high {
            return Err(TiliaError::BadScanRange);
        }

        if self.scan.active {
            self.end_scan()?;
        }

        let first_child = {
            let guard = self
                .bpm
                .checked_read_page(self.root_page_id)?
                .ok_or(TiliaError::PageNotFound(self.root_page_id))?;
            InternalNodeRef::new(guard.data()).child(0)
        };
        if !first_child.is_valid() {
            return Err(TiliaError::NoSuchKeyFound);
        }

        // While the bootstrap separator is in place every entry lives in
        // the root's sole child; navigating by separator would misroute
        // low bounds above it, exactly as inserts would.
        let mut page_id = if self.num_pages == 3 {
            first_child
        } else {
            self.locate_scan_leaf(low)?
        };
        let mut guard = self
            .bpm
            .checked_read_page(page_id)?
            .ok_or(TiliaError::PageNotFound(page_id))?;
        let mut entry = 0usize;

        loop {
            let (occupancy, sibling) = {
                let leaf = LeafNodeRef::new(guard.data());
                (leaf.occupancy(), leaf.right_sibling())
            };

            if entry >= occupancy {
                if !sibling.is_valid() {
                    return Err(TiliaError::NoSuchKeyFound);
                }
                guard = self
                    .bpm
                    .checked_read_page(sibling)?
                    .ok_or(TiliaError::PageNotFound(sibling))?;
                page_id = sibling;
                entry = 0;
                continue;
            }

            let key = LeafNodeRef::new(guard.data()).key(entry);
            if !low_bound_ok(key, low, low_op) {
                entry += 1;
                continue;
            }
            if !high_bound_ok(key, high, high_op) {
                return Err(TiliaError::NoSuchKeyFound);
            }

            self.scan = ScanState {
                active: true,
                current_page_id: page_id,
                current_page: Some(guard),
                next_entry: entry,
                high,
                high_op,
            };
            return Ok(());
        }
    }

    /// Returns the record id of the next entry that matches the scan, or
    /// `IndexScanCompleted` once the range is exhausted. The scan state is
    /// preserved on completion so the caller can still end the scan.
    pub fn scan_next(&mut self) -> Result<RecordId> {
        if !self.scan.active {
            return Err(TiliaError::ScanNotInitialized);
        }

        loop {
            let (next, sibling) = {
                let guard = self
                    .scan
                    .current_page
                    .as_ref()
                    .ok_or(TiliaError::ScanNotInitialized)?;
                let leaf = LeafNodeRef::new(guard.data());

                // Slots past the occupied prefix hold an invalid record
                // id; either way the leaf is exhausted.
                if self.scan.next_entry >= LEAF_CAPACITY
                    || !leaf.rid(self.scan.next_entry).is_valid()
                {
                    (None, leaf.right_sibling())
                } else {
                    (
                        Some((leaf.key(self.scan.next_entry), leaf.rid(self.scan.next_entry))),
                        INVALID_PAGE_ID,
                    )
                }
            };

            let (key, rid) = match next {
                Some(entry) => entry,
                None => {
                    if !sibling.is_valid() {
                        return Err(TiliaError::IndexScanCompleted);
                    }
                    let next_guard = self
                        .bpm
                        .checked_read_page(sibling)?
                        .ok_or(TiliaError::PageNotFound(sibling))?;
                    // Replacing the guard unpins the exhausted leaf.
                    self.scan.current_page = Some(next_guard);
                    self.scan.current_page_id = sibling;
                    self.scan.next_entry = 0;
                    continue;
                }
            };

            if !high_bound_ok(key, self.scan.high, self.scan.high_op) {
                return Err(TiliaError::IndexScanCompleted);
            }

            self.scan.next_entry += 1;
            return Ok(rid);
        }
    }

    /// Terminates the in-flight scan, unpinning its leaf and resetting the
    /// cursor. Fails with `ScanNotInitialized` when no scan is active,
    /// including on a second consecutive call.
    pub fn end_scan(&mut self) -> Result<()> {
        if !self.scan.active {
            return Err(TiliaError::ScanNotInitialized);
        }

        debug!("scan ended at page {}", self.scan.current_page_id);
        self.scan = ScanState::idle();
        Ok(())
    }

    /// Bulk-builds the index from a relation scan: one entry per record,
    /// with the key read from the configured attribute byte offset.
    pub fn bulk_load(&mut self, scan: &mut FileScan) -> Result<usize> {
        let mut inserted = 0;

        while let Some((rid, record)) = scan.next()? {
            let key = extract_key(&record, self.attr_byte_offset)?;
            self.insert(key, rid)?;
            inserted += 1;
        }

        debug!("bulk load complete: {} entries", inserted);
        Ok(inserted)
    }
}

impl Drop for BTreeIndex {
    fn drop(&mut self) {
        // End any live scan before flushing; failures are swallowed.
        if self.scan.active {
            let _ = self.end_scan();
        }
        let _ = self.flush();
    }
}

/// Reads the little-endian `i32` attribute at `attr_byte_offset` of a
/// record.
fn extract_key(record: &[u8], attr_byte_offset: usize) -> Result<i32> {
    let end = attr_byte_offset
        .checked_add(std::mem::size_of::<i32>())
        .filter(|&end| end <= record.len())
        .ok_or(TiliaError::RecordTooShort {
            record_len: record.len(),
            attr_byte_offset,
        })?;
    Ok(i32::from_le_bytes(
        record[attr_byte_offset..end].try_into().unwrap(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_op_wire_values() {
        assert_eq!(ScanOp::Lt.as_u8(), 0);
        assert_eq!(ScanOp::Lte.as_u8(), 1);
        assert_eq!(ScanOp::Gte.as_u8(), 2);
        assert_eq!(ScanOp::Gt.as_u8(), 3);

        for op in [ScanOp::Lt, ScanOp::Lte, ScanOp::Gte, ScanOp::Gt] {
            assert_eq!(ScanOp::from_u8(op.as_u8()), Some(op));
        }
        assert_eq!(ScanOp::from_u8(9), None);
    }

    #[test]
    fn test_extract_key() {
        let mut record = vec![0u8; 12];
        record[4..8].copy_from_slice(&(-77i32).to_le_bytes());

        assert_eq!(extract_key(&record, 4).unwrap(), -77);
        assert!(matches!(
            extract_key(&record, 10),
            Err(TiliaError::RecordTooShort { .. })
        ));
        assert!(matches!(
            extract_key(&record, usize::MAX - 1),
            Err(TiliaError::RecordTooShort { .. })
        ));
    }

    #[test]
    fn test_index_file_name() {
        assert_eq!(BTreeIndex::index_file_name("employees", 8), "employees.8");
    }
}
