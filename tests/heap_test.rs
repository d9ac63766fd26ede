use std::path::Path;
use std::sync::Arc;

use tilia::buffer::BufferPoolManager;
use tilia::common::{PageId, SlotId};
use tilia::index::{AttrType, BTreeIndex, ScanOp};
use tilia::storage::disk::BlobFile;
use tilia::storage::heap::HeapFile;
use tilia::TiliaError;

use tempfile::TempDir;

fn create_heap(dir: &Path, name: &str, pool_size: usize) -> (HeapFile, Arc<BufferPoolManager>) {
    let blob_file = Arc::new(BlobFile::create(dir.join(name)).unwrap());
    let bpm = Arc::new(BufferPoolManager::new(pool_size, 2, blob_file));
    let heap = HeapFile::create(Arc::clone(&bpm)).unwrap();
    (heap, bpm)
}

/// Record layout used across these tests: a u32 tag, then the i32 key.
fn make_record(tag: u32, key: i32) -> Vec<u8> {
    let mut record = tag.to_le_bytes().to_vec();
    record.extend_from_slice(&key.to_le_bytes());
    record
}

#[test]
fn test_heap_append_and_scan_order() {
    let dir = TempDir::new().unwrap();
    let (mut heap, _bpm) = create_heap(dir.path(), "order.rel", 16);

    let mut rids = Vec::new();
    for i in 0..10u32 {
        rids.push(heap.append(&make_record(i, i as i32)).unwrap());
    }

    assert_eq!(rids[0].page_id, heap.first_page_id());
    assert_eq!(rids[0].slot_id, SlotId::new(0));
    assert_eq!(rids[1].slot_id, SlotId::new(1));

    let mut scan = heap.scan();
    for i in 0..10u32 {
        let (rid, record) = scan.next().unwrap().unwrap();
        assert_eq!(rid, rids[i as usize]);
        assert_eq!(record, make_record(i, i as i32));
    }
    assert!(scan.next().unwrap().is_none());
    // A drained scan stays drained.
    assert!(scan.next().unwrap().is_none());
}

#[test]
fn test_heap_grows_across_pages() {
    let dir = TempDir::new().unwrap();
    let (mut heap, bpm) = create_heap(dir.path(), "grow.rel", 16);

    // 300 records of ~100 bytes exceed a single 8 KiB page.
    let payload = [7u8; 100];
    let mut rids = Vec::new();
    for _ in 0..300 {
        rids.push(heap.append(&payload).unwrap());
    }

    let pages_used: std::collections::HashSet<PageId> =
        rids.iter().map(|rid| rid.page_id).collect();
    assert!(pages_used.len() > 1, "records should spill onto more pages");
    assert!(bpm.blob_file().num_pages() as usize >= pages_used.len());

    let mut scanned = 0;
    let mut scan = heap.scan();
    while let Some((rid, record)) = scan.next().unwrap() {
        assert_eq!(rid, rids[scanned]);
        assert_eq!(record, payload);
        scanned += 1;
    }
    assert_eq!(scanned, 300);
}

#[test]
fn test_heap_reopen_appends_at_tail() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reopen.rel");

    let (first_page_id, count_before) = {
        let blob_file = Arc::new(BlobFile::create(&path).unwrap());
        let bpm = Arc::new(BufferPoolManager::new(16, 2, blob_file));
        let mut heap = HeapFile::create(Arc::clone(&bpm)).unwrap();
        for i in 0..200u32 {
            heap.append(&make_record(i, i as i32)).unwrap();
        }
        bpm.flush_all_pages().unwrap();
        (heap.first_page_id(), 200usize)
    };

    let blob_file = Arc::new(BlobFile::open(&path).unwrap());
    let bpm = Arc::new(BufferPoolManager::new(16, 2, blob_file));
    let mut heap = HeapFile::open(Arc::clone(&bpm), first_page_id).unwrap();
    heap.append(&make_record(999, 999)).unwrap();

    let mut scanned = 0;
    let mut scan = heap.scan();
    while scan.next().unwrap().is_some() {
        scanned += 1;
    }
    assert_eq!(scanned, count_before + 1);
}

#[test]
fn test_bulk_load_indexes_every_record() {
    use rand::seq::SliceRandom;
    use rand::thread_rng;

    let dir = TempDir::new().unwrap();
    let (mut heap, _bpm) = create_heap(dir.path(), "bulk.rel", 32);

    let mut keys: Vec<i32> = (0..2000).collect();
    keys.shuffle(&mut thread_rng());

    // The key lives at byte offset 4, after the tag.
    let mut expected: Vec<(i32, tilia::RecordId)> = Vec::new();
    for (tag, &key) in keys.iter().enumerate() {
        let rid = heap.append(&make_record(tag as u32, key)).unwrap();
        expected.push((key, rid));
    }
    expected.sort_by_key(|&(key, _)| key);

    let mut index =
        BTreeIndex::open_or_create(dir.path(), "bulk.rel", 4, AttrType::Integer, 64).unwrap();
    let loaded = index.bulk_load(&mut heap.scan()).unwrap();
    assert_eq!(loaded, keys.len());

    // The index scan must agree with a linear filter of the relation.
    index.start_scan(500, ScanOp::Gte, 1500, ScanOp::Lte).unwrap();
    let mut got = Vec::new();
    loop {
        match index.scan_next() {
            Ok(rid) => got.push(rid),
            Err(TiliaError::IndexScanCompleted) => break,
            Err(e) => panic!("scan failed: {}", e),
        }
    }
    index.end_scan().unwrap();

    let filtered: Vec<tilia::RecordId> = expected
        .iter()
        .filter(|&&(key, _)| (500..=1500).contains(&key))
        .map(|&(_, rid)| rid)
        .collect();
    assert_eq!(got, filtered);
}

#[test]
fn test_bulk_load_rejects_short_records() {
    let dir = TempDir::new().unwrap();
    let (mut heap, _bpm) = create_heap(dir.path(), "short.rel", 16);

    heap.append(&make_record(0, 42)).unwrap();
    heap.append(b"xy").unwrap();

    let mut index =
        BTreeIndex::open_or_create(dir.path(), "short.rel", 4, AttrType::Integer, 64).unwrap();
    let result = index.bulk_load(&mut heap.scan());
    assert!(matches!(result, Err(TiliaError::RecordTooShort { .. })));
}
