use std::path::Path;
use std::sync::Arc;

use tilia::buffer::BufferPoolManager;
use tilia::index::{AttrType, BTreeIndex, ScanOp};
use tilia::storage::disk::BlobFile;
use tilia::storage::heap::HeapFile;
use tilia::TiliaError;

/// Record layout for the demo relation: an i32 key followed by a name.
fn make_record(key: i32, name: &str) -> Vec<u8> {
    let mut record = key.to_le_bytes().to_vec();
    record.extend_from_slice(name.as_bytes());
    record
}

fn main() {
    env_logger::init();

    println!("Tilia - a disk-resident B+Tree index in Rust");
    println!("============================================\n");

    let relation_name = "demo.rel";
    let index_name = BTreeIndex::index_file_name(relation_name, 0);

    // Build a small relation heap.
    let relation = Arc::new(BlobFile::create(relation_name).expect("Failed to create relation"));
    let heap_bpm = Arc::new(BufferPoolManager::new(16, 2, relation));
    let mut heap = HeapFile::create(Arc::clone(&heap_bpm)).expect("Failed to create heap");

    let people = [
        (42, "mulberry"),
        (7, "alder"),
        (99, "rowan"),
        (23, "hazel"),
        (68, "linden"),
        (15, "aspen"),
    ];

    for (key, name) in &people {
        let rid = heap
            .append(&make_record(*key, name))
            .expect("Failed to append record");
        println!("Appended record key={} name={} at {:?}", key, name, rid);
    }

    // Index the i32 at byte offset 0 and bulk load from a full file scan.
    let mut index = BTreeIndex::open_or_create(Path::new("."), relation_name, 0, AttrType::Integer, 16)
        .expect("Failed to open index");
    let loaded = index
        .bulk_load(&mut heap.scan())
        .expect("Failed to bulk load index");
    println!(
        "\nBulk loaded {} entries; index file holds {} pages",
        loaded,
        index.num_pages()
    );

    // Range scan: every record with key in [10, 70].
    println!("\nScanning keys in [10, 70]:");
    index
        .start_scan(10, ScanOp::Gte, 70, ScanOp::Lte)
        .expect("Failed to start scan");
    loop {
        match index.scan_next() {
            Ok(rid) => println!("  matched record at {:?}", rid),
            Err(TiliaError::IndexScanCompleted) => break,
            Err(e) => panic!("scan failed: {}", e),
        }
    }
    index.end_scan().expect("Failed to end scan");

    // Clean up the demo files.
    drop(index);
    drop(heap);
    drop(heap_bpm);
    std::fs::remove_file(relation_name).ok();
    std::fs::remove_file(&index_name).ok();
    println!("\nDemo completed successfully!");
}
