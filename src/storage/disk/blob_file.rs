use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

use parking_lot::Mutex;

use crate::common::{PageId, Result, PAGE_SIZE};

/// BlobFile maps 1-based page numbers onto fixed-size regions of a single
/// on-disk file. Page N lives at byte offset `(N - 1) * PAGE_SIZE`. Pages
/// are allocated monotonically and never reclaimed.
pub struct BlobFile {
    /// Handle to the backing file; the cursor is shared state.
    file: Mutex<File>,
    path: PathBuf,
    /// Number of pages ever allocated in this file
    num_pages: AtomicU32,
    /// Number of page reads performed
    num_reads: AtomicU32,
    /// Number of page writes performed
    num_writes: AtomicU32,
}

impl BlobFile {
    /// Returns whether a blob file exists at the given path.
    pub fn exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    /// Creates a new, empty blob file. Fails if the path already exists.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)?;

        Ok(Self {
            file: Mutex::new(file),
            path,
            num_pages: AtomicU32::new(0),
            num_reads: AtomicU32::new(0),
            num_writes: AtomicU32::new(0),
        })
    }

    /// Opens an existing blob file, recovering the page count from the file
    /// size. Fails with a not-found I/O error if the path does not exist;
    /// callers that treat absence as "create new" probe with
    /// [`BlobFile::exists`] first.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().read(true).write(true).open(&path)?;

        let file_size = file.metadata()?.len();
        let num_pages = (file_size / PAGE_SIZE as u64) as u32;

        Ok(Self {
            file: Mutex::new(file),
            path,
            num_pages: AtomicU32::new(num_pages),
            num_reads: AtomicU32::new(0),
            num_writes: AtomicU32::new(0),
        })
    }

    fn byte_offset(page_id: PageId) -> u64 {
        (page_id.as_u32() as u64 - 1) * PAGE_SIZE as u64
    }

    /// Reads a page into the provided buffer. Short reads are zero-filled.
    pub fn read_page(&self, page_id: PageId, data: &mut [u8]) -> Result<()> {
        assert_eq!(data.len(), PAGE_SIZE, "Buffer must be PAGE_SIZE bytes");
        debug_assert!(page_id.is_valid());

        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(Self::byte_offset(page_id)))?;

        let bytes_read = file.read(data)?;
        if bytes_read < PAGE_SIZE {
            data[bytes_read..].fill(0);
        }

        self.num_reads.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Writes a page from the provided buffer.
    pub fn write_page(&self, page_id: PageId, data: &[u8]) -> Result<()> {
        assert_eq!(data.len(), PAGE_SIZE, "Buffer must be PAGE_SIZE bytes");
        debug_assert!(page_id.is_valid());

        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(Self::byte_offset(page_id)))?;
        file.write_all(data)?;
        file.flush()?;

        self.num_writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Allocates the next page, appending a zeroed region to the file.
    /// The first page allocated in a fresh file is page 1.
    pub fn allocate_page(&self) -> Result<PageId> {
        let page_id = PageId::new(self.num_pages.fetch_add(1, Ordering::SeqCst) + 1);

        let zeros = [0u8; PAGE_SIZE];
        self.write_page(page_id, &zeros)?;

        Ok(page_id)
    }

    /// Returns the number of pages allocated in this file.
    pub fn num_pages(&self) -> u32 {
        self.num_pages.load(Ordering::Relaxed)
    }

    pub fn num_reads(&self) -> u32 {
        self.num_reads.load(Ordering::Relaxed)
    }

    pub fn num_writes(&self) -> u32 {
        self.num_writes.load(Ordering::Relaxed)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Forces all buffered writes down to the device.
    pub fn sync(&self) -> Result<()> {
        self.file.lock().sync_all()?;
        Ok(())
    }
}

impl Drop for BlobFile {
    fn drop(&mut self) {
        let _ = self.file.get_mut().sync_all();
    }
}
