use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};

use crate::common::{PageId, Result, TiliaError, PAGE_SIZE};

use super::BlobFile;

type PageBuf = Box<[u8; PAGE_SIZE]>;

/// A queued disk I/O request. Page buffers travel through the channel, so
/// the worker never touches caller memory.
enum DiskRequest {
    Read {
        page_id: PageId,
        done: Sender<Result<PageBuf>>,
    },
    Write {
        page_id: PageId,
        data: PageBuf,
        done: Sender<Result<()>>,
    },
}

/// DiskScheduler owns a background worker thread that serializes page I/O
/// against the blob file. The buffer pool talks to it through the
/// synchronous wrappers.
pub struct DiskScheduler {
    blob_file: Arc<BlobFile>,
    request_sender: Sender<DiskRequest>,
    /// Flag to signal shutdown
    shutdown: Arc<AtomicBool>,
    worker_handle: Option<JoinHandle<()>>,
}

impl DiskScheduler {
    /// Creates a new DiskScheduler over the given blob file and spawns its
    /// worker thread.
    pub fn new(blob_file: Arc<BlobFile>) -> Self {
        let (sender, receiver) = bounded::<DiskRequest>(128);
        let shutdown = Arc::new(AtomicBool::new(false));

        let worker_file = Arc::clone(&blob_file);
        let worker_shutdown = Arc::clone(&shutdown);

        let worker_handle = thread::spawn(move || {
            Self::run_worker(worker_file, receiver, worker_shutdown);
        });

        Self {
            blob_file,
            request_sender: sender,
            shutdown,
            worker_handle: Some(worker_handle),
        }
    }

    /// Reads a page through the worker and copies it into `data`.
    pub fn read_sync(&self, page_id: PageId, data: &mut [u8]) -> Result<()> {
        assert_eq!(data.len(), PAGE_SIZE);

        let (tx, rx) = bounded(1);
        self.request_sender
            .send(DiskRequest::Read { page_id, done: tx })
            .map_err(|e| TiliaError::DiskScheduler(format!("Failed to schedule read: {}", e)))?;

        let buf = rx.recv().map_err(|e| {
            TiliaError::DiskScheduler(format!("Failed to receive completion: {}", e))
        })??;
        data.copy_from_slice(&buf[..]);

        Ok(())
    }

    /// Writes a page through the worker, blocking until it lands.
    pub fn write_sync(&self, page_id: PageId, data: &[u8]) -> Result<()> {
        assert_eq!(data.len(), PAGE_SIZE);

        let mut buf: PageBuf = Box::new([0u8; PAGE_SIZE]);
        buf.copy_from_slice(data);

        let (tx, rx) = bounded(1);
        self.request_sender
            .send(DiskRequest::Write {
                page_id,
                data: buf,
                done: tx,
            })
            .map_err(|e| TiliaError::DiskScheduler(format!("Failed to schedule write: {}", e)))?;

        rx.recv().map_err(|e| {
            TiliaError::DiskScheduler(format!("Failed to receive completion: {}", e))
        })??;

        Ok(())
    }

    /// The worker loop: processes requests until shutdown is signaled, then
    /// drains the queue before exiting.
    fn run_worker(
        blob_file: Arc<BlobFile>,
        receiver: Receiver<DiskRequest>,
        shutdown: Arc<AtomicBool>,
    ) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                while let Ok(request) = receiver.try_recv() {
                    Self::process(&blob_file, request);
                }
                break;
            }

            match receiver.recv_timeout(Duration::from_millis(100)) {
                Ok(request) => Self::process(&blob_file, request),
                Err(RecvTimeoutError::Timeout) => {
                    // Loop around and re-check the shutdown flag.
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    }

    fn process(blob_file: &BlobFile, request: DiskRequest) {
        match request {
            DiskRequest::Read { page_id, done } => {
                let mut buf: PageBuf = Box::new([0u8; PAGE_SIZE]);
                let result = blob_file.read_page(page_id, &mut buf[..]).map(|_| buf);
                let _ = done.send(result);
            }
            DiskRequest::Write {
                page_id,
                data,
                done,
            } => {
                let _ = done.send(blob_file.write_page(page_id, &data[..]));
            }
        }
    }

    /// Returns the underlying blob file.
    pub fn blob_file(&self) -> &Arc<BlobFile> {
        &self.blob_file
    }
}

impl Drop for DiskScheduler {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);

        if let Some(handle) = self.worker_handle.take() {
            let _ = handle.join();
        }
    }
}
