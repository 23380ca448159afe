//! Common test utilities: recording console and a fault-injecting pool

use std::cell::Cell;
use std::ptr::NonNull;

use shasta_core::{Console, FixedPool, MemoryType, PoolAllocator, Status};

/// Console that keeps everything written to it
#[derive(Debug, Default)]
pub struct RecordingConsole {
    pub output: Vec<u8>,
    pub writes: usize,
}

impl RecordingConsole {
    pub fn text(&self) -> &str {
        std::str::from_utf8(&self.output).expect("console output is ASCII")
    }
}

impl Console for RecordingConsole {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Status> {
        self.output.extend_from_slice(bytes);
        self.writes += 1;
        Ok(())
    }
}

/// Wraps a `FixedPool` and fails the n-th allocation (0-based)
pub struct FaultyPool<'a> {
    pub inner: FixedPool<'a>,
    fail_at: usize,
    seen: Cell<usize>,
}

impl<'a> FaultyPool<'a> {
    pub fn new(region: &'a mut [u8], fail_at: usize) -> Self {
        Self {
            inner: FixedPool::new(region),
            fail_at,
            seen: Cell::new(0),
        }
    }
}

impl PoolAllocator for FaultyPool<'_> {
    fn allocate(&self, kind: MemoryType, size: usize) -> Result<NonNull<u8>, Status> {
        let n = self.seen.get();
        self.seen.set(n + 1);
        if n == self.fail_at {
            return Err(Status::OUT_OF_RESOURCES);
        }
        self.inner.allocate(kind, size)
    }

    unsafe fn release(&self, ptr: NonNull<u8>) -> Result<(), Status> {
        self.inner.release(ptr)
    }
}
