//! Pool allocation helpers
//!
//! The firmware pool (`AllocatePool`/`FreePool`) is the only allocator
//! available before ExitBootServices. Everything here is written against
//! the `PoolAllocator` trait so the same code runs on firmware and on the
//! host with `FixedPool`.
//!
//! `PoolBuffer` is the scoped acquisition used by `Print`: it releases its
//! block in `Drop`, so early returns cannot leak pool memory.

use core::alloc::Layout;
use core::marker::PhantomData;
use core::mem::{align_of, size_of};
use core::ptr::NonNull;
use core::sync::atomic::{AtomicUsize, Ordering};

use linked_list_allocator::Heap;
use spin::Mutex;

use crate::status::Status;

/// EFI_MEMORY_TYPE values relevant to pool allocations
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryType {
    Reserved = 0,
    LoaderCode = 1,
    LoaderData = 2,
    BootServicesCode = 3,
    BootServicesData = 4,
    RuntimeServicesCode = 5,
    RuntimeServicesData = 6,
    Conventional = 7,
}

impl MemoryType {
    /// Raw firmware value
    #[inline]
    pub const fn as_raw(self) -> usize {
        self as u32 as usize
    }
}

/// Pool allocator collaborator.
pub trait PoolAllocator {
    /// Request `size` bytes of `kind` memory.
    fn allocate(&self, kind: MemoryType, size: usize) -> Result<NonNull<u8>, Status>;

    /// Return a block obtained from `allocate`.
    ///
    /// # Safety
    /// `ptr` must come from `allocate` on this allocator and must not be
    /// used or released again afterwards.
    unsafe fn release(&self, ptr: NonNull<u8>) -> Result<(), Status>;
}

impl<A: PoolAllocator + ?Sized> PoolAllocator for &A {
    fn allocate(&self, kind: MemoryType, size: usize) -> Result<NonNull<u8>, Status> {
        (**self).allocate(kind, size)
    }

    unsafe fn release(&self, ptr: NonNull<u8>) -> Result<(), Status> {
        (**self).release(ptr)
    }
}

/// A scoped pool allocation holding `len` zero-initialised `T`s.
///
/// Released on drop. A zero-length buffer never touches the allocator.
pub struct PoolBuffer<'a, T: Copy + Default, A: PoolAllocator + ?Sized> {
    pool: &'a A,
    ptr: NonNull<T>,
    len: usize,
    owned: bool,
}

impl<'a, T: Copy + Default, A: PoolAllocator + ?Sized> PoolBuffer<'a, T, A> {
    /// Allocate room for `count` elements and default-initialise them.
    pub fn new(pool: &'a A, kind: MemoryType, count: usize) -> Result<Self, Status> {
        let bytes = count
            .checked_mul(size_of::<T>())
            .ok_or(Status::BAD_BUFFER_SIZE)?;

        if bytes == 0 {
            return Ok(Self {
                pool,
                ptr: NonNull::dangling(),
                len: count,
                owned: false,
            });
        }

        let raw = pool.allocate(kind, bytes)?;
        if raw.as_ptr() as usize % align_of::<T>() != 0 {
            // Firmware pool is 8-byte aligned; anything else is unusable for T
            let _ = unsafe { pool.release(raw) };
            return Err(Status::INVALID_PARAMETER);
        }

        let ptr = raw.cast::<T>();
        for i in 0..count {
            unsafe { ptr.as_ptr().add(i).write(T::default()) };
        }

        Ok(Self {
            pool,
            ptr,
            len: count,
            owned: true,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the buffer as a slice
    pub fn as_slice(&self) -> &[T] {
        unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Get the buffer as a mutable slice
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { core::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Copy + Default, A: PoolAllocator + ?Sized> Drop for PoolBuffer<'_, T, A> {
    fn drop(&mut self) {
        if self.owned {
            self.owned = false;
            if let Err(status) = unsafe { self.pool.release(self.ptr.cast()) } {
                crate::log_warn!("pool release failed: {}", status);
            }
        }
    }
}

// ============================================================================
// Fixed pool
// ============================================================================

/// Per-block header; keeps the block size so release needs only the pointer.
const BLOCK_HEADER: usize = 16;

/// Regions smaller than this cannot hold a single hole.
const MIN_REGION_SIZE: usize = 64;

/// Snapshot of `FixedPool` counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Blocks handed out and not yet released
    pub outstanding: usize,
    /// Total `allocate` calls
    pub requests: usize,
    /// `allocate` calls that failed
    pub failures: usize,
    /// Bytes currently in use (headers included)
    pub used: usize,
    /// Region size
    pub size: usize,
}

/// Fixed-size pool over a caller-provided region.
///
/// Stands in for the firmware pool wherever boot services are absent
/// (host harness, tests). The region never grows.
pub struct FixedPool<'a> {
    heap: Mutex<Heap>,
    outstanding: AtomicUsize,
    requests: AtomicUsize,
    failures: AtomicUsize,
    _region: PhantomData<&'a mut [u8]>,
}

impl<'a> FixedPool<'a> {
    /// Create a pool managing `region`.
    pub fn new(region: &'a mut [u8]) -> Self {
        let heap = if region.len() < MIN_REGION_SIZE {
            Heap::empty()
        } else {
            unsafe { Heap::new(region.as_mut_ptr(), region.len()) }
        };

        Self {
            heap: Mutex::new(heap),
            outstanding: AtomicUsize::new(0),
            requests: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
            _region: PhantomData,
        }
    }

    pub fn stats(&self) -> PoolStats {
        let heap = self.heap.lock();
        PoolStats {
            outstanding: self.outstanding.load(Ordering::Relaxed),
            requests: self.requests.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            used: heap.used(),
            size: heap.size(),
        }
    }

    /// Blocks handed out and not yet released.
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Relaxed)
    }

    fn block_layout(size: usize) -> Result<Layout, Status> {
        let total = size
            .checked_add(BLOCK_HEADER)
            .ok_or(Status::BAD_BUFFER_SIZE)?;
        Layout::from_size_align(total, BLOCK_HEADER).map_err(|_| Status::BAD_BUFFER_SIZE)
    }

    fn fail(&self, status: Status) -> Status {
        self.failures.fetch_add(1, Ordering::Relaxed);
        status
    }
}

impl PoolAllocator for FixedPool<'_> {
    fn allocate(&self, kind: MemoryType, size: usize) -> Result<NonNull<u8>, Status> {
        self.requests.fetch_add(1, Ordering::Relaxed);

        match kind {
            MemoryType::LoaderData | MemoryType::BootServicesData => {}
            _ => return Err(self.fail(Status::INVALID_PARAMETER)),
        }

        let layout = Self::block_layout(size).map_err(|s| self.fail(s))?;
        let base = self
            .heap
            .lock()
            .allocate_first_fit(layout)
            .map_err(|_| self.fail(Status::OUT_OF_RESOURCES))?;

        unsafe {
            base.as_ptr().cast::<usize>().write(size);
            self.outstanding.fetch_add(1, Ordering::Relaxed);
            Ok(NonNull::new_unchecked(base.as_ptr().add(BLOCK_HEADER)))
        }
    }

    unsafe fn release(&self, ptr: NonNull<u8>) -> Result<(), Status> {
        let base = ptr.as_ptr().sub(BLOCK_HEADER);
        let size = base.cast::<usize>().read();
        let layout = Self::block_layout(size)?;
        self.heap
            .lock()
            .deallocate(NonNull::new_unchecked(base), layout);
        self.outstanding.fetch_sub(1, Ordering::Relaxed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, Default, PartialEq)]
    struct Pair {
        a: u32,
        b: u64,
    }

    #[test]
    fn test_fixed_pool_allocate_release() {
        let mut region = [0u8; 1024];
        let pool = FixedPool::new(&mut region);

        let ptr = pool.allocate(MemoryType::LoaderData, 100).unwrap();
        assert_eq!(pool.outstanding(), 1);
        assert_eq!(ptr.as_ptr() as usize % 8, 0);

        unsafe { pool.release(ptr).unwrap() };
        let stats = pool.stats();
        assert_eq!(stats.outstanding, 0);
        assert_eq!(stats.requests, 1);
        assert_eq!(stats.failures, 0);
        assert_eq!(stats.used, 0);
    }

    #[test]
    fn test_fixed_pool_exhaustion() {
        let mut region = [0u8; 256];
        let pool = FixedPool::new(&mut region);

        assert_eq!(
            pool.allocate(MemoryType::LoaderData, 4096),
            Err(Status::OUT_OF_RESOURCES)
        );
        assert_eq!(pool.stats().failures, 1);
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn test_fixed_pool_rejects_memory_type() {
        let mut region = [0u8; 256];
        let pool = FixedPool::new(&mut region);
        assert_eq!(
            pool.allocate(MemoryType::RuntimeServicesCode, 8),
            Err(Status::INVALID_PARAMETER)
        );
    }

    #[test]
    fn test_tiny_region_is_empty() {
        let mut region = [0u8; 8];
        let pool = FixedPool::new(&mut region);
        assert_eq!(pool.stats().size, 0);
        assert!(pool.allocate(MemoryType::LoaderData, 1).is_err());
    }

    #[test]
    fn test_pool_buffer_zeroed_and_released() {
        let mut region = [0xAAu8; 1024];
        let pool = FixedPool::new(&mut region);
        {
            let mut buf: PoolBuffer<'_, Pair, _> =
                PoolBuffer::new(&pool, MemoryType::LoaderData, 4).unwrap();
            assert_eq!(buf.len(), 4);
            assert!(buf.as_slice().iter().all(|p| *p == Pair::default()));

            buf.as_mut_slice()[2] = Pair { a: 7, b: 9 };
            assert_eq!(buf.as_slice()[2].b, 9);
            assert_eq!(pool.outstanding(), 1);
        }
        assert_eq!(pool.outstanding(), 0);
    }

    #[test]
    fn test_zero_length_buffer_skips_allocator() {
        let mut region = [0u8; 256];
        let pool = FixedPool::new(&mut region);
        let buf: PoolBuffer<'_, u8, _> = PoolBuffer::new(&pool, MemoryType::LoaderData, 0).unwrap();
        assert!(buf.is_empty());
        assert!(buf.as_slice().is_empty());
        assert_eq!(pool.stats().requests, 0);
    }

    #[test]
    fn test_pool_buffer_propagates_failure() {
        let mut region = [0u8; 128];
        let pool = FixedPool::new(&mut region);
        let result: Result<PoolBuffer<'_, u8, _>, _> =
            PoolBuffer::new(&pool, MemoryType::LoaderData, 4096);
        assert_eq!(result.err(), Some(Status::OUT_OF_RESOURCES));
    }
}
