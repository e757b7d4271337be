//! ChunkAllocator
//!
//! A pool of equally sized chunks, carved out of a single buffer acquired from a `Platform`.
//!
//! #   Allocation policy
//!
//! Allocation is a first-fit linear scan of the occupancy bit mask, in ascending address order, and is therefore
//! O(chunk_count) in the worst case. This keeps the pool simple and its behavior deterministic, which is acceptable
//! for the small pools it is designed for; a free-list of chunks would give O(1) allocation and deallocation, at
//! the cost of losing the address ordering, and is the upgrade path for large pools.

use core::{
    fmt,
    ptr::{self, NonNull},
};

use log::{debug, trace, warn};

use crate::internals::chunk_pool::ChunkPool;

use super::{AllocError, Configuration, HeapPlatform, Layout, MAX_ALIGNMENT, MemoryResource, Platform};

/// Fixed-chunk allocator.
///
/// The allocator owns its buffer, which it returns to its `Platform` when dropped. All bookkeeping is done through
/// interior mutability, and the allocator is neither `Send` nor `Sync`: it is meant to be used from a single thread.
pub struct ChunkAllocator<P: Platform = HeapPlatform> {
    pool: ChunkPool,
    platform: P,
}

impl ChunkAllocator {
    /// Creates an instance, whose buffer is acquired from the global allocator.
    ///
    /// Fails with `OutOfMemory` if the buffer cannot be acquired.
    pub fn new(configuration: Configuration) -> Result<Self, AllocError> {
        Self::with_platform(configuration, HeapPlatform::new())
    }
}

impl<P: Platform> ChunkAllocator<P> {
    /// Creates an instance, whose buffer is acquired from `platform`.
    ///
    /// Fails with `OutOfMemory` if the buffer cannot be acquired.
    pub fn with_platform(configuration: Configuration, platform: P) -> Result<Self, AllocError> {
        let layout = Self::buffer_layout(&configuration)?;

        //  Safety:
        //  -   `layout.size()` is non-zero, as both `chunk_size` and `chunk_count` are.
        let buffer = unsafe { platform.allocate(layout) };

        let buffer = buffer.ok_or_else(|| {
            debug!("ChunkAllocator::with_platform({:?}): failed to acquire {} bytes", configuration, layout.size());
            AllocError::OutOfMemory { size: layout.size() }
        })?;

        debug!("ChunkAllocator::with_platform({:?}) -> {:p}", configuration, buffer);

        //  Safety:
        //  -   `buffer` points to `configuration.buffer_size()` bytes, valid until returned to `platform` on drop.
        let pool = unsafe { ChunkPool::new(buffer, configuration) };

        Ok(Self { pool, platform })
    }

    /// Returns the configuration of the pool.
    pub fn configuration(&self) -> &Configuration { self.pool.configuration() }

    /// Returns the size, in bytes, of a chunk.
    pub fn chunk_size(&self) -> usize { self.configuration().chunk_size() }

    /// Returns the number of chunks.
    pub fn chunk_count(&self) -> usize { self.configuration().chunk_count() }

    /// Returns the number of chunks currently in use.
    pub fn occupied(&self) -> usize { self.pool.occupied() }

    /// Returns the number of chunks currently free.
    pub fn available(&self) -> usize { self.chunk_count() - self.occupied() }

    /// Returns the platform the buffer was acquired from.
    pub fn platform(&self) -> &P { &self.platform }

    /// Returns whether `pointer` designates a chunk of this pool which is currently in use.
    pub fn is_occupied(&self, pointer: NonNull<u8>) -> bool {
        self.pool.index_of(pointer).map(|index| self.pool.is_occupied(index)).unwrap_or(false)
    }

    /// Returns the number of bytes requested for the chunk at `pointer`, or None if `pointer` does not designate a
    /// chunk of this pool currently in use.
    pub fn allocation_size(&self, pointer: NonNull<u8>) -> Option<usize> {
        self.pool.index_of(pointer).and_then(|index| self.pool.allocation_size(index))
    }

    /// Allocates one chunk for an object of `layout`.
    ///
    /// A zero-sized request is treated as a request for 1 byte.
    ///
    /// Fails with:
    /// -   `RequestTooLarge`, if `layout.size()` exceeds the chunk size, or `layout.align()` exceeds `MAX_ALIGNMENT`.
    /// -   `PoolExhausted`, if no free chunk is aligned on at least `layout.align()`.
    pub fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let size = layout.size().max(1);
        let align = layout.align();

        if size > self.chunk_size() || align > MAX_ALIGNMENT {
            debug!("ChunkAllocator::allocate({:?}): request too large", layout);

            return Err(AllocError::RequestTooLarge {
                size,
                align,
                chunk_size: self.chunk_size(),
                max_align: MAX_ALIGNMENT,
            });
        }

        let pointer = self.pool.claim(size, align).ok_or_else(|| {
            debug!("ChunkAllocator::allocate({:?}): pool exhausted, {} chunks in use", layout, self.occupied());
            AllocError::PoolExhausted { align, chunk_count: self.chunk_count() }
        })?;

        trace!("ChunkAllocator::allocate({:?}) -> {:p}", layout, pointer);

        Ok(pointer)
    }

    /// Deallocates the chunk located at `pointer`.
    ///
    /// Does nothing if `pointer` is null.
    ///
    /// Fails with:
    /// -   `ForeignPointer`, if `pointer` does not designate the start of a chunk of this pool.
    /// -   `DoubleFree`, if the chunk is not currently in use.
    ///
    /// #   Safety
    ///
    /// -   Assumes that the memory pointed to by `pointer` is no longer in use.
    pub unsafe fn deallocate(&self, pointer: *mut u8, layout: Layout) -> Result<(), AllocError> {
        let pointer = match NonNull::new(pointer) {
            Some(pointer) => pointer,
            None => return Ok(()),
        };

        let address = pointer.as_ptr() as usize;

        let index = self.pool.index_of(pointer).ok_or_else(|| {
            debug!("ChunkAllocator::deallocate({:p}, {:?}): foreign pointer", pointer, layout);
            AllocError::ForeignPointer { address }
        })?;

        let size = self.pool.release(index).ok_or_else(|| {
            debug!("ChunkAllocator::deallocate({:p}, {:?}): double free of chunk {}", pointer, layout, index);
            AllocError::DoubleFree { address }
        })?;

        debug_assert!(size <= layout.size().max(1),
            "Chunk {} allocated for {} bytes, deallocated for {:?}", index, size, layout);

        trace!("ChunkAllocator::deallocate({:p}, {:?}) <- chunk {}", pointer, layout, index);

        Ok(())
    }

    fn buffer_layout(configuration: &Configuration) -> Result<Layout, AllocError> {
        Layout::from_size_align(configuration.buffer_size(), MAX_ALIGNMENT)
            .map_err(|_| AllocError::OutOfMemory { size: configuration.buffer_size() })
    }
}

//  Safety:
//  -   Each chunk lies within the buffer, is at least `chunk_size` bytes, and its address is checked against the
//      requested alignment.
//  -   A chunk is marked occupied until deallocated, and is never handed out twice in the meantime.
//  -   The buffer lives as long as `self`.
unsafe impl<P: Platform> MemoryResource for ChunkAllocator<P> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> { ChunkAllocator::allocate(self, layout) }

    unsafe fn deallocate(&self, pointer: *mut u8, layout: Layout) -> Result<(), AllocError> {
        ChunkAllocator::deallocate(self, pointer, layout)
    }
}

impl<P: Platform> PartialEq for ChunkAllocator<P> {
    fn eq(&self, other: &Self) -> bool { ptr::eq(self, other) }
}

impl<P: Platform> Eq for ChunkAllocator<P> {}

impl<P: Platform> fmt::Debug for ChunkAllocator<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkAllocator")
            .field("buffer", &self.pool.buffer())
            .field("chunk_size", &self.chunk_size())
            .field("chunk_count", &self.chunk_count())
            .field("occupied", &self.occupied())
            .finish()
    }
}

impl<P: Platform> Drop for ChunkAllocator<P> {
    fn drop(&mut self) {
        let occupied = self.occupied();

        if occupied > 0 {
            warn!("ChunkAllocator::drop(): {} chunks still in use at {:p}", occupied, self.pool.buffer());
        }

        debug!("ChunkAllocator::drop() -> {:p}", self.pool.buffer());

        //  The layout was validated at construction.
        if let Ok(layout) = Self::buffer_layout(self.configuration()) {
            //  Safety:
            //  -   The buffer was allocated by `self.platform`, with `layout`.
            //  -   The buffer is no longer referenced, as `self.pool` is about to be dropped.
            unsafe { self.platform.deallocate(self.pool.buffer(), layout) };
        }
    }
}

#[cfg(test)]
mod tests {

use core::cell::Cell;

use chunkpool_test::DropCounter;

use super::*;

//  A Platform that fails every request.
struct BarrenPlatform;

impl Platform for BarrenPlatform {
    unsafe fn allocate(&self, _: Layout) -> Option<NonNull<u8>> { None }

    unsafe fn deallocate(&self, _: NonNull<u8>, _: Layout) { unreachable!("Nothing to deallocate") }
}

//  A Platform that counts outstanding buffers.
#[derive(Default)]
struct CountingPlatform {
    outstanding: Cell<isize>,
}

impl Platform for CountingPlatform {
    unsafe fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        self.outstanding.set(self.outstanding.get() + 1);
        HeapPlatform.allocate(layout)
    }

    unsafe fn deallocate(&self, pointer: NonNull<u8>, layout: Layout) {
        self.outstanding.set(self.outstanding.get() - 1);
        HeapPlatform.deallocate(pointer, layout)
    }
}

fn allocator(chunk_size: usize, chunk_count: usize) -> ChunkAllocator {
    ChunkAllocator::new(Configuration::new(chunk_size, chunk_count).unwrap()).unwrap()
}

fn layout(size: usize, align: usize) -> Layout { Layout::from_size_align(size, align).unwrap() }

#[test]
fn chunk_allocator_new() {
    let allocator = allocator(40, 3);

    assert_eq!(40, allocator.chunk_size());
    assert_eq!(3, allocator.chunk_count());
    assert_eq!(0, allocator.occupied());
    assert_eq!(3, allocator.available());
}

#[test]
fn chunk_allocator_out_of_memory() {
    let configuration = Configuration::new(40, 3).unwrap();

    let result = ChunkAllocator::with_platform(configuration, BarrenPlatform);

    assert_eq!(Some(AllocError::OutOfMemory { size: 120 }), result.err());
}

#[test]
fn chunk_allocator_returns_buffer_on_drop() {
    let configuration = Configuration::new(40, 3).unwrap();
    let platform = CountingPlatform::default();

    {
        let allocator = ChunkAllocator::with_platform(configuration, &platform).unwrap();
        assert_eq!(1, allocator.platform().outstanding.get());

        allocator.allocate(layout(8, 8)).unwrap();
    }

    assert_eq!(0, platform.outstanding.get());
}

#[test]
fn chunk_allocator_allocate_ascending() {
    let allocator = allocator(40, 3);

    let a = allocator.allocate(layout(24, 8)).unwrap();
    let b = allocator.allocate(layout(24, 8)).unwrap();
    let c = allocator.allocate(layout(24, 8)).unwrap();

    assert_eq!(a.as_ptr() as usize + 40, b.as_ptr() as usize);
    assert_eq!(b.as_ptr() as usize + 40, c.as_ptr() as usize);
    assert_eq!(0, a.as_ptr() as usize % MAX_ALIGNMENT);

    assert_eq!(3, allocator.occupied());
    assert_eq!(0, allocator.available());
}

#[test]
fn chunk_allocator_allocate_records_size() {
    let allocator = allocator(40, 3);

    let a = allocator.allocate(layout(24, 8)).unwrap();
    let b = allocator.allocate(layout(0, 1)).unwrap();

    assert!(allocator.is_occupied(a));
    assert_eq!(Some(24), allocator.allocation_size(a));
    assert_eq!(Some(1), allocator.allocation_size(b));

    unsafe { allocator.deallocate(a.as_ptr(), layout(24, 8)) }.unwrap();

    assert!(!allocator.is_occupied(a));
    assert_eq!(None, allocator.allocation_size(a));
}

#[test]
fn chunk_allocator_allocate_exhausted() {
    let allocator = allocator(40, 3);

    for _ in 0..3 {
        allocator.allocate(layout(40, 8)).unwrap();
    }

    assert_eq!(
        Err(AllocError::PoolExhausted { align: 8, chunk_count: 3 }),
        allocator.allocate(layout(1, 8)));
    assert_eq!(3, allocator.occupied());
}

#[test]
fn chunk_allocator_allocate_exhausted_alignment() {
    //  Chunks of half the maximum alignment: only every other chunk is maximally aligned.
    let (align, half) = (MAX_ALIGNMENT, MAX_ALIGNMENT / 2);
    let allocator = allocator(half, 4);

    allocator.allocate(layout(half, align)).unwrap();
    allocator.allocate(layout(half, align)).unwrap();

    assert_eq!(
        Err(AllocError::PoolExhausted { align, chunk_count: 4 }),
        allocator.allocate(layout(half, align)));

    allocator.allocate(layout(half, half)).unwrap();
    allocator.allocate(layout(half, half)).unwrap();
    assert_eq!(4, allocator.occupied());
}

#[test]
fn chunk_allocator_allocate_too_large() {
    let allocator = allocator(40, 3);

    assert_eq!(
        Err(AllocError::RequestTooLarge { size: 41, align: 1, chunk_size: 40, max_align: MAX_ALIGNMENT }),
        allocator.allocate(layout(41, 1)));

    let align = MAX_ALIGNMENT * 2;

    assert_eq!(
        Err(AllocError::RequestTooLarge { size: 8, align, chunk_size: 40, max_align: MAX_ALIGNMENT }),
        allocator.allocate(layout(8, align)));

    assert_eq!(0, allocator.occupied());
}

#[test]
fn chunk_allocator_deallocate_null() {
    let allocator = allocator(40, 3);

    assert_eq!(Ok(()), unsafe { allocator.deallocate(ptr::null_mut(), layout(8, 8)) });
}

#[test]
fn chunk_allocator_deallocate_foreign() {
    let allocator = allocator(40, 3);
    let a = allocator.allocate(layout(8, 8)).unwrap();

    let mut local = 0u64;
    let foreign = &mut local as *mut u64 as *mut u8;

    assert_eq!(
        Err(AllocError::ForeignPointer { address: foreign as usize }),
        unsafe { allocator.deallocate(foreign, layout(8, 8)) });

    //  Interior pointers are foreign too.
    let interior = a.as_ptr().wrapping_add(8);

    assert_eq!(
        Err(AllocError::ForeignPointer { address: interior as usize }),
        unsafe { allocator.deallocate(interior, layout(8, 8)) });

    assert_eq!(1, allocator.occupied());
}

#[test]
fn chunk_allocator_deallocate_foreign_allocator() {
    let (one, two) = (allocator(40, 3), allocator(40, 3));

    let a = one.allocate(layout(8, 8)).unwrap();

    assert_eq!(
        Err(AllocError::ForeignPointer { address: a.as_ptr() as usize }),
        unsafe { two.deallocate(a.as_ptr(), layout(8, 8)) });

    assert_eq!(Ok(()), unsafe { one.deallocate(a.as_ptr(), layout(8, 8)) });
}

#[test]
fn chunk_allocator_deallocate_double_free() {
    let allocator = allocator(40, 3);
    let a = allocator.allocate(layout(8, 8)).unwrap();

    assert_eq!(Ok(()), unsafe { allocator.deallocate(a.as_ptr(), layout(8, 8)) });

    assert_eq!(
        Err(AllocError::DoubleFree { address: a.as_ptr() as usize }),
        unsafe { allocator.deallocate(a.as_ptr(), layout(8, 8)) });

    assert_eq!(0, allocator.occupied());
}

#[test]
fn chunk_allocator_reuses_freed_chunks() {
    let allocator = allocator(16, 2);

    let a = allocator.allocate(layout(16, 8)).unwrap();
    let b = allocator.allocate(layout(16, 8)).unwrap();

    unsafe { allocator.deallocate(a.as_ptr(), layout(16, 8)) }.unwrap();

    assert_eq!(Ok(a), allocator.allocate(layout(4, 4)));
    assert!(allocator.is_occupied(b));
}

#[test]
fn chunk_allocator_holds_values() {
    let allocator = allocator(32, 4);
    let counter = DropCounter::new();

    let pointer = allocator.allocate(Layout::new::<DropCounter>()).unwrap().cast::<DropCounter>();

    //  Safety:
    //  -   The chunk is exclusively owned, large and aligned enough.
    unsafe {
        pointer.as_ptr().write(counter.clone());
        assert_eq!(2, counter.strong_count());

        pointer.as_ptr().drop_in_place();
        allocator.deallocate(pointer.as_ptr().cast(), Layout::new::<DropCounter>()).unwrap();
    }

    assert_eq!(1, counter.drops());
}

#[test]
fn chunk_allocator_equality() {
    let (one, two) = (allocator(40, 3), allocator(40, 3));

    assert_eq!(one, one);
    assert_ne!(one, two);

    assert!(one.is_equal(&one));
    assert!(!one.is_equal(&two));
    assert!(!two.is_equal(&one));
}

} // mod tests
