//! The bookkeeping of a pool of fixed-size chunks.
//!
//! A ChunkPool does not own its buffer; it merely tracks which chunks of the buffer are in use, and how many bytes
//! were requested for each of them.

use core::{
    cell::RefCell,
    ptr::NonNull,
};

use alloc::collections::BTreeMap;

use crate::{ChunkIndex, Configuration, utils};

use super::occupancy::Occupancy;

pub(crate) struct ChunkPool {
    //  Start of the buffer; chunk `i` starts at `buffer + i * chunk_size`.
    buffer: NonNull<u8>,
    configuration: Configuration,
    occupancy: Occupancy,
    //  Invariant: an index is a key iff its chunk is claimed in `occupancy`.
    allocation_sizes: RefCell<BTreeMap<ChunkIndex, usize>>,
}

impl ChunkPool {
    /// Creates a new instance, with all chunks free.
    ///
    /// #   Safety
    ///
    /// -   Assumes that `buffer` points to at least `configuration.buffer_size()` bytes, valid for as long as this
    ///     instance is.
    pub(crate) unsafe fn new(buffer: NonNull<u8>, configuration: Configuration) -> Self {
        let occupancy = Occupancy::new(configuration.chunk_count());
        let allocation_sizes = RefCell::new(BTreeMap::new());

        Self { buffer, configuration, occupancy, allocation_sizes, }
    }

    /// Returns the start of the buffer.
    pub(crate) fn buffer(&self) -> NonNull<u8> { self.buffer }

    /// Returns the configuration.
    pub(crate) fn configuration(&self) -> &Configuration { &self.configuration }

    /// Returns the number of chunks in use.
    pub(crate) fn occupied(&self) -> usize { self.occupancy.claimed() }

    /// Claims the first free chunk, in ascending address order, aligned on at least `alignment`.
    ///
    /// Records `size` as the number of bytes requested for this chunk.
    ///
    /// Returns None if no free chunk is suitably aligned.
    pub(crate) fn claim(&self, size: usize, alignment: usize) -> Option<NonNull<u8>> {
        debug_assert!(size <= self.configuration.chunk_size());

        let index = self.occupancy.claim_first(|index| {
            utils::is_sufficiently_aligned_for(self.address_of(ChunkIndex::new(index)), alignment)
        })?;

        let index = ChunkIndex::new(index);

        let _previous = self.allocation_sizes.borrow_mut().insert(index, size);
        debug_assert!(_previous.is_none(), "{} was free, yet had a recorded size", index);

        Some(self.address_of(index))
    }

    /// Releases the chunk at `index`.
    ///
    /// Returns the number of bytes that had been requested for it, or None if it was not in use.
    pub(crate) fn release(&self, index: ChunkIndex) -> Option<usize> {
        if !self.occupancy.release(index.value()) {
            return None;
        }

        let size = self.allocation_sizes.borrow_mut().remove(&index);
        debug_assert!(size.is_some(), "{} was in use, yet had no recorded size", index);

        size
    }

    /// Returns the index of the chunk starting at `pointer`, or None if no chunk of this pool starts there.
    pub(crate) fn index_of(&self, pointer: NonNull<u8>) -> Option<ChunkIndex> {
        let offset = (pointer.as_ptr() as usize).checked_sub(self.buffer.as_ptr() as usize)?;

        if offset >= self.configuration.buffer_size() || offset % self.configuration.chunk_size() != 0 {
            return None;
        }

        Some(ChunkIndex::new(offset / self.configuration.chunk_size()))
    }

    /// Returns the address of the chunk at `index`.
    pub(crate) fn address_of(&self, index: ChunkIndex) -> NonNull<u8> {
        debug_assert!(index.value() < self.configuration.chunk_count());

        let offset = index.value() * self.configuration.chunk_size();

        //  Safety:
        //  -   `offset` is within the buffer, as `index` is less than `chunk_count`.
        //  -   `self.buffer` is non-null, and the buffer does not wrap around.
        unsafe { NonNull::new_unchecked(self.buffer.as_ptr().add(offset)) }
    }

    /// Returns whether the chunk at `index` is in use.
    pub(crate) fn is_occupied(&self, index: ChunkIndex) -> bool { self.occupancy.is_claimed(index.value()) }

    /// Returns the number of bytes requested for the chunk at `index`, or None if not in use.
    pub(crate) fn allocation_size(&self, index: ChunkIndex) -> Option<usize> {
        self.allocation_sizes.borrow().get(&index).copied()
    }
}

// mod tests
