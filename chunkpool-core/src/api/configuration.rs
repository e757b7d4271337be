//! The configuration of chunkpool-core.
//!
//! A pool is described by two numbers, fixed for its whole lifetime:
//!
//! -   The size of its chunks, in bytes; a request may never exceed it.
//! -   The number of its chunks; allocation fails once all are in use.
//!
//! The backing buffer is exactly `chunk_size * chunk_count` bytes, chunks being laid out back to back.

use core::alloc::Layout;

use crate::utils;

use super::AllocError;

/// Configuration
///
/// The validated dimensions of a pool.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Configuration {
    chunk_size: usize,
    chunk_count: usize,
}

impl Configuration {
    /// Creates a new instance.
    ///
    /// Fails with `InvalidConfiguration` if either `chunk_size` or `chunk_count` is 0, or if the size of the
    /// resulting buffer cannot be represented.
    pub fn new(chunk_size: usize, chunk_count: usize) -> Result<Self, AllocError> {
        let invalid = AllocError::InvalidConfiguration { chunk_size, chunk_count };

        if chunk_size == 0 || chunk_count == 0 {
            return Err(invalid);
        }

        //  Buffers, like any Rust object, are limited to `isize::MAX` bytes.
        match chunk_size.checked_mul(chunk_count) {
            Some(total) if total <= isize::MAX as usize => Ok(Self { chunk_size, chunk_count }),
            _ => Err(invalid),
        }
    }

    /// Creates an instance able to hold `count` objects of the given `layout`.
    ///
    /// The chunk size is the size of `layout`, rounded up to its alignment, so that consecutive chunks are all
    /// suitably aligned when the buffer is.
    pub fn for_layout(layout: Layout, count: usize) -> Result<Self, AllocError> {
        let size = layout.size().max(1);

        let chunk_size = utils::round_up(size, layout.align())
            .ok_or(AllocError::InvalidConfiguration { chunk_size: size, chunk_count: count })?;

        Self::new(chunk_size, count)
    }

    /// Returns the size, in bytes, of a chunk.
    pub fn chunk_size(&self) -> usize { self.chunk_size }

    /// Returns the number of chunks.
    pub fn chunk_count(&self) -> usize { self.chunk_count }

    /// Returns the size, in bytes, of the backing buffer.
    pub fn buffer_size(&self) -> usize { self.chunk_size * self.chunk_count }
}

// mod tests
