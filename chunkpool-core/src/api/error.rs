//! Errors reported by the pool.

use thiserror::Error;

/// AllocError
///
/// The failures of a `ChunkAllocator`, or of any other `MemoryResource`.
///
/// Every failure aborts the requested operation: nothing is claimed, released, or recorded.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Error)]
pub enum AllocError {
    /// The pool cannot be built from the requested configuration.
    ///
    /// Both `chunk_size` and `chunk_count` must be non-zero, and their product must fit in memory.
    #[error("invalid configuration: {chunk_count} chunks of {chunk_size} bytes")]
    InvalidConfiguration {
        /// The requested size, in bytes, of each chunk.
        chunk_size: usize,
        /// The requested number of chunks.
        chunk_count: usize,
    },
    /// The platform could not supply the backing buffer.
    #[error("out of memory: could not acquire a buffer of {size} bytes")]
    OutOfMemory {
        /// The size, in bytes, of the buffer requested.
        size: usize,
    },
    /// A single request exceeds either the size of a chunk, or the maximum alignment.
    #[error("request too large: {size} bytes aligned on {align} exceeds {chunk_size} bytes aligned on {max_align}")]
    RequestTooLarge {
        /// The requested size, in bytes.
        size: usize,
        /// The requested alignment, in bytes.
        align: usize,
        /// The size, in bytes, of a chunk.
        chunk_size: usize,
        /// The maximum supported alignment, in bytes.
        max_align: usize,
    },
    /// No free chunk satisfying the requested alignment is left.
    #[error("pool exhausted: no free chunk aligned on {align} out of {chunk_count}")]
    PoolExhausted {
        /// The requested alignment, in bytes.
        align: usize,
        /// The total number of chunks of the pool.
        chunk_count: usize,
    },
    /// The address does not designate the start of a chunk of this pool.
    #[error("foreign pointer: {address:#x} was not allocated by this pool")]
    ForeignPointer {
        /// The offending address.
        address: usize,
    },
    /// The address designates a chunk of this pool which is not in use.
    #[error("double free: {address:#x} is not currently allocated")]
    DoubleFree {
        /// The offending address.
        address: usize,
    },
}

// mod tests
