//! The internals of chunkpool-core.
//!
//! The internals keep the bookkeeping of the pool: which chunk is in use, and how many bytes were requested.

pub mod bit_mask;
pub mod chunk_pool;
pub mod occupancy;
