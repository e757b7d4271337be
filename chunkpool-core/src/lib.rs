#![no_std]

#![deny(missing_docs)]

//! Building blocks for a fixed-chunk pool allocator.
//!
//! chunkpool-core carves a single backing buffer into equally sized chunks and hands them out one at a time. It
//! contains:
//! -   A platform trait, used to acquire the backing buffer to be carved up.
//! -   A memory resource trait, the capability through which containers request and return chunks.
//! -   The `ChunkAllocator`, a first-fit pool over the chunks of one buffer.

extern crate alloc;

mod api;
mod internals;
mod utils;

pub use api::*;
