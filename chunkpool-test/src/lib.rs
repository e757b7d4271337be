//! Utilities for testing chunkpool.

mod drop_counter;

pub use drop_counter::DropCounter;
