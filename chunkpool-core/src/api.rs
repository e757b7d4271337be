//! The API of chunkpool-core.

mod allocator;
mod configuration;
mod description;
mod error;
mod platform;
mod resource;

pub use allocator::ChunkAllocator;
pub use configuration::Configuration;
pub use description::{ChunkIndex, Layout, MAX_ALIGNMENT};
pub use error::AllocError;
pub use platform::{HeapPlatform, Platform};
pub use resource::MemoryResource;
