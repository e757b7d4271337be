//! Abstraction over OS differences.
//!
//! The portable `HeapPlatform` is provided by chunkpool-core; OS specific platforms live here.

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
pub use linux::MmapPlatform;
