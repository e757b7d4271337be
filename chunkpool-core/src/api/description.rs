//! Description of various properties of the chunks.

use core::{fmt, mem, num};

pub use core::alloc::Layout;

/// The maximum alignment a chunk request may ask for.
///
/// This is the alignment of the most aligned fundamental type of the platform, the equivalent of C's
/// `alignof(max_align_t)`. The backing buffer of a pool is always aligned to at least this value.
pub const MAX_ALIGNMENT: usize = mem::align_of::<MaxAlign>();

/// ChunkIndex
///
/// The index of a chunk within its pool; the chunk at index `i` starts `i * chunk_size` bytes into the buffer.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ChunkIndex(usize);

impl ChunkIndex {
    /// Creates a new instance.
    pub const fn new(value: usize) -> Self { Self(value) }

    /// Returns the underlying value.
    pub const fn value(&self) -> usize { self.0 }
}

impl fmt::Display for ChunkIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "#{}", self.0) }
}

//  The union of the fundamental types, whose alignment is the maximum natural alignment.
#[allow(dead_code)]
#[repr(C)]
union MaxAlign {
    integer: u64,
    wide: u128,
    float: f64,
    pointer: *const u8,
    size: num::NonZeroUsize,
}

// mod tests
