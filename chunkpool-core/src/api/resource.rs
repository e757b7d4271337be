//! MemoryResource
//!
//! The capability through which a container obtains, and returns, the storage of its elements.
//!
//! Containers take a reference to a `MemoryResource` at construction; there is no process-wide default resource.

use core::ptr::{self, NonNull};

use super::{AllocError, Layout};

/// Abstraction of a source of fixed-size blocks of memory.
///
/// Implementations are not required to be thread-safe; `ChunkAllocator`, in particular, is neither `Send` nor
/// `Sync`, and sharing one between threads requires external synchronization.
///
/// #   Safety
///
/// Containers write their elements through the blocks handed out, and link them together, trusting that:
/// -   A block returned by `allocate` is valid for reads and writes of `layout.size()` bytes, and aligned on at
///     least `layout.align()`.
/// -   A block remains valid, and is never handed out again, until it is passed to `deallocate`.
/// -   `is_equal` only returns true if blocks allocated by either resource may be deallocated by the other.
pub unsafe trait MemoryResource {
    /// Allocates a block of memory fitting `layout`.
    ///
    /// On success, the returned pointer is valid for reads and writes of `layout.size()` bytes, and aligned on at
    /// least `layout.align()`, until it is passed to `deallocate`.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Deallocates the block of memory located at `pointer`.
    ///
    /// Does nothing if `pointer` is null.
    ///
    /// #   Safety
    ///
    /// -   Assumes that the memory pointed to by `pointer` is no longer in use.
    /// -   Assumes that `layout` is the layout `pointer` was allocated with, if allocated by this resource.
    unsafe fn deallocate(&self, pointer: *mut u8, layout: Layout) -> Result<(), AllocError>;

    /// Returns whether memory allocated from `self` may be deallocated through `other`, and vice-versa.
    ///
    /// The default implementation only considers a resource equal to itself.
    fn is_equal(&self, other: &dyn MemoryResource) -> bool {
        let this = self as *const Self as *const u8;
        let other = other as *const _ as *const u8;

        ptr::eq(this, other)
    }
}
