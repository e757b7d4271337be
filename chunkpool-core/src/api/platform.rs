//! Platform
//!
//! The Platform trait is used to request the backing buffer of a pool. By abstracting the underlying source of
//! memory, it becomes possible to carve the pool out of the global allocator, of anonymous mappings, or even of a
//! static array on a bare-metal target.

use core::{
    alloc::Layout,
    ptr::NonNull,
};

use alloc::alloc;

/// Abstraction of platform specific memory allocation and deallocation.
pub trait Platform {
    /// Allocates a fresh block of memory as per the specified layout.
    ///
    /// Returns None if the allocation request cannot be satisfied.
    ///
    /// #   Safety
    ///
    /// The caller may assume that if a pointer is returned then:
    /// -   The number of usable bytes is _greater than or equal_ to `layout.size()`.
    /// -   The pointer is _at least_ aligned to `layout.align()`.
    ///
    /// `allocate` assumes that:
    /// -   `layout.size()` is non-zero.
    unsafe fn allocate(&self, layout: Layout) -> Option<NonNull<u8>>;

    /// Deallocates the supplied block of memory.
    ///
    /// #   Safety
    ///
    /// The caller should no longer reference the memory after calling this function.
    ///
    /// `deallocate` assumes that:
    /// -   `pointer` was allocated by this instance of `Platform`, with `layout` as argument.
    /// -   `pointer` is the value returned by `Platform`, and not an interior pointer.
    unsafe fn deallocate(&self, pointer: NonNull<u8>, layout: Layout);
}

impl<'a, P> Platform for &'a P
    where
        P: Platform + ?Sized,
{
    unsafe fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> { (**self).allocate(layout) }

    unsafe fn deallocate(&self, pointer: NonNull<u8>, layout: Layout) { (**self).deallocate(pointer, layout) }
}

/// Implementation of the Platform trait, on top of the global allocator.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeapPlatform;

impl HeapPlatform {
    /// Creates an instance.
    pub const fn new() -> Self { Self }
}

impl Platform for HeapPlatform {
    unsafe fn allocate(&self, layout: Layout) -> Option<NonNull<u8>> {
        debug_assert!(layout.size() > 0);

        //  Safety:
        //  -   `layout.size()` is assumed to be non-zero.
        NonNull::new(alloc::alloc(layout))
    }

    unsafe fn deallocate(&self, pointer: NonNull<u8>, layout: Layout) {
        //  Safety:
        //  -   `pointer` is assumed to have been allocated by `alloc::alloc`, with `layout`.
        alloc::dealloc(pointer.as_ptr(), layout);
    }
}

// mod tests
