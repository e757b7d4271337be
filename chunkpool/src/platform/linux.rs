//! Implementation of Linux specific calls.

use core::{alloc::Layout, ptr};

use chunkpool_core::Platform;
use log::{debug, error};

/// Implementation of the Platform trait, for Linux.
///
/// Buffers are anonymous private mappings, isolated from the global allocator's heap; they are always aligned on at
/// least a page boundary.
#[derive(Debug, Default, Clone, Copy)]
pub struct MmapPlatform;

impl MmapPlatform {
    /// Creates an instance.
    pub const fn new() -> Self { Self }

    /// Returns the size, in bytes, of a page.
    pub fn page_size() -> usize {
        //  Safety:
        //  -   `_SC_PAGESIZE` is a valid name.
        let result = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };

        //  POSIX guarantees pages of at least 4KB; fall back on it should `sysconf` fail.
        if result > 0 { result as usize } else { 4096 }
    }
}

impl Platform for MmapPlatform {
    unsafe fn allocate(&self, layout: Layout) -> Option<ptr::NonNull<u8>> {
        debug_assert!(layout.size() > 0);

        let page_size = Self::page_size();

        let result = if layout.align() <= page_size {
            mmap_allocate(layout.size())
        } else {
            page_rounded(layout.size(), page_size).and_then(|size| mmap_over(size, layout.align()))
        };

        if result.is_none() {
            debug!("MmapPlatform::allocate({:?}): mmap failed", layout);
        }

        result
    }

    unsafe fn deallocate(&self, pointer: ptr::NonNull<u8>, layout: Layout) {
        //  A mapping of at least `layout.size()` bytes exists, hence rounding to whole pages cannot overflow.
        let size = page_rounded(layout.size(), Self::page_size()).unwrap_or(layout.size());

        munmap_deallocate(pointer.as_ptr(), size);
    }
}

//  Rounds `size` up to a multiple of `page_size`, or None on overflow.
fn page_rounded(size: usize, page_size: usize) -> Option<usize> {
    debug_assert!(page_size.is_power_of_two());

    size.checked_add(page_size - 1).map(|size| size & !(page_size - 1))
}

//  Attempts to allocate the required size, aligned on `alignment`, larger than a page.
//
//  Ensures the alignment is met by over-allocating then trimming front and back.
//
//  `size` is assumed to be a multiple of the page size, so that both trimmed ranges start on a page boundary.
fn mmap_over(size: usize, alignment: usize) -> Option<ptr::NonNull<u8>> {
    debug_assert!(alignment.is_power_of_two());
    debug_assert!(size % MmapPlatform::page_size() == 0, "{} is not a multiple of the page size", size);

    let over_size = size.checked_add(alignment)?;
    let front_pointer = mmap_allocate(over_size)?;

    let misalignment = (front_pointer.as_ptr() as usize) & (alignment - 1);
    let front_size = if misalignment == 0 { 0 } else { alignment - misalignment };
    let back_size = over_size - front_size - size;

    //  Safety:
    //  -   `front_size` is less than `alignment`, hence the result is within the allocated block.
    let aligned_pointer = unsafe { front_pointer.as_ptr().add(front_size) };

    debug_assert!(aligned_pointer as usize % alignment == 0,
        "{:x} not {:x}-aligned!", aligned_pointer as usize, alignment);

    //  Safety:
    //  -   `front_size + size` is at most `over_size`, hence the result is within the allocated block, or pointing
    //      to its end.
    let back_pointer = unsafe { aligned_pointer.add(size) };

    if front_size > 0 {
        //  Safety:
        //  -   `[front_pointer, front_pointer + front_size)` is mapped, and no longer in use.
        unsafe { munmap_deallocate(front_pointer.as_ptr(), front_size) };
    }

    if back_size > 0 {
        //  Safety:
        //  -   `[back_pointer, back_pointer + back_size)` is mapped, and no longer in use.
        unsafe { munmap_deallocate(back_pointer, back_size) };
    }

    ptr::NonNull::new(aligned_pointer)
}

//  Wrapper around `mmap`.
//
//  Returns a pointer to `size` bytes of memory, aligned on a page boundary.
fn mmap_allocate(size: usize) -> Option<ptr::NonNull<u8>> {
    let length = size;
    let prot = libc::PROT_READ | libc::PROT_WRITE;
    let flags = libc::MAP_PRIVATE | libc::MAP_ANONYMOUS;

    //  No specific address hint.
    let addr = ptr::null_mut();
    //  When used in conjunction with MAP_ANONYMOUS, fd is mandated to be -1 on some implementations.
    let fd = -1;
    //  When used in conjunction with MAP_ANONYMOUS, offset is mandated to be 0 on some implementations.
    let offset = 0;

    //  Safety:
    //  -   `addr`, `fd`, and `offset` are suitable for MAP_ANONYMOUS.
    let result = unsafe { libc::mmap(addr, length, prot, flags, fd, offset) };

    let result = if result != libc::MAP_FAILED { result as *mut u8 } else { ptr::null_mut() };
    ptr::NonNull::new(result)
}

//  Wrapper around `munmap`.
//
//  A failure leaks the mapping, and is logged.
//
//  #   Safety
//
//  -   Assumes that `addr` points to a `mmap`ed area of at least `size` bytes.
//  -   Assumes that the range `[addr, addr + size)` is no longer in use.
unsafe fn munmap_deallocate(addr: *mut u8, size: usize) {
    let result = libc::munmap(addr as *mut libc::c_void, size);

    if result != 0 {
        error!("Could not munmap {:x}, {}: {}", addr as usize, size, result);
    }
}

// mod tests
