//! A collection of utilities.

use core::ptr::NonNull;

/// Returns whether the pointer is sufficiently aligned for the given alignment.
///
/// `alignment` is assumed to be a power of 2.
pub(crate) fn is_sufficiently_aligned_for(ptr: NonNull<u8>, alignment: usize) -> bool {
    debug_assert!(alignment.is_power_of_two());

    (ptr.as_ptr() as usize) & (alignment - 1) == 0
}

/// Rounds `n` up to the nearest higher multiple of `alignment`, or None on overflow.
///
/// `alignment` is assumed to be a power of 2.
pub(crate) fn round_up(n: usize, alignment: usize) -> Option<usize> {
    debug_assert!(alignment.is_power_of_two());

    let mask = alignment - 1;

    n.checked_add(mask).map(|n| n & !mask)
}

// mod tests
