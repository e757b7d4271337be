//! A bit mask representing the occupation (or not) of up to 64 chunks.

use core::cell::Cell;

#[derive(Default)]
pub(crate) struct BitMask(Cell<u64>);

impl BitMask {
    pub(crate) const CAPACITY: usize = 64;

    /// Creates a BitMask with the given mask.
    pub(crate) fn new(mask: u64) -> Self { Self(Cell::new(mask)) }

    /// Returns the index of the lowest 0 bit at or above `from`, or None if there is none.
    pub(crate) fn first_unclaimed_from(&self, from: usize) -> Option<usize> {
        debug_assert!(from <= Self::CAPACITY);

        let mask = self.0.get() | Self::low(from);
        let candidate = (!mask).trailing_zeros() as usize;

        if candidate == Self::CAPACITY { None } else { Some(candidate) }
    }

    /// Returns whether the bit at given index is set.
    pub(crate) fn is_claimed(&self, inner: usize) -> bool {
        debug_assert!(inner < Self::CAPACITY);

        self.0.get() & (1u64 << inner) != 0
    }

    /// Claims the bit at given index.
    ///
    /// Returns true on success, false if the bit was already set.
    pub(crate) fn claim_at(&self, inner: usize) -> bool {
        debug_assert!(inner < Self::CAPACITY);

        let mask = 1u64 << inner;
        let before = self.0.get();

        self.0.set(before | mask);

        before & mask == 0
    }

    /// Releases the bit at given index.
    ///
    /// Returns true on success, false if the bit was not set.
    pub(crate) fn release_at(&self, inner: usize) -> bool {
        debug_assert!(inner < Self::CAPACITY);

        let mask = 1u64 << inner;
        let before = self.0.get();

        self.0.set(before & !mask);

        before & mask == mask
    }

    /// Returns the number of set bits.
    pub(crate) fn count_claimed(&self) -> usize { self.0.get().count_ones() as usize }

    /// Computes a mask with the `number` low bits set, and all others unset.
    pub(crate) fn low(number: usize) -> u64 {
        debug_assert!(number <= Self::CAPACITY);

        if number == Self::CAPACITY {
            u64::MAX
        } else {
            (1u64 << number) - 1
        }
    }

    #[cfg(test)]
    fn load(&self) -> u64 { self.0.get() }
}

// mod tests
