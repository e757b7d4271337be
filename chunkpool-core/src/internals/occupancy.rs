//! The occupancy of the chunks of a pool, one bit per chunk.
//!
//! The bits are packed in 64-bits masks; the padding bits of the last mask, which correspond to no chunk, are
//! permanently claimed so that a scan never yields them.

use alloc::boxed::Box;

use super::bit_mask::BitMask;

pub(crate) struct Occupancy {
    masks: Box<[BitMask]>,
    len: usize,
}

impl Occupancy {
    /// Creates an instance tracking `len` chunks, all unclaimed.
    pub(crate) fn new(len: usize) -> Self {
        debug_assert!(len > 0);

        let number_masks = (len + BitMask::CAPACITY - 1) / BitMask::CAPACITY;
        let padding = number_masks * BitMask::CAPACITY - len;

        let masks = (0..number_masks)
            .map(|index| {
                if index + 1 == number_masks && padding > 0 {
                    BitMask::new(!BitMask::low(BitMask::CAPACITY - padding))
                } else {
                    BitMask::default()
                }
            })
            .collect();

        Self { masks, len }
    }

    /// Returns the number of chunks tracked.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize { self.len }

    /// Returns the number of claimed chunks.
    pub(crate) fn claimed(&self) -> usize {
        let padding = self.masks.len() * BitMask::CAPACITY - self.len;
        let total: usize = self.masks.iter().map(BitMask::count_claimed).sum();

        total - padding
    }

    /// Claims the first unclaimed chunk, in ascending order, for which `accept` returns true.
    ///
    /// Returns the index of the claimed chunk, or None if no unclaimed chunk is accepted.
    pub(crate) fn claim_first<F>(&self, mut accept: F) -> Option<usize>
        where
            F: FnMut(usize) -> bool,
    {
        for (outer, mask) in self.masks.iter().enumerate() {
            let mut from = 0;

            while let Some(inner) = mask.first_unclaimed_from(from) {
                let index = outer * BitMask::CAPACITY + inner;

                if accept(index) {
                    let claimed = mask.claim_at(inner);
                    debug_assert!(claimed);

                    return Some(index);
                }

                from = inner + 1;
            }
        }

        None
    }

    /// Returns whether the chunk at `index` is claimed.
    pub(crate) fn is_claimed(&self, index: usize) -> bool {
        debug_assert!(index < self.len);

        let (outer, inner) = Self::split(index);
        self.masks[outer].is_claimed(inner)
    }

    /// Releases the chunk at `index`.
    ///
    /// Returns true on success, false if the chunk was not claimed.
    pub(crate) fn release(&self, index: usize) -> bool {
        debug_assert!(index < self.len);

        let (outer, inner) = Self::split(index);
        self.masks[outer].release_at(inner)
    }

    fn split(index: usize) -> (usize, usize) { (index / BitMask::CAPACITY, index % BitMask::CAPACITY) }
}

// mod tests
