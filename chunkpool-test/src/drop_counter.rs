//! A value counting how many of its clones were dropped.

use std::{cell::Cell, rc::Rc};

/// DropCounter is a test value for checking that containers drop their elements exactly once.
///
/// All clones of a `DropCounter` share the same count, which is incremented each time one of them is dropped.
#[derive(Clone, Debug, Default)]
pub struct DropCounter {
    drops: Rc<Cell<usize>>,
}

impl DropCounter {
    /// Creates a new instance, with a fresh count.
    pub fn new() -> Self { Self::default() }

    /// Returns the number of clones dropped so far.
    pub fn drops(&self) -> usize { self.drops.get() }

    /// Returns the number of clones currently alive, including `self`.
    pub fn strong_count(&self) -> usize { Rc::strong_count(&self.drops) }
}

impl Drop for DropCounter {
    fn drop(&mut self) { self.drops.set(self.drops.get() + 1); }
}

// mod tests
