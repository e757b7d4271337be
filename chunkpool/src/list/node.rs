//! A Node of the list, living in a chunk of the list's memory resource.
//!
//! Nodes are never moved: they are written in place in a freshly allocated chunk, and read out of it before the
//! chunk is returned.

use core::{
    alloc::Layout,
    ptr::{self, NonNull},
};

use chunkpool_core::{AllocError, MemoryResource};
use log::error;

pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) prev: Option<NodeHandle<T>>,
    pub(crate) next: Option<NodeHandle<T>>,
}

/// NodeHandle
///
/// A non-owning handle to a Node, valid from its allocation until its deallocation.
pub(crate) struct NodeHandle<T>(NonNull<Node<T>>);

impl<T> NodeHandle<T> {
    /// Returns the layout requested from the memory resource for each node.
    pub(crate) fn layout() -> Layout { Layout::new::<Node<T>>() }

    /// Allocates a node from `resource`, and writes `value` in it, unlinked.
    ///
    /// On failure, `value` is dropped.
    pub(crate) fn allocate<R>(value: T, resource: &R) -> Result<Self, AllocError>
        where
            R: MemoryResource + ?Sized,
    {
        let pointer = resource.allocate(Self::layout())?.cast::<Node<T>>();

        //  Safety:
        //  -   `pointer` is valid for writes of `Self::layout()` bytes, and suitably aligned, as per the contract of
        //      `MemoryResource`.
        //  -   Access to the chunk is exclusive, as it is not handed out again until deallocated.
        unsafe { ptr::write(pointer.as_ptr(), Node { value, prev: None, next: None }) };

        Ok(Self(pointer))
    }

    /// Moves the value out of the node, and returns the node's chunk to `resource`.
    ///
    /// #   Safety
    ///
    /// -   Assumes that the handle was allocated by `resource`, and is still valid.
    /// -   Assumes that the handle, and any copy of it, is no longer used afterwards.
    pub(crate) unsafe fn take<R>(self, resource: &R) -> T
        where
            R: MemoryResource + ?Sized,
    {
        //  Safety:
        //  -   The node is valid, and will not be read again.
        let node = ptr::read(self.0.as_ptr());

        self.release(resource);

        node.value
    }

    /// Drops the value in place, and returns the node's chunk to `resource`.
    ///
    /// #   Safety
    ///
    /// -   Assumes that the handle was allocated by `resource`, and is still valid.
    /// -   Assumes that the handle, and any copy of it, is no longer used afterwards.
    pub(crate) unsafe fn destroy<R>(self, resource: &R)
        where
            R: MemoryResource + ?Sized,
    {
        //  Safety:
        //  -   The node is valid, and its value will not be used again.
        ptr::drop_in_place(&mut (*self.0.as_ptr()).value);

        self.release(resource);
    }

    /// Returns a shared reference to the node.
    ///
    /// #   Safety
    ///
    /// -   Assumes that the handle is valid for `'a`.
    /// -   Assumes that no exclusive reference to the node exists for `'a`.
    pub(crate) unsafe fn resolve<'a>(self) -> &'a Node<T> { &*self.0.as_ptr() }

    /// Returns an exclusive reference to the node.
    ///
    /// #   Safety
    ///
    /// -   Assumes that the handle is valid for `'a`.
    /// -   Assumes that no other reference to the node exists for `'a`.
    pub(crate) unsafe fn resolve_mut<'a>(self) -> &'a mut Node<T> { &mut *self.0.as_ptr() }

    //  Returns the chunk to `resource`.
    //
    //  A failure means the list's bookkeeping is corrupted, there is nothing to recover.
    unsafe fn release<R>(self, resource: &R)
        where
            R: MemoryResource + ?Sized,
    {
        if let Err(e) = resource.deallocate(self.0.as_ptr() as *mut u8, Self::layout()) {
            error!("NodeHandle::release({:p}): {}", self.0, e);
            debug_assert!(false, "Failed to release node {:p}: {}", self.0, e);
        }
    }
}

impl<T> Clone for NodeHandle<T> {
    fn clone(&self) -> Self { *self }
}

impl<T> Copy for NodeHandle<T> {}

impl<T> PartialEq for NodeHandle<T> {
    fn eq(&self, other: &Self) -> bool { self.0 == other.0 }
}

impl<T> Eq for NodeHandle<T> {}

// mod tests
