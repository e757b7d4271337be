//! A Doubly Linked List, whose nodes are allocated from a `MemoryResource`.
//!
//! The list does not own its memory resource: it borrows it for its whole lifetime, and returns every node to it,
//! at the latest when dropped. Several lists may share the same resource.

mod iter;
mod node;

pub use iter::{Iter, IterMut};

use core::{alloc::Layout, fmt, marker::PhantomData};

use chunkpool_core::{AllocError, MemoryResource};

use node::NodeHandle;

/// Returns the layout of the nodes of a `DoublyLinkedList<T, _>`.
///
/// Each element of the list occupies exactly one allocation of this layout, which makes it possible to size a pool
/// for a given number of elements.
pub fn node_layout<T>() -> Layout { NodeHandle::<T>::layout() }

/// A doubly linked list.
pub struct DoublyLinkedList<'a, T, R: MemoryResource + ?Sized> {
    //  Invariant: `length == 0` iff `head` and `tail` are None; `length == 1` iff `head == tail`.
    head: Option<NodeHandle<T>>,
    tail: Option<NodeHandle<T>>,
    length: usize,
    resource: &'a R,
    _marker: PhantomData<T>,
}

impl<'a, T, R: MemoryResource + ?Sized> DoublyLinkedList<'a, T, R> {
    /// Creates a new, empty, list allocating its nodes from `resource`.
    pub fn new(resource: &'a R) -> Self {
        Self { head: None, tail: None, length: 0, resource, _marker: PhantomData }
    }

    /// Returns the memory resource the nodes are allocated from.
    pub fn resource(&self) -> &'a R { self.resource }

    /// Returns the number of elements in the list.
    pub fn len(&self) -> usize { self.length }

    /// Returns whether the list is empty, or not.
    pub fn is_empty(&self) -> bool { self.length == 0 }

    /// Returns the number of elements in the list; synonym of `len`.
    pub fn size(&self) -> usize { self.len() }

    /// Returns whether the list is empty, or not; synonym of `is_empty`.
    pub fn empty(&self) -> bool { self.is_empty() }

    /// Appends an element at the back of the list, unless memory allocation fails.
    ///
    /// On failure, the list is left unmodified, and `value` is dropped.
    pub fn push_back(&mut self, value: T) -> Result<(), AllocError> {
        let handle = NodeHandle::allocate(value, self.resource)?;

        match self.tail {
            //  Safety:
            //  -   `tail` and `handle` are valid, and distinct.
            //  -   Access is exclusive, as guaranteed by `self` being borrowed mutably.
            Some(tail) => unsafe {
                tail.resolve_mut().next = Some(handle);
                handle.resolve_mut().prev = Some(tail);
            },
            None => self.head = Some(handle),
        }

        self.tail = Some(handle);
        self.length += 1;

        Ok(())
    }

    /// Prepends an element at the front of the list, unless memory allocation fails.
    ///
    /// On failure, the list is left unmodified, and `value` is dropped.
    pub fn push_front(&mut self, value: T) -> Result<(), AllocError> {
        let handle = NodeHandle::allocate(value, self.resource)?;

        match self.head {
            //  Safety:
            //  -   `head` and `handle` are valid, and distinct.
            //  -   Access is exclusive, as guaranteed by `self` being borrowed mutably.
            Some(head) => unsafe {
                head.resolve_mut().prev = Some(handle);
                handle.resolve_mut().next = Some(head);
            },
            None => self.tail = Some(handle),
        }

        self.head = Some(handle);
        self.length += 1;

        Ok(())
    }

    /// Pops the element at the front of the list, if any.
    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.head?;

        //  Safety:
        //  -   `head` is valid, as the list is not empty.
        //  -   Access is exclusive, as guaranteed by `self` being borrowed mutably.
        let next = unsafe { head.resolve().next };

        match next {
            //  Safety:
            //  -   `next` is valid, as it is linked from a valid node.
            Some(next) => unsafe { next.resolve_mut().prev = None },
            None => self.tail = None,
        }

        self.head = next;
        self.length -= 1;

        //  Safety:
        //  -   `head` was allocated by `self.resource`, and is no longer linked.
        Some(unsafe { head.take(self.resource) })
    }

    /// Pops the element at the back of the list, if any.
    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.tail?;

        //  Safety:
        //  -   `tail` is valid, as the list is not empty.
        //  -   Access is exclusive, as guaranteed by `self` being borrowed mutably.
        let prev = unsafe { tail.resolve().prev };

        match prev {
            //  Safety:
            //  -   `prev` is valid, as it is linked from a valid node.
            Some(prev) => unsafe { prev.resolve_mut().next = None },
            None => self.head = None,
        }

        self.tail = prev;
        self.length -= 1;

        //  Safety:
        //  -   `tail` was allocated by `self.resource`, and is no longer linked.
        Some(unsafe { tail.take(self.resource) })
    }

    /// Clears the list, dropping every element from front to back, and returning every node to the resource.
    ///
    /// The resulting list is empty.
    pub fn clear(&mut self) {
        let mut current = self.head.take();

        self.tail = None;
        self.length = 0;

        while let Some(handle) = current {
            //  Safety:
            //  -   `handle` is valid, as it is linked from the list.
            //  -   Access is exclusive, as guaranteed by `self` being borrowed mutably.
            current = unsafe { handle.resolve().next };

            //  Safety:
            //  -   `handle` was allocated by `self.resource`, and is no longer reachable.
            unsafe { handle.destroy(self.resource) };
        }
    }

    /// Returns a reference to the front element, if any.
    pub fn front(&self) -> Option<&T> {
        //  Safety:
        //  -   `head` is valid, and shared access is guaranteed by `self` being borrowed immutably.
        self.head.map(|head| unsafe { &head.resolve().value })
    }

    /// Returns a reference to the back element, if any.
    pub fn back(&self) -> Option<&T> {
        //  Safety:
        //  -   `tail` is valid, and shared access is guaranteed by `self` being borrowed immutably.
        self.tail.map(|tail| unsafe { &tail.resolve().value })
    }

    /// Returns a mutable reference to the front element, if any.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        //  Safety:
        //  -   `head` is valid, and exclusive access is guaranteed by `self` being borrowed mutably.
        self.head.map(|head| unsafe { &mut head.resolve_mut().value })
    }

    /// Returns a mutable reference to the back element, if any.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        //  Safety:
        //  -   `tail` is valid, and exclusive access is guaranteed by `self` being borrowed mutably.
        self.tail.map(|tail| unsafe { &mut tail.resolve_mut().value })
    }

    /// Returns whether the list contains `element`, or not.
    pub fn contains(&self, element: &T) -> bool
        where
            T: PartialEq,
    {
        self.iter().any(|e| e == element)
    }

    /// Returns an iterator pointing to the front element, or past the end if empty.
    pub fn begin(&self) -> Iter<'_, T> {
        //  Safety:
        //  -   `head` is the first of `length` valid nodes, which cannot be modified while `self` is borrowed.
        unsafe { Iter::new(self.head, self.length) }
    }

    /// Returns the past-the-end iterator.
    pub fn end(&self) -> Iter<'_, T> { Iter::end() }

    /// Returns an iterator over the elements, from front to back.
    pub fn iter(&self) -> Iter<'_, T> { self.begin() }

    /// Returns an iterator over mutable references to the elements, from front to back.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        //  Safety:
        //  -   `head` is the first of `length` valid nodes, exclusively accessible while `self` is borrowed.
        unsafe { IterMut::new(self.head, self.length) }
    }
}

impl<'a, T, R: MemoryResource + ?Sized> Drop for DoublyLinkedList<'a, T, R> {
    fn drop(&mut self) { self.clear(); }
}

impl<'a, T: fmt::Debug, R: MemoryResource + ?Sized> fmt::Debug for DoublyLinkedList<'a, T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.debug_list().entries(self.iter()).finish() }
}

impl<'b, 'a, T, R: MemoryResource + ?Sized> IntoIterator for &'b DoublyLinkedList<'a, T, R> {
    type Item = &'b T;
    type IntoIter = Iter<'b, T>;

    fn into_iter(self) -> Iter<'b, T> { self.iter() }
}

impl<'b, 'a, T, R: MemoryResource + ?Sized> IntoIterator for &'b mut DoublyLinkedList<'a, T, R> {
    type Item = &'b mut T;
    type IntoIter = IterMut<'b, T>;

    fn into_iter(self) -> IterMut<'b, T> { self.iter_mut() }
}

// mod tests
