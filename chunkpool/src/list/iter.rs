//! Forward iterators over the elements of a list.

use core::{iter::FusedIterator, marker::PhantomData};

use super::node::NodeHandle;

/// Iter
///
/// A forward iterator over shared references to the elements of a list.
///
/// Two iterators compare equal if they point to the same node, or are both past the end.
pub struct Iter<'a, T> {
    node: Option<NodeHandle<T>>,
    remaining: usize,
    _marker: PhantomData<&'a T>,
}

impl<'a, T> Iter<'a, T> {
    //  Safety:
    //  -   `node` is assumed to be the first of `remaining` valid, linked, nodes.
    //  -   The nodes are assumed not to be modified for `'a`.
    pub(crate) unsafe fn new(node: Option<NodeHandle<T>>, remaining: usize) -> Self {
        debug_assert_eq!(node.is_none(), remaining == 0);

        Self { node, remaining, _marker: PhantomData }
    }

    /// Returns the past-the-end iterator.
    pub(crate) fn end() -> Self { Self { node: None, remaining: 0, _marker: PhantomData } }

    /// Returns the element the iterator points to, without advancing it, or None if past the end.
    pub fn peek(&self) -> Option<&'a T> {
        //  Safety:
        //  -   Valid for `'a`, as per constructor.
        self.node.map(|node| unsafe { &node.resolve().value })
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.node?;

        //  Safety:
        //  -   Valid for `'a`, as per constructor.
        let node = unsafe { node.resolve() };

        self.node = node.next;
        self.remaining -= 1;

        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.remaining, Some(self.remaining)) }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self { Self { node: self.node, remaining: self.remaining, _marker: PhantomData } }
}

impl<'a, T> PartialEq for Iter<'a, T> {
    fn eq(&self, other: &Self) -> bool { self.node == other.node }
}

impl<'a, T> Eq for Iter<'a, T> {}

/// IterMut
///
/// A forward iterator over exclusive references to the elements of a list.
pub struct IterMut<'a, T> {
    node: Option<NodeHandle<T>>,
    remaining: usize,
    _marker: PhantomData<&'a mut T>,
}

impl<'a, T> IterMut<'a, T> {
    //  Safety:
    //  -   `node` is assumed to be the first of `remaining` valid, linked, nodes.
    //  -   Access to the nodes is assumed to be exclusive for `'a`.
    pub(crate) unsafe fn new(node: Option<NodeHandle<T>>, remaining: usize) -> Self {
        debug_assert_eq!(node.is_none(), remaining == 0);

        Self { node, remaining, _marker: PhantomData }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<&'a mut T> {
        let node = self.node?;

        //  Safety:
        //  -   Valid, and exclusive, for `'a`, as per constructor.
        //  -   Each node is yielded at most once.
        let node = unsafe { node.resolve_mut() };

        self.node = node.next;
        self.remaining -= 1;

        Some(&mut node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) { (self.remaining, Some(self.remaining)) }
}

impl<'a, T> ExactSizeIterator for IterMut<'a, T> {}

impl<'a, T> FusedIterator for IterMut<'a, T> {}
