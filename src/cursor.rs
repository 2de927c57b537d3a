//! Bidirectional positions inside a [`BTree`].
//!
//! A [`Cursor`] is a `(tree, node, index)` triple. Moving it only looks at
//! the current node, its children and its parent link: every node records the
//! child slot of its parent it hangs from, so climbing back up knows where to
//! resume without a stack and without writing anything into the tree. Any
//! number of cursors can walk the same tree at once.
//!
//! Besides the elements there is one "ghost" position, returned by
//! [`BTree::end`] and [`BTree::rend`]. It dereferences to `None`; moving
//! forward from it lands on the first element and moving backward lands on
//! the last one.

use crate::btree::BTree;
use crate::node::NodeId;
use std::{fmt, iter::FusedIterator, ptr};

pub struct Cursor<'a, T> {
    tree: &'a BTree<T>,
    node: Option<NodeId>,
    index: usize,
}

impl<'a, T> Cursor<'a, T> {
    #[inline]
    pub(crate) fn new(tree: &'a BTree<T>, node: Option<NodeId>, index: usize) -> Self {
        Self { tree, node, index }
    }

    /// The element under the cursor, `None` on the ghost position.
    #[inline]
    pub fn current(&self) -> Option<&'a T> {
        let tree = self.tree;
        tree.node(self.node?).elements().get(self.index)
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    pub fn peek_next(&self) -> Option<&'a T> {
        let mut next = *self;
        next.move_next();
        next.current()
    }

    pub fn peek_prev(&self) -> Option<&'a T> {
        let mut prev = *self;
        prev.move_prev();
        prev.current()
    }

    /// Steps to the next larger element, or to the ghost after the last one.
    ///
    /// O(height) worst case, O(1) amortized over a full walk.
    pub fn move_next(&mut self) {
        let tree = self.tree;
        let id = match self.node {
            Some(id) => id,
            None => {
                *self = tree.begin();
                return;
            }
        };

        let node = tree.node(id);
        if let Some(child) = node.child(self.index + 1) {
            self.node = Some(tree.leftmost(child));
            self.index = 0;
        } else if self.index + 1 < node.len() {
            self.index += 1;
        } else {
            self.ascend_next(id);
        }
    }

    /// Steps to the next smaller element, or to the ghost before the first one.
    ///
    /// O(height) worst case, O(1) amortized over a full walk.
    pub fn move_prev(&mut self) {
        let tree = self.tree;
        let id = match self.node {
            Some(id) => id,
            None => {
                *self = tree.back();
                return;
            }
        };

        let node = tree.node(id);
        if let Some(child) = node.child(self.index) {
            let last = tree.rightmost(child);
            self.node = Some(last);
            self.index = tree.node(last).len() - 1;
        } else if 0 < self.index {
            self.index -= 1;
        } else {
            self.ascend_prev(id);
        }
    }

    /// Climbs until some ancestor has an element right of the slot we came from.
    fn ascend_next(&mut self, mut id: NodeId) {
        let tree = self.tree;
        loop {
            let node = tree.node(id);
            let parent = match node.parent() {
                Some(parent) => parent,
                None => break,
            };

            let slot = node.slot_in_parent();
            if slot < tree.node(parent).len() {
                self.node = Some(parent);
                self.index = slot;
                return;
            }
            id = parent;
        }

        self.node = None;
        self.index = 0;
    }

    /// Climbs until some ancestor has an element left of the slot we came from.
    fn ascend_prev(&mut self, mut id: NodeId) {
        let tree = self.tree;
        loop {
            let node = tree.node(id);
            let parent = match node.parent() {
                Some(parent) => parent,
                None => break,
            };

            let slot = node.slot_in_parent();
            if 0 < slot {
                self.node = Some(parent);
                self.index = slot - 1;
                return;
            }
            id = parent;
        }

        self.node = None;
        self.index = 0;
    }
}

impl<'a, T> Clone for Cursor<'a, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Cursor<'a, T> {}

/// Same tree, same node, same slot.
impl<'a, T> PartialEq for Cursor<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.tree, other.tree) && self.node == other.node && self.index == other.index
    }
}

impl<'a, T> Eq for Cursor<'a, T> {}

impl<'a, T: fmt::Debug> fmt::Debug for Cursor<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("node", &self.node.map(NodeId::idx))
            .field("index", &self.index)
            .field("current", &self.current())
            .finish()
    }
}

/// A [`Cursor`] walking in descending order.
///
/// Unlike a C++ `reverse_iterator` it dereferences the element it sits on.
pub struct ReverseCursor<'a, T> {
    inner: Cursor<'a, T>,
}

impl<'a, T> ReverseCursor<'a, T> {
    #[inline]
    pub fn new(inner: Cursor<'a, T>) -> Self {
        Self { inner }
    }

    /// The forward cursor at the same position.
    #[inline]
    pub fn base(&self) -> Cursor<'a, T> {
        self.inner
    }

    #[inline]
    pub fn current(&self) -> Option<&'a T> {
        self.inner.current()
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        self.inner.is_end()
    }

    /// Steps to the next smaller element.
    #[inline]
    pub fn move_next(&mut self) {
        self.inner.move_prev();
    }

    /// Steps to the next larger element.
    #[inline]
    pub fn move_prev(&mut self) {
        self.inner.move_next();
    }
}

impl<'a, T> Clone for ReverseCursor<'a, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for ReverseCursor<'a, T> {}

impl<'a, T> PartialEq for ReverseCursor<'a, T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<'a, T> Eq for ReverseCursor<'a, T> {}

impl<'a, T: fmt::Debug> fmt::Debug for ReverseCursor<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReverseCursor").field(&self.inner).finish()
    }
}

/// Sorted iterator over a [`BTree`], see [`BTree::iter`].
pub struct Iter<'a, T> {
    front: Cursor<'a, T>,
    back: Cursor<'a, T>,
    len: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(front: Cursor<'a, T>, back: Cursor<'a, T>, len: usize) -> Self {
        Self { front, back, len }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;

        let item = self.front.current();
        self.front.move_next();
        item
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }

    #[inline]
    fn last(mut self) -> Option<&'a T> {
        self.next_back()
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;

        let item = self.back.current();
        self.back.move_prev();
        item
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {
    #[inline]
    fn len(&self) -> usize {
        self.len
    }
}

impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Self {
            front: self.front,
            back: self.back,
            len: self.len,
        }
    }
}

impl<'a, T: fmt::Debug> fmt::Debug for Iter<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
