use crate::cursor::{Cursor, Iter, ReverseCursor};
use crate::error::{Error, Result};
use crate::node::{Node, NodeId};
use std::{
    borrow::Borrow,
    collections::VecDeque,
    fmt,
    iter::FromIterator,
    mem,
    num::NonZeroUsize,
};
use tracing::{debug, trace};

/// Elements per node used by `Default` and `FromIterator`.
pub const DEFAULT_NODE_CAPACITY: usize = 40;

/// An ordered set storing up to `capacity` elements per node.
///
/// A node fills up in place; once full, new elements are routed into its
/// child slots and the tree grows downward. Nodes are never split, so the
/// height is not bounded: strictly increasing inserts add one level per
/// `capacity` elements.
///
/// All nodes live in an arena owned by the tree. Child slots and parent links
/// are arena indices, so there are no ownership cycles and dropping the tree
/// releases every node at once.
pub struct BTree<T> {
    nodes: Vec<Node<T>>,
    root: Option<NodeId>,
    /// Node holding the maximum element.
    tail: Option<NodeId>,
    capacity: usize,
    len: usize,
}

impl<T> BTree<T> {
    /// Fails with [`Error::ZeroCapacity`] if `capacity` is 0.
    ///
    /// O(1)
    pub fn new(capacity: usize) -> Result<Self> {
        NonZeroUsize::new(capacity)
            .map(Self::with_node_capacity)
            .ok_or(Error::ZeroCapacity)
    }

    /// O(1)
    #[inline]
    pub fn with_node_capacity(capacity: NonZeroUsize) -> Self {
        Self::empty(capacity.get())
    }

    #[inline]
    fn empty(capacity: usize) -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            tail: None,
            capacity,
            len: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of elements a single node holds.
    #[inline]
    pub fn node_capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of node levels, 0 for an empty tree.
    ///
    /// O(number of nodes)
    pub fn height(&self) -> usize {
        // Parents are always allocated before their children.
        let mut depths = Vec::with_capacity(self.nodes.len());
        for node in self.nodes.iter() {
            let depth = node.parent().map_or(1, |parent| depths[parent.idx()] + 1);
            depths.push(depth);
        }
        depths.into_iter().max().unwrap_or(0)
    }

    /// Drops every element, keeping the node capacity.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.tail = None;
        self.len = 0;
    }

    /// Moves the whole tree out in O(1), leaving `self` empty with the same
    /// node capacity.
    pub fn take(&mut self) -> Self {
        debug!(len = self.len, nodes = self.nodes.len(), "moving tree out");
        let capacity = self.capacity;
        mem::replace(self, Self::empty(capacity))
    }

    /// O(height)
    #[inline]
    pub fn first(&self) -> Option<&T> {
        self.begin().current()
    }

    /// O(1)
    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.node(self.tail?).last()
    }

    /// Cursor at the smallest element, or `end()` if the tree is empty.
    ///
    /// O(height)
    pub fn begin(&self) -> Cursor<'_, T> {
        match self.root {
            Some(root) => Cursor::new(self, Some(self.leftmost(root)), 0),
            None => self.end(),
        }
    }

    #[inline]
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(self, None, 0)
    }

    /// Reverse cursor at the largest element, read straight off the cached tail.
    ///
    /// O(1)
    #[inline]
    pub fn rbegin(&self) -> ReverseCursor<'_, T> {
        ReverseCursor::new(self.back())
    }

    #[inline]
    pub fn rend(&self) -> ReverseCursor<'_, T> {
        ReverseCursor::new(self.end())
    }

    /// Sorted iterator; `.rev()` starts from the cached tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.begin(), self.back(), self.len)
    }

    /// Cursor at the largest element, or `end()` if the tree is empty.
    pub(crate) fn back(&self) -> Cursor<'_, T> {
        match self.tail {
            Some(tail) => Cursor::new(self, Some(tail), self.node(tail).len() - 1),
            None => self.end(),
        }
    }

    #[inline(always)]
    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.idx()]
    }

    /// Follows child slot 0 down from `id`.
    pub(crate) fn leftmost(&self, mut id: NodeId) -> NodeId {
        while let Some(child) = self.node(id).child(0) {
            id = child;
        }
        id
    }

    /// Follows the last child slot down from `id`.
    pub(crate) fn rightmost(&self, mut id: NodeId) -> NodeId {
        loop {
            let node = self.node(id);
            match node.child(node.len()) {
                Some(child) => id = child,
                None => return id,
            }
        }
    }

    fn alloc(&mut self, elem: T, parent: Option<NodeId>, slot: usize) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(elem, self.capacity, parent, slot));
        trace!(node = id.idx(), parent = ?parent, slot, "allocated node");
        id
    }
}

impl<T: Ord> BTree<T> {
    /// Inserts `elem` unless an equal element is already present.
    ///
    /// Returns a cursor at the element equal to `elem` and whether the tree
    /// grew. A duplicate leaves the tree untouched.
    ///
    /// Inserting into a node that is not full shifts that node's larger
    /// elements one slot right, so a position remembered from before the
    /// insert may now name a different element. Cursors borrow the tree,
    /// which keeps them from being held across this call.
    ///
    /// O(height * log capacity + capacity)
    pub fn insert(&mut self, elem: T) -> (Cursor<'_, T>, bool) {
        let mut cur = match self.root {
            Some(root) => root,
            None => {
                let root = self.alloc(elem, None, 0);
                self.root = Some(root);
                self.tail = Some(root);
                self.len = 1;
                return (Cursor::new(self, Some(root), 0), true);
            }
        };

        loop {
            let (slot, is_full, child) = {
                let node = self.node(cur);
                match node.search(&elem) {
                    Ok(idx) => return (Cursor::new(self, Some(cur), idx), false),
                    Err(slot) => (slot, node.is_full(), node.child(slot)),
                }
            };

            if !is_full {
                self.nodes[cur.idx()].insert(slot, elem);
                self.len += 1;
                return (Cursor::new(self, Some(cur), slot), true);
            }

            match child {
                Some(child) => cur = child,
                None => {
                    let is_max = self.last().map_or(true, |max| elem > *max);

                    let child = self.alloc(elem, Some(cur), slot);
                    self.nodes[cur.idx()].set_child(slot, child);
                    if is_max {
                        self.tail = Some(child);
                    }
                    self.len += 1;

                    return (Cursor::new(self, Some(child), 0), true);
                }
            }
        }
    }

    /// Cursor at the element equal to `elem`, or `end()`.
    ///
    /// O(height * log capacity)
    pub fn find<Q>(&self, elem: &Q) -> Cursor<'_, T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = self.root;
        while let Some(id) = cur {
            let node = self.node(id);
            match node.search(elem) {
                Ok(idx) => return Cursor::new(self, Some(id), idx),
                Err(slot) => cur = node.child(slot),
            }
        }
        self.end()
    }

    #[inline]
    pub fn contains<Q>(&self, elem: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        !self.find(elem).is_end()
    }

    /// Re-inserts the elements of `source` node by node in breadth-first order.
    fn copy_from(&mut self, source: &Self)
    where
        T: Clone,
    {
        let mut queue: VecDeque<NodeId> = source.root.into_iter().collect();
        while let Some(id) = queue.pop_front() {
            let node = source.node(id);
            for elem in node.elements() {
                self.insert(elem.clone());
            }
            queue.extend(node.children().iter().filter_map(|&child| child));
        }
        debug!(len = self.len, nodes = self.nodes.len(), "copied tree");
    }
}

impl<T: Ord + Clone> Clone for BTree<T> {
    fn clone(&self) -> Self {
        let mut tree = Self::empty(self.capacity);
        tree.nodes.reserve(self.nodes.len());
        tree.copy_from(self);
        tree
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.capacity = source.capacity;
        self.copy_from(source);
    }
}

impl<T> Default for BTree<T> {
    fn default() -> Self {
        Self::empty(DEFAULT_NODE_CAPACITY)
    }
}

impl<T: Ord> FromIterator<T> for BTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::default();
        tree.extend(iter);
        tree
    }
}

impl<T: Ord> Extend<T> for BTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for elem in iter {
            self.insert(elem);
        }
    }
}

impl<'a, T: Ord + Copy + 'a> Extend<&'a T> for BTree<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<'a, T> IntoIterator for &'a BTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for BTree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for BTree<T> {}

impl<T: fmt::Debug> fmt::Debug for BTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Breadth-first dump of the elements, separated by single spaces.
impl<T: fmt::Display> fmt::Display for BTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut queue: VecDeque<NodeId> = self.root.into_iter().collect();
        let mut first = true;
        while let Some(id) = queue.pop_front() {
            let node = self.node(id);
            for elem in node.elements() {
                if !first {
                    f.write_str(" ")?;
                }
                first = false;
                write!(f, "{}", elem)?;
            }
            queue.extend(node.children().iter().filter_map(|&child| child));
        }
        Ok(())
    }
}

#[cfg(test)]
impl<T: Ord + fmt::Debug> BTree<T> {
    /// Panics if any structural invariant is broken.
    pub(crate) fn check_invariants(&self) {
        let total: usize = self.nodes.iter().map(Node::len).sum();
        assert_eq!(total, self.len, "len out of sync with nodes");

        let root = match self.root {
            Some(root) => root,
            None => {
                assert!(self.nodes.is_empty());
                assert_eq!(self.tail, None);
                return;
            }
        };
        assert_eq!(self.node(root).parent(), None);

        for (idx, node) in self.nodes.iter().enumerate() {
            let id = NodeId::new(idx);
            assert!(
                (1..=self.capacity).contains(&node.len()),
                "node {} holds {} elements",
                idx,
                node.len(),
            );
            assert!(
                node.elements().windows(2).all(|w| w[0] < w[1]),
                "node {} is not strictly increasing: {:?}",
                idx,
                node.elements(),
            );

            for (slot, &child) in node.children().iter().enumerate() {
                let child = match child {
                    Some(child) => child,
                    None => continue,
                };
                assert!(node.is_full(), "node {} has children but is not full", idx);

                let child = self.node(child);
                assert_eq!(child.parent(), Some(id));
                assert_eq!(child.slot_in_parent(), slot);
                if 0 < slot {
                    assert!(node.elements()[slot - 1] < child.elements()[0]);
                }
                if slot < node.len() {
                    assert!(child.last() < node.elements().get(slot));
                }
            }
        }

        let max = self.nodes.iter().filter_map(Node::last).max();
        assert_eq!(self.last(), max, "tail does not hold the maximum");

        let mut walked = 0;
        let mut prev: Option<&T> = None;
        let mut cursor = self.begin();
        while let Some(elem) = cursor.current() {
            if let Some(prev) = prev {
                assert!(prev < elem, "{:?} walked before {:?}", prev, elem);
            }
            prev = Some(elem);
            walked += 1;
            cursor.move_next();
        }
        assert_eq!(walked, self.len);
    }
}
