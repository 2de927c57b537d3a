use std::borrow::Borrow;

/// Index of a node inside its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    #[inline(always)]
    pub fn new(idx: usize) -> Self {
        Self(idx)
    }

    #[inline(always)]
    pub fn idx(self) -> usize {
        self.0
    }
}

/// A run of up to `capacity` sorted elements with `capacity + 1` child slots.
///
/// Child slot `i` sits between `elements[i - 1]` and `elements[i]`. Only full
/// nodes ever get children, so the elements of a node with children never
/// shift and `slot_in_parent` stays valid for the node's whole life.
#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    elements: Vec<T>,
    children: Box<[Option<NodeId>]>,
    parent: Option<NodeId>,
    slot_in_parent: usize,
}

impl<T> Node<T> {
    /// Creates a node seeded with `elem`, hanging from `parent` at child slot `slot`.
    pub fn new(elem: T, capacity: usize, parent: Option<NodeId>, slot: usize) -> Self {
        debug_assert!(capacity > 0);

        let mut elements = Vec::with_capacity(capacity);
        elements.push(elem);

        Self {
            elements,
            children: vec![None; capacity + 1].into_boxed_slice(),
            parent,
            slot_in_parent: slot,
        }
    }

    #[inline]
    pub fn elements(&self) -> &[T] {
        &self.elements
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.children.len() - 1
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn slot_in_parent(&self) -> usize {
        self.slot_in_parent
    }

    #[inline]
    pub fn child(&self, slot: usize) -> Option<NodeId> {
        self.children[slot]
    }

    #[inline]
    pub fn children(&self) -> &[Option<NodeId>] {
        &self.children
    }

    #[inline]
    pub fn last(&self) -> Option<&T> {
        self.elements.last()
    }

    /// `Ok(i)` if `elements[i]` equals `elem`, otherwise `Err(slot)` where
    /// `slot` is the index of the first greater element (or `len()`).
    ///
    /// O(log capacity)
    #[inline]
    pub fn search<Q>(&self, elem: &Q) -> Result<usize, usize>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.elements
            .binary_search_by(|probe| Borrow::<Q>::borrow(probe).cmp(elem))
    }

    /// Inserts `elem` at `idx`, shifting the tail of the run right.
    ///
    /// O(capacity)
    pub fn insert(&mut self, idx: usize, elem: T) {
        assert!(!self.is_full(), "inserted into a full node");
        debug_assert!(self.children.iter().all(Option::is_none));

        self.elements.insert(idx, elem);
    }

    pub fn set_child(&mut self, slot: usize, child: NodeId) {
        debug_assert!(self.is_full());
        debug_assert!(self.children[slot].is_none());

        self.children[slot] = Some(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_node() {
        let node = Node::new(7, 3, None, 0);
        assert_eq!(node.elements(), &[7]);
        assert_eq!(node.capacity(), 3);
        assert_eq!(node.children().len(), 4);
        assert!(node.children().iter().all(Option::is_none));
        assert!(!node.is_full());
        assert_eq!(node.parent(), None);
    }

    #[test]
    fn search_reports_slots() {
        let mut node = Node::new(20, 3, Some(NodeId::new(4)), 2);
        node.insert(0, 10);
        node.insert(2, 30);
        assert!(node.is_full());

        assert_eq!(node.search(&20), Ok(1));
        assert_eq!(node.search(&5), Err(0));
        assert_eq!(node.search(&15), Err(1));
        assert_eq!(node.search(&35), Err(3));
        assert_eq!(node.parent(), Some(NodeId::new(4)));
        assert_eq!(node.slot_in_parent(), 2);
    }

    #[test]
    #[should_panic(expected = "full node")]
    fn full_node_rejects_insert() {
        let mut node = Node::new(1, 1, None, 0);
        node.insert(1, 2);
    }
}
