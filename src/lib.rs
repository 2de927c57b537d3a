//! An in-memory ordered set built from multi-element nodes.
//!
//! Each node of a [`BTree`] keeps up to `capacity` sorted elements and
//! `capacity + 1` child slots. A node fills up in place; after that new
//! elements travel down into its child slots. Nodes are never split, so the
//! tree trades height guarantees for never moving an element between nodes.
//!
//! ```
//! use mwtree::BTree;
//!
//! let mut tree = BTree::new(3).unwrap();
//! for x in [5, 3, 8, 1, 4, 7, 9, 2, 6].iter().copied() {
//!     tree.insert(x);
//! }
//!
//! assert_eq!(tree.len(), 9);
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), (1..=9).collect::<Vec<_>>());
//! assert_eq!(tree.find(&8).current(), Some(&8));
//! assert!(tree.find(&10) == tree.end());
//!
//! let (cursor, inserted) = tree.insert(4);
//! assert!(!inserted);
//! assert_eq!(cursor.current(), Some(&4));
//!
//! let mut rev = tree.rbegin();
//! rev.move_next();
//! assert_eq!(rev.current(), Some(&8));
//! ```

mod btree;
mod cursor;
mod error;
mod node;

#[cfg(test)]
mod proptests;

pub use btree::{BTree, DEFAULT_NODE_CAPACITY};
pub use cursor::{Cursor, Iter, ReverseCursor};
pub use error::{Error, Result};
