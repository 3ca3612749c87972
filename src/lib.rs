//! This crate exposes three interchangeable ordered key sets built on Binary Search Trees (BSTs)
//! with different balancing disciplines, mostly for educational purposes.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to insert, find, and delete
//! stored keys. BSTs are typically defined recursively using the notion of a `Node`. A `Node`
//! stores one key and will sometimes have child `Node`s. The most important invariants of a BST
//! are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a value less than its
//!    own value.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a value greater than
//!    its own value.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching takes `O(height)`. With clever construction the height of a BST can be limited to
//! `O(lg N)` where `N` is the number of nodes in the tree:
//!
//! - [`bst::Tree`] never rebalances. Sorted inserts degrade it into a linked list.
//! - [`avl::Tree`] tracks subtree heights and rotates whenever two siblings differ in height by
//!   more than one.
//! - [`rbtree::Tree`] colors every node red or black and repairs the coloring rules with
//!   recolors and rotations.
//!
//! All three implement [`SearchTree`] so call sites can swap one for another.
//!
//! # Examples
//!
//! ```
//! use search_trees::{avl, bst, rbtree, Order, SearchTree};
//!
//! fn fill<S: SearchTree<i32>>(mut tree: S) -> Vec<i32> {
//!     for x in [5, 3, 8, 1, 4] {
//!         tree.insert(x);
//!     }
//!     tree.delete(&3);
//!     tree.traverse(Order::InOrder).copied().collect()
//! }
//!
//! assert_eq!(fill(bst::Tree::new()), [1, 4, 5, 8]);
//! assert_eq!(fill(avl::Tree::new()), [1, 4, 5, 8]);
//! assert_eq!(fill(rbtree::Tree::new()), [1, 4, 5, 8]);
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

use std::cmp::Ordering;
use std::fmt;

pub mod avl;
pub mod bst;
mod error;
pub mod random;
pub mod rbtree;
pub mod trace;
mod traverse;

pub use error::{Error, InvariantViolation};
pub use trace::{LogTrace, NoTrace, TraceEvent, TraceSink};
pub use traverse::{Order, Traverse};

/// Which child of a node a step, splice or rotation refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards smaller values.
    Left,
    /// Towards larger values.
    Right,
}

impl Direction {
    /// The mirror image of this direction.
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// A read-only view of one node, shared by every tree in this crate. Rendering and reporting code
/// only needs the stored value and the two children.
pub trait NodeRef<'a>: Copy {
    /// The type of the stored key.
    type Value: 'a;

    /// The key stored in this node.
    fn value(self) -> &'a Self::Value;

    /// The root of the left subtree, if any.
    fn left(self) -> Option<Self>;

    /// The root of the right subtree, if any.
    fn right(self) -> Option<Self>;

    /// The child on the given side.
    fn child(self, direction: Direction) -> Option<Self> {
        match direction {
            Direction::Left => self.left(),
            Direction::Right => self.right(),
        }
    }
}

/// The contract shared by all trees in this crate: an ordered set of unique keys.
///
/// Inserting a key that is already present and deleting a key that is absent are both no-ops.
pub trait SearchTree<T: Ord> {
    /// The handle type returned by [`SearchTree::root`].
    type Node<'a>: NodeRef<'a, Value = T>
    where
        Self: 'a,
        T: 'a;

    /// Adds `value` to the set. Returns `false` (and leaves the tree untouched) if it was already
    /// present.
    fn insert(&mut self, value: T) -> bool;

    /// Removes `value` from the set. Returns `false` (and leaves the tree untouched) if it wasn't
    /// present.
    fn delete(&mut self, value: &T) -> bool;

    /// The root node, or `None` for an empty tree.
    fn root(&self) -> Option<Self::Node<'_>>;

    /// How many keys are stored.
    fn len(&self) -> usize;

    /// Removes every key.
    fn clear(&mut self);

    /// Whether no keys are stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `value` is stored in the tree.
    fn contains(&self, value: &T) -> bool {
        let mut current = self.root();
        while let Some(node) = current {
            current = match value.cmp(node.value()) {
                Ordering::Less => node.left(),
                Ordering::Equal => return true,
                Ordering::Greater => node.right(),
            };
        }
        false
    }

    /// The number of nodes on the longest root-to-leaf path. An empty tree has height 0.
    fn height(&self) -> usize {
        traverse::height(self.root())
    }

    /// Visits every stored key in the given order. Each call starts a fresh traversal.
    fn traverse(&self, order: Order) -> Traverse<'_, Self::Node<'_>> {
        Traverse::new(self.root(), order)
    }

    /// Visits every stored key in ascending order.
    fn iter(&self) -> Traverse<'_, Self::Node<'_>> {
        self.traverse(Order::InOrder)
    }
}
