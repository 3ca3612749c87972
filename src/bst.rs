//! An unbalanced BST. Nothing is ever rotated, so the shape of the tree depends entirely on the
//! order values arrive in: sorted input produces a tree that is really a linked list. It is the
//! baseline the [`avl`](crate::avl) and [`rbtree`](crate::rbtree) modules improve on.
//!
//! Both insert and delete walk down the tree with a cursor instead of recursing, so even a
//! degenerate tree can't exhaust the call stack.
//!
//! # Examples
//!
//! ```
//! use search_trees::{bst::Tree, SearchTree};
//!
//! let mut tree: Tree<i32> = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(!tree.contains(&1));
//!
//! assert!(tree.insert(1));
//! assert!(tree.contains(&1));
//!
//! // Inserting the same value again changes nothing.
//! assert!(!tree.insert(1));
//! assert_eq!(tree.len(), 1);
//!
//! // Deleting reports whether the value was there.
//! assert!(tree.delete(&1));
//! assert!(!tree.delete(&1));
//! assert!(tree.root().is_none());
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::trace::{NoTrace, TraceEvent, TraceSink};
use crate::{traverse, Direction, InvariantViolation, NodeRef, Order, SearchTree, Traverse};

type Link<T> = Option<Box<Node<T>>>;

/// A `Node` holds one value and up to two children.
pub struct Node<T> {
    value: T,
    left: Link<T>,
    right: Link<T>,
}

/// Shows the node's value and its children's values, not the whole subtree.
impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("value", &self.value)
            .field("left", &self.left().map(|n| &n.value))
            .field("right", &self.right().map(|n| &n.value))
            .finish()
    }
}

impl<T> Node<T> {
    fn new_boxed(value: T) -> Box<Self> {
        Box::new(Self {
            value,
            left: None,
            right: None,
        })
    }

    /// The value stored in this node.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The root of the left subtree, whose values are all smaller than this node's.
    pub fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    /// The root of the right subtree, whose values are all larger than this node's.
    pub fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }

    fn child_mut(&mut self, direction: Direction) -> &mut Link<T> {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }
}

impl<'a, T> NodeRef<'a> for &'a Node<T> {
    type Value = T;

    fn value(self) -> &'a T {
        &self.value
    }

    fn left(self) -> Option<Self> {
        self.left.as_deref()
    }

    fn right(self) -> Option<Self> {
        self.right.as_deref()
    }
}

/// An unbalanced Binary Search Tree holding a set of unique values. Structural decisions are
/// reported to the sink `S`.
pub struct Tree<T, S = NoTrace> {
    root: Link<T>,
    len: usize,
    sink: S,
}

impl<T> Tree<T> {
    /// Generates a new, empty `Tree` that doesn't trace anything.
    pub fn new() -> Self {
        Self::with_sink(NoTrace)
    }
}

impl<T, S: Default> Default for Tree<T, S> {
    fn default() -> Self {
        Self::with_sink(S::default())
    }
}

impl<T, S> Drop for Tree<T, S> {
    fn drop(&mut self) {
        teardown(self.root.take());
    }
}

impl<T: Clone, S: Clone> Clone for Tree<T, S> {
    fn clone(&self) -> Self {
        Self {
            root: self.root().map(copy_subtree),
            len: self.len,
            sink: self.sink.clone(),
        }
    }
}

/// Lists the values in ascending order.
impl<T: fmt::Debug, S> fmt::Debug for Tree<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(Traverse::new(self.root(), Order::InOrder))
            .finish()
    }
}

impl<T, S> Tree<T, S> {
    /// Generates a new, empty `Tree` that reports to `sink`.
    pub fn with_sink(sink: S) -> Self {
        Self {
            root: None,
            len: 0,
            sink,
        }
    }

    /// The sink this tree reports to.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The sink this tree reports to, e.g. to clear collected events between calls.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// The root node, or `None` when the tree is empty.
    pub fn root(&self) -> Option<&Node<T>> {
        self.root.as_deref()
    }

    /// How many values are stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        teardown(self.root.take());
        self.len = 0;
    }
}

impl<T: Ord, S: TraceSink<T>> Tree<T, S> {
    /// Adds `value` as a new leaf at the first empty child slot found by comparison. Returns
    /// `false` without changing anything if `value` is already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::bst::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(2);
    /// tree.insert(1);
    ///
    /// let root = tree.root().unwrap();
    /// assert_eq!(root.value(), &2);
    /// assert_eq!(root.left().map(|n| *n.value()), Some(1));
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            let direction = match value.cmp(&node.value) {
                Ordering::Less => Direction::Left,
                Ordering::Greater => Direction::Right,
                Ordering::Equal => {
                    self.sink.record(TraceEvent::Duplicate { value: &value });
                    return false;
                }
            };
            self.sink.record(TraceEvent::Descend {
                value: &value,
                at: &node.value,
                direction,
            });
            slot = node.child_mut(direction);
        }

        self.sink.record(TraceEvent::Inserted { value: &value });
        *slot = Some(Node::new_boxed(value));
        self.len += 1;
        true
    }

    /// Removes `value` from the tree. Returns `false` without changing anything if it isn't
    /// present.
    ///
    /// A node with at most one child is replaced by that child. A node with two children instead
    /// takes the smallest value of its right subtree, and the node that held that value (which
    /// never has a left child) is spliced out in its place.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::bst::Tree;
    ///
    /// let mut tree: Tree<_> = [2, 1, 3].into_iter().collect();
    /// assert!(tree.delete(&2));
    ///
    /// // 3 was the smallest value to the right of 2.
    /// assert_eq!(tree.root().map(|n| *n.value()), Some(3));
    /// ```
    pub fn delete(&mut self, value: &T) -> bool {
        let mut slot = &mut self.root;
        loop {
            let node = match slot {
                Some(node) if node.value == *value => break,
                Some(node) => node,
                None => {
                    self.sink.record(TraceEvent::NotFound { value });
                    return false;
                }
            };
            let direction = if *value < node.value {
                Direction::Left
            } else {
                Direction::Right
            };
            self.sink.record(TraceEvent::Descend {
                value,
                at: &node.value,
                direction,
            });
            slot = node.child_mut(direction);
        }

        let mut target = slot.take().expect("search stopped at a present node");
        self.sink.record(TraceEvent::Found {
            value: &target.value,
        });

        *slot = if target.left.is_some() && target.right.is_some() {
            let successor = take_min(&mut target.right).expect("two children => right subtree");
            self.sink.record(TraceEvent::ReplacedWithSuccessor {
                target: &target.value,
                successor: &successor,
            });
            let removed = std::mem::replace(&mut target.value, successor);
            self.sink.record(TraceEvent::Removed { value: &removed });
            Some(target)
        } else {
            let child = target.left.take().or_else(|| target.right.take());
            self.sink.record(TraceEvent::Spliced {
                removed: &target.value,
                child: child.as_deref().map(|n| &n.value),
            });
            self.sink.record(TraceEvent::Removed {
                value: &target.value,
            });
            child
        };
        self.len -= 1;
        true
    }

    /// Confirms that an in-order walk is strictly increasing and visits exactly `len` nodes.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        traverse::check_order(self.root(), self.len)
    }
}

/// Unlinks the smallest node under `root` and returns its value. The node's right subtree takes
/// its place.
fn take_min<T>(root: &mut Link<T>) -> Option<T> {
    let mut slot = root;
    while slot.as_ref()?.left.is_some() {
        slot = &mut slot.as_mut()?.left;
    }

    let min = slot.take()?;
    let Node { value, right, .. } = *min;
    *slot = right;
    Some(value)
}

/// Copies a subtree one node at a time, the same way `teardown` walks it.
fn copy_subtree<T: Clone>(root: &Node<T>) -> Box<Node<T>> {
    let mut copy = Node::new_boxed(root.value.clone());
    let mut stack: Vec<(&Node<T>, &mut Node<T>)> = vec![(root, &mut *copy)];
    while let Some((from, into)) = stack.pop() {
        let Node { left, right, .. } = into;
        for (child, slot) in [(from.left(), left), (from.right(), right)] {
            if let Some(child) = child {
                let node = slot.insert(Node::new_boxed(child.value.clone()));
                stack.push((child, &mut **node));
            }
        }
    }
    copy
}

/// Drops a subtree one node at a time. Letting `Box` do it would recurse once per level.
fn teardown<T>(root: Link<T>) {
    let mut stack: Vec<Box<Node<T>>> = root.into_iter().collect();
    while let Some(mut node) = stack.pop() {
        stack.extend(node.left.take());
        stack.extend(node.right.take());
    }
}

impl<T: Ord, S: TraceSink<T>> SearchTree<T> for Tree<T, S> {
    type Node<'a> = &'a Node<T>
    where
        Self: 'a,
        T: 'a;

    fn insert(&mut self, value: T) -> bool {
        Tree::insert(self, value)
    }

    fn delete(&mut self, value: &T) -> bool {
        Tree::delete(self, value)
    }

    fn root(&self) -> Option<&Node<T>> {
        Tree::root(self)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        Tree::clear(self);
    }
}

impl<T: Ord> FromIterator<T> for Tree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T: Ord, S: TraceSink<T>> Extend<T> for Tree<T, S> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}
