//! A self-balancing BST (specifically, an AVL tree). Every node caches the height of its subtree,
//! and whenever the heights of a node's two subtrees differ by more than one the node is rotated
//! back into balance. That keeps the height of the whole tree within `O(lg N)`.
//!
//! Insert and delete are recursive: each call returns the (possibly new) root of the subtree it
//! was given and the caller stores it back into its own child slot. That way rotations never need
//! to know about a node's parent.
//!
//! # Examples
//!
//! ```
//! use search_trees::{avl::Tree, SearchTree};
//!
//! let mut tree: Tree<_> = (1..=7).collect();
//!
//! // Sorted input still produces a perfectly balanced tree.
//! assert_eq!(tree.height(), 3);
//! assert_eq!(tree.root().map(|n| *n.value()), Some(4));
//!
//! tree.delete(&4);
//! assert!(!tree.contains(&4));
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 5, 6, 7]);
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::trace::{Imbalance, NoTrace, TraceEvent, TraceSink};
use crate::{traverse, Direction, InvariantViolation, NodeRef, SearchTree};

type Link<T> = Option<Box<Node<T>>>;

/// A `Node` holds one value, up to two children and the height of the subtree it roots.
#[derive(Clone)]
pub struct Node<T> {
    value: T,
    left: Link<T>,
    right: Link<T>,

    /// How many levels are in the subtree rooted at this node.
    /// A node with no children has a height of 1.
    height: usize,
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("value", &self.value)
            .field("height", &self.height)
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}

impl<T> Node<T> {
    fn new_boxed(value: T) -> Box<Self> {
        Box::new(Self {
            value,
            left: None,
            right: None,
            height: 1,
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

    /// How many levels are in the subtree rooted at this node. A leaf has a height of 1.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The height of the left subtree minus the height of the right subtree. Always within
    /// `-1..=1` between operations.
    pub fn balance(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }

    fn child_mut(&mut self, direction: Direction) -> &mut Link<T> {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    /// Adjusts the height of `self` to be the max of its children's heights + 1.
    fn update_height<S: TraceSink<T>>(&mut self, sink: &mut S) {
        self.height = height(&self.left).max(height(&self.right)) + 1;
        sink.record(TraceEvent::HeightUpdated {
            at: &self.value,
            height: self.height,
        });
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

fn height<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |n| n.height)
}

/// What happened to a subtree during an insert.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Step {
    /// The subtree was empty and is now the new leaf.
    Created,
    /// The value was compared against the subtree root and went down this side.
    Descended(Direction),
    /// The value was already in the subtree.
    Duplicate,
}

/// An AVL tree holding a set of unique values. Structural decisions are reported to the sink
/// `S`.
#[derive(Clone)]
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

impl<T: fmt::Debug, S> fmt::Debug for Tree<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("len", &self.len)
            .field("root", &self.root())
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
        self.root = None;
        self.len = 0;
    }

    /// Confirms the search order, every cached height, and that every balance factor is within
    /// `-1..=1`.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation>
    where
        T: Ord,
    {
        if let Some(root) = self.root() {
            check_node(root)?;
        }
        traverse::check_order(self.root(), self.len)
    }
}

impl<T: Ord, S: TraceSink<T>> Tree<T, S> {
    /// Adds `value` to the tree, rotating at most once on the way back up to restore balance.
    /// Returns `false` without changing anything if `value` is already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(3);
    /// tree.insert(2);
    /// tree.insert(1);
    ///
    /// // The left-left imbalance at 3 was fixed by a right rotation.
    /// let root = tree.root().unwrap();
    /// assert_eq!(root.value(), &2);
    /// assert_eq!(root.left().map(|n| *n.value()), Some(1));
    /// assert_eq!(root.right().map(|n| *n.value()), Some(3));
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let (root, step) = insert(self.root.take(), value, &mut self.sink);
        self.root = Some(root);

        let inserted = step != Step::Duplicate;
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Removes `value` from the tree, rebalancing every node on the path back up to the root.
    /// Returns `false` without changing anything if `value` isn't present.
    ///
    /// A node with two children takes the smallest value of its right subtree.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::avl::Tree;
    ///
    /// let mut tree: Tree<_> = [2, 1, 3, 4].into_iter().collect();
    /// assert!(tree.delete(&1));
    ///
    /// // 2 became right-heavy and was rotated left.
    /// assert_eq!(tree.root().map(|n| *n.value()), Some(3));
    /// assert!(!tree.delete(&1));
    /// ```
    pub fn delete(&mut self, value: &T) -> bool {
        let mut removed = false;
        self.root = delete(self.root.take(), value, &mut self.sink, &mut removed);
        if removed {
            self.len -= 1;
        }
        removed
    }
}

fn insert<T: Ord, S: TraceSink<T>>(link: Link<T>, value: T, sink: &mut S) -> (Box<Node<T>>, Step) {
    let Some(mut node) = link else {
        sink.record(TraceEvent::Inserted { value: &value });
        return (Node::new_boxed(value), Step::Created);
    };

    let direction = match value.cmp(&node.value) {
        Ordering::Less => Direction::Left,
        Ordering::Greater => Direction::Right,
        Ordering::Equal => {
            sink.record(TraceEvent::Duplicate { value: &value });
            return (node, Step::Duplicate);
        }
    };
    sink.record(TraceEvent::Descend {
        value: &value,
        at: &node.value,
        direction,
    });

    let slot = node.child_mut(direction);
    let (child, step) = insert(slot.take(), value, sink);
    *slot = Some(child);
    if step == Step::Duplicate {
        return (node, step);
    }

    node.update_height(sink);
    let balance = node.balance();
    sink.record(TraceEvent::BalanceComputed {
        at: &node.value,
        balance,
    });

    // `step` is how the new value compared against the child it was inserted under, which picks
    // between the single and the double rotation.
    let node = if balance > 1 {
        let case = if step == Step::Descended(Direction::Left) {
            Imbalance::LeftLeft
        } else {
            Imbalance::LeftRight
        };
        restore(node, case, sink)
    } else if balance < -1 {
        let case = if step == Step::Descended(Direction::Right) {
            Imbalance::RightRight
        } else {
            Imbalance::RightLeft
        };
        restore(node, case, sink)
    } else {
        node
    };

    debug_check_balance(&node);
    (node, Step::Descended(direction))
}

fn delete<T: Ord, S: TraceSink<T>>(
    link: Link<T>,
    value: &T,
    sink: &mut S,
    removed: &mut bool,
) -> Link<T> {
    let Some(mut node) = link else {
        sink.record(TraceEvent::NotFound { value });
        return None;
    };

    let direction = match value.cmp(&node.value) {
        Ordering::Less => Some(Direction::Left),
        Ordering::Greater => Some(Direction::Right),
        Ordering::Equal => None,
    };
    match direction {
        Some(direction) => {
            sink.record(TraceEvent::Descend {
                value,
                at: &node.value,
                direction,
            });
            let slot = node.child_mut(direction);
            *slot = delete(slot.take(), value, sink, removed);
            if !*removed {
                return Some(node);
            }
        }
        None => {
            *removed = true;
            sink.record(TraceEvent::Found { value: &node.value });

            let (left, right) = match (node.left.take(), node.right.take()) {
                (Some(left), Some(right)) => (left, right),
                (only, None) | (None, only) => {
                    // AVL balance means `only` is a leaf, so it is already balanced.
                    sink.record(TraceEvent::Spliced {
                        removed: &node.value,
                        child: only.as_deref().map(|n| &n.value),
                    });
                    sink.record(TraceEvent::Removed { value: &node.value });
                    return only;
                }
            };

            let (right, successor) = take_min(right, sink);
            node.left = Some(left);
            node.right = right;
            sink.record(TraceEvent::ReplacedWithSuccessor {
                target: &node.value,
                successor: &successor,
            });
            let old = std::mem::replace(&mut node.value, successor);
            sink.record(TraceEvent::Removed { value: &old });
        }
    }

    Some(rebalance(node, sink))
}

/// Unlinks the smallest node of the subtree rooted at `node`, rebalancing on the way back up.
/// Returns the new subtree and the removed value.
fn take_min<T, S: TraceSink<T>>(mut node: Box<Node<T>>, sink: &mut S) -> (Link<T>, T) {
    match node.left.take() {
        Some(left) => {
            let (left, min) = take_min(left, sink);
            node.left = left;
            (Some(rebalance(node, sink)), min)
        }
        None => {
            let Node { value, right, .. } = *node;
            (right, value)
        }
    }
}

/// Recomputes the height of `node` and rotates if its subtrees now differ in height by more than
/// one. The child's own balance factor picks between the single and the double rotation.
fn rebalance<T, S: TraceSink<T>>(mut node: Box<Node<T>>, sink: &mut S) -> Box<Node<T>> {
    node.update_height(sink);
    let balance = node.balance();
    sink.record(TraceEvent::BalanceComputed {
        at: &node.value,
        balance,
    });

    let node = if balance > 1 {
        let case = match node.left().map_or(0, Node::balance) {
            n if n >= 0 => Imbalance::LeftLeft,
            _ => Imbalance::LeftRight,
        };
        restore(node, case, sink)
    } else if balance < -1 {
        let case = match node.right().map_or(0, Node::balance) {
            n if n <= 0 => Imbalance::RightRight,
            _ => Imbalance::RightLeft,
        };
        restore(node, case, sink)
    } else {
        node
    };

    debug_check_balance(&node);
    node
}

/// Applies the rotation(s) that fix `case` at `node` and returns the new subtree root.
fn restore<T, S: TraceSink<T>>(
    mut node: Box<Node<T>>,
    case: Imbalance,
    sink: &mut S,
) -> Box<Node<T>> {
    sink.record(TraceEvent::Imbalanced {
        at: &node.value,
        case,
    });
    log::debug!("fixing {case:?} imbalance at height {}", node.height);

    match case {
        Imbalance::LeftLeft => rotate(node, Direction::Right, sink),
        Imbalance::RightRight => rotate(node, Direction::Left, sink),
        Imbalance::LeftRight => {
            let left = node.left.take().expect("left-heavy => left child");
            node.left = Some(rotate(left, Direction::Left, sink));
            rotate(node, Direction::Right, sink)
        }
        Imbalance::RightLeft => {
            let right = node.right.take().expect("right-heavy => right child");
            node.right = Some(rotate(right, Direction::Right, sink));
            rotate(node, Direction::Left, sink)
        }
    }
}

/// Rotates `pivot` down in `direction`, lifting its child on the opposite side to become the new
/// subtree root. The lifted node's inner subtree moves across to `pivot`. Heights are fixed
/// bottom-up before returning.
///
/// ## Panics
///
/// When `pivot` has no child opposite `direction`.
///
/// # Diagram
///
/// Rotating right transforms:
///
/// ```text
///      pivot              top
///      /   \             /   \
///    top    z   ->      x   pivot
///    / \                     / \
///   x   y                   y   z
/// ```
fn rotate<T, S: TraceSink<T>>(
    mut pivot: Box<Node<T>>,
    direction: Direction,
    sink: &mut S,
) -> Box<Node<T>> {
    sink.record(TraceEvent::Rotated {
        pivot: &pivot.value,
        direction,
    });

    let lifted = direction.opposite();
    let mut top = pivot
        .child_mut(lifted)
        .take()
        .expect("`restore` saw a taller subtree on the lifted side");
    *pivot.child_mut(lifted) = top.child_mut(direction).take();
    pivot.update_height(sink);

    *top.child_mut(direction) = Some(pivot);
    top.update_height(sink);
    top
}

/// In tests and debug builds, after balancing, assert that we've restored/maintained the AVL
/// invariant.
fn debug_check_balance<T>(node: &Node<T>) {
    if cfg!(debug_assertions) {
        let left_height = height(&node.left);
        let right_height = height(&node.right);
        assert_eq!(node.height, left_height.max(right_height) + 1);
        assert!(left_height.abs_diff(right_height) <= 1);
    }
}

fn check_node<T>(node: &Node<T>) -> Result<usize, InvariantViolation> {
    let left = node.left().map(check_node).transpose()?.unwrap_or(0);
    let right = node.right().map(check_node).transpose()?.unwrap_or(0);

    let computed = left.max(right) + 1;
    if node.height != computed {
        return Err(InvariantViolation::StaleHeight {
            cached: node.height,
            computed,
        });
    }

    let balance = left as isize - right as isize;
    if balance.abs() > 1 {
        return Err(InvariantViolation::Unbalanced { balance });
    }
    Ok(computed)
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

    fn height(&self) -> usize {
        height(&self.root)
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


#[cfg(test)]
mod quicktests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::test::quick::Op;

    /// Applies a set of operations to a tree and a `BTreeSet`.
    /// This way we can ensure that after a random smattering of inserts
    /// and deletes we have the same set of values in both.
    fn do_ops<T>(ops: &[Op<T>], avl: &mut Tree<T>, set: &mut BTreeSet<T>)
    where
        T: Ord + Clone + fmt::Debug,
    {
        for op in ops {
            match op {
                Op::Insert(x) => {
                    assert_eq!(avl.insert(x.clone()), set.insert(x.clone()));
                }
                Op::Delete(x) => {
                    assert_eq!(avl.delete(x), set.remove(x));
                }
                Op::Traverse => {
                    assert!(avl.iter().eq(set.iter()));
                }
            }
            avl.check_invariants().unwrap();
        }
    }

    quickcheck::quickcheck! {
        fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
            let mut tree = Tree::new();
            let mut set = BTreeSet::new();

            do_ops(&ops, &mut tree, &mut set);
            tree.len() == set.len() && set.iter().all(|x| tree.contains(x))
        }
    }

    quickcheck::quickcheck! {
        fn height_is_logarithmic(xs: Vec<u16>) -> bool {
            let tree: Tree<_> = xs.into_iter().collect();
            // An AVL tree with n nodes is at most ~1.44 lg(n + 2) tall.
            let bound = 1.45 * ((tree.len() + 2) as f64).log2();
            tree.height() as f64 <= bound
        }
    }
}
