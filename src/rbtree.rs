//! A Red-Black tree. Every node is colored red or black and the tree keeps these rules:
//!
//! 1. The root is black.
//! 2. A red node never has a red child.
//! 3. Every path from a node down to an absent child passes through the same number of black
//!    nodes (the node's "black height").
//!
//! Together they keep the longest root-to-leaf path at most twice as long as the shortest one.
//!
//! The repair loops after insert and delete walk back up the tree, so every node knows its parent.
//! Nodes live in one `Vec` and refer to each other by index. The upward link is just another
//! index, so there's no ownership cycle to worry about.
//!
//! # Examples
//!
//! ```
//! use search_trees::rbtree::{Color, Tree};
//! use search_trees::SearchTree;
//!
//! let mut tree: Tree<_> = (1..=10).collect();
//! tree.check_invariants().unwrap();
//!
//! let root = tree.root().unwrap();
//! assert_eq!(root.color(), Color::Black);
//! assert!(root.parent().is_none());
//!
//! tree.delete(&4);
//! tree.check_invariants().unwrap();
//! assert!(!tree.contains(&4));
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::trace::{DeleteCase, InsertCase, NoTrace, TraceEvent, TraceSink};
use crate::{traverse, Direction, InvariantViolation, NodeRef, SearchTree};

/// The color of a Red-Black node. Absent children count as black.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// Adds nothing to the black height. Never the parent of another red node.
    Red,
    /// Counts towards the black height.
    Black,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Red => f.write_str("red"),
            Self::Black => f.write_str("black"),
        }
    }
}

/// Index of a node in the arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct NodeId(usize);

#[derive(Clone, Debug)]
struct RbNode<T> {
    value: T,
    color: Color,
    parent: Option<NodeId>,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl<T> RbNode<T> {
    fn child(&self, direction: Direction) -> Option<NodeId> {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    fn child_mut(&mut self, direction: Direction) -> &mut Option<NodeId> {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }
}

/// A borrowed view of one node of a [`Tree`].
pub struct NodeHandle<'a, T> {
    nodes: &'a [RbNode<T>],
    id: NodeId,
}

impl<T> Clone for NodeHandle<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeHandle<'_, T> {}

impl<'a, T> NodeHandle<'a, T> {
    fn node(self) -> &'a RbNode<T> {
        &self.nodes[self.id.0]
    }

    fn to(self, id: Option<NodeId>) -> Option<Self> {
        id.map(|id| Self { id, ..self })
    }

    /// The value stored in this node.
    pub fn value(self) -> &'a T {
        &self.node().value
    }

    /// The root of the left subtree.
    pub fn left(self) -> Option<Self> {
        self.to(self.node().left)
    }

    /// The root of the right subtree.
    pub fn right(self) -> Option<Self> {
        self.to(self.node().right)
    }

    /// The node above this one, or `None` for the root.
    pub fn parent(self) -> Option<Self> {
        self.to(self.node().parent)
    }

    /// This node's color.
    pub fn color(self) -> Color {
        self.node().color
    }

    /// Shorthand for `self.color() == Color::Red`.
    pub fn is_red(self) -> bool {
        self.color() == Color::Red
    }
}

impl<T: fmt::Debug> fmt::Debug for NodeHandle<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("value", self.value())
            .field("color", &self.color())
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}

impl<'a, T> NodeRef<'a> for NodeHandle<'a, T> {
    type Value = T;

    fn value(self) -> &'a T {
        NodeHandle::value(self)
    }

    fn left(self) -> Option<Self> {
        NodeHandle::left(self)
    }

    fn right(self) -> Option<Self> {
        NodeHandle::right(self)
    }
}

/// A Red-Black tree holding a set of unique values. Structural decisions are reported to the sink
/// `S`.
#[derive(Clone)]
pub struct Tree<T, S = NoTrace> {
    nodes: Vec<RbNode<T>>,
    root: Option<NodeId>,
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
            .field("len", &self.len())
            .field("root", &self.root())
            .finish()
    }
}

impl<T, S> Tree<T, S> {
    /// Generates a new, empty `Tree` that reports to `sink`.
    pub fn with_sink(sink: S) -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
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
    pub fn root(&self) -> Option<NodeHandle<'_, T>> {
        self.root.map(|id| NodeHandle {
            nodes: &self.nodes,
            id,
        })
    }

    /// How many values are stored.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no values.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Confirms the search order, the three coloring rules, and that every parent link matches
    /// the child links.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation>
    where
        T: Ord,
    {
        if let Some(root) = self.root {
            let node = &self.nodes[root.0];
            if node.parent.is_some() {
                return Err(InvariantViolation::BrokenParentLink);
            }
            if node.color == Color::Red {
                return Err(InvariantViolation::RedRoot);
            }
            self.check_subtree(root)?;
        }
        traverse::check_order(self.root(), self.len())
    }

    /// Returns the black height of the subtree at `id`, counting the absent children below it.
    fn check_subtree(&self, id: NodeId) -> Result<usize, InvariantViolation> {
        let node = &self.nodes[id.0];
        let mut heights = [1; 2];
        for (height, child) in heights.iter_mut().zip([node.left, node.right]) {
            let Some(child) = child else { continue };
            let below = &self.nodes[child.0];
            if below.parent != Some(id) {
                return Err(InvariantViolation::BrokenParentLink);
            }
            if node.color == Color::Red && below.color == Color::Red {
                return Err(InvariantViolation::RedRed);
            }
            *height = self.check_subtree(child)?;
        }

        let [left, right] = heights;
        if left != right {
            return Err(InvariantViolation::BlackHeight { left, right });
        }
        Ok(left + usize::from(node.color == Color::Black))
    }

    fn is_red(&self, id: NodeId) -> bool {
        self.nodes[id.0].color == Color::Red
    }

    /// Absent children are black.
    fn is_red_link(&self, id: Option<NodeId>) -> bool {
        id.is_some_and(|id| self.is_red(id))
    }

    /// Which child of `parent` the node `child` is.
    fn side_of(&self, child: NodeId, parent: NodeId) -> Direction {
        if self.nodes[parent.0].left == Some(child) {
            Direction::Left
        } else {
            Direction::Right
        }
    }

    /// Points whichever slot held `old` (a child of `parent`, or the root) at `new`.
    fn replace_child(&mut self, parent: Option<NodeId>, old: NodeId, new: Option<NodeId>) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let side = self.side_of(old, parent);
                *self.nodes[parent.0].child_mut(side) = new;
            }
        }
        if let Some(new) = new {
            self.nodes[new.0].parent = parent;
        }
    }

    /// The node holding the largest value in the subtree at `id`.
    fn max_from(&self, mut id: NodeId) -> NodeId {
        while let Some(right) = self.nodes[id.0].right {
            id = right;
        }
        id
    }

    fn swap_values(&mut self, a: NodeId, b: NodeId) {
        let (low, high) = (a.0.min(b.0), a.0.max(b.0));
        let (head, tail) = self.nodes.split_at_mut(high);
        std::mem::swap(&mut head[low].value, &mut tail[0].value);
    }

    /// Removes the already unlinked node `id` from the arena and returns its value. The last node
    /// in the arena moves into the freed slot, so everything pointing at it is redirected.
    fn release(&mut self, id: NodeId) -> T {
        let last = NodeId(self.nodes.len() - 1);
        if id != last {
            let moved = &self.nodes[last.0];
            let (parent, left, right) = (moved.parent, moved.left, moved.right);
            match parent {
                None => self.root = Some(id),
                Some(parent) => {
                    let side = self.side_of(last, parent);
                    *self.nodes[parent.0].child_mut(side) = Some(id);
                }
            }
            for child in [left, right].into_iter().flatten() {
                self.nodes[child.0].parent = Some(id);
            }
        }
        self.nodes.swap_remove(id.0).value
    }
}

impl<T: Ord, S: TraceSink<T>> Tree<T, S> {
    /// Adds `value` as a red leaf, then recolors and rotates on the way up until no red node has
    /// a red parent. Returns `false` without changing anything if `value` is already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::rbtree::{Color, Tree};
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(10);
    /// tree.insert(5);
    /// tree.insert(1);
    ///
    /// // 1 and 5 were both red with no uncle, so 10 was rotated down.
    /// let root = tree.root().unwrap();
    /// assert_eq!(*root.value(), 5);
    /// assert_eq!(root.color(), Color::Black);
    /// assert!(root.left().unwrap().is_red());
    /// assert!(root.right().unwrap().is_red());
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let mut parent = None;
        let mut side = Direction::Left;
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.nodes[id.0];
            side = match value.cmp(&node.value) {
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
                direction: side,
            });
            parent = Some(id);
            current = node.child(side);
        }

        self.sink.record(TraceEvent::Inserted { value: &value });
        let id = NodeId(self.nodes.len());
        self.nodes.push(RbNode {
            value,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        });
        match parent {
            None => self.root = Some(id),
            Some(parent) => *self.nodes[parent.0].child_mut(side) = Some(id),
        }

        self.insert_fixup(id);
        self.debug_check_root();
        true
    }

    /// Removes `value` from the tree, then repairs any black-height deficit on the way up.
    /// Returns `false` without changing anything if `value` isn't present.
    ///
    /// A node with two children takes the largest value of its left subtree, and the node that
    /// held that value is removed instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::rbtree::Tree;
    ///
    /// let mut tree: Tree<_> = [2, 1, 3].into_iter().collect();
    /// assert!(tree.delete(&2));
    ///
    /// // 1 was the largest value to the left of 2.
    /// assert_eq!(tree.root().map(|n| *n.value()), Some(1));
    /// assert!(!tree.delete(&2));
    /// tree.check_invariants().unwrap();
    /// ```
    pub fn delete(&mut self, value: &T) -> bool {
        let Some(mut target) = self.find(value) else {
            return false;
        };

        if let (Some(left), Some(_)) = (self.nodes[target.0].left, self.nodes[target.0].right) {
            let predecessor = self.max_from(left);
            self.sink.record(TraceEvent::ReplacedWithPredecessor {
                target: &self.nodes[target.0].value,
                predecessor: &self.nodes[predecessor.0].value,
            });
            // The doomed value moves down into the predecessor's node, which has no right child.
            self.swap_values(target, predecessor);
            target = predecessor;
        }

        let node = &self.nodes[target.0];
        let (parent, color) = (node.parent, node.color);
        let child = node.left.or(node.right);
        self.sink.record(TraceEvent::Spliced {
            removed: &node.value,
            child: child.map(|c| &self.nodes[c.0].value),
        });
        self.replace_child(parent, target, child);

        let at = parent.map(|p| &self.nodes[p.0].value);
        match (color, child) {
            (Color::Red, _) => self.sink.record(TraceEvent::DeleteFixup {
                parent: at,
                case: DeleteCase::RedNode,
            }),
            (Color::Black, Some(child)) if self.is_red(child) => {
                self.sink.record(TraceEvent::DeleteFixup {
                    parent: at,
                    case: DeleteCase::RedChild,
                });
                self.paint(child, Color::Black);
            }
            (Color::Black, _) => self.delete_fixup(child, parent),
        }

        let removed = self.release(target);
        self.sink.record(TraceEvent::Removed { value: &removed });
        self.debug_check_root();
        true
    }

    /// Walks down from the root looking for `value`.
    fn find(&mut self, value: &T) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.nodes[id.0];
            let direction = match value.cmp(&node.value) {
                Ordering::Less => Direction::Left,
                Ordering::Greater => Direction::Right,
                Ordering::Equal => {
                    self.sink.record(TraceEvent::Found { value: &node.value });
                    return Some(id);
                }
            };
            self.sink.record(TraceEvent::Descend {
                value,
                at: &node.value,
                direction,
            });
            current = node.child(direction);
        }

        self.sink.record(TraceEvent::NotFound { value });
        None
    }

    fn insert_fixup(&mut self, mut node: NodeId) {
        // `node` is red on every pass.
        while let Some(mut parent) = self.nodes[node.0].parent.filter(|&p| self.is_red(p)) {
            let grandparent = self.nodes[parent.0]
                .parent
                .expect("a red node is never the root");
            let side = self.side_of(parent, grandparent);

            let uncle = self.nodes[grandparent.0].child(side.opposite());
            if let Some(uncle) = uncle.filter(|&u| self.is_red(u)) {
                self.record_insert_case(node, InsertCase::RedUncle);
                self.paint(parent, Color::Black);
                self.paint(uncle, Color::Black);
                self.paint(grandparent, Color::Red);
                node = grandparent;
                continue;
            }

            if self.side_of(node, parent) != side {
                self.record_insert_case(node, InsertCase::InnerChild);
                self.rotate(parent, side);
                (node, parent) = (parent, node);
            }

            self.record_insert_case(node, InsertCase::OuterChild);
            self.paint(parent, Color::Black);
            self.paint(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
            break;
        }

        if let Some(root) = self.root {
            self.paint(root, Color::Black);
        }
    }

    /// Repairs the missing black node on the path through `node`, a black (or absent) child of
    /// `parent`. Each pass either fixes the deficit or moves it one level up.
    fn delete_fixup(&mut self, mut node: Option<NodeId>, mut parent: Option<NodeId>) {
        while let Some(p) = parent {
            let side = if self.nodes[p.0].left == node {
                Direction::Left
            } else {
                Direction::Right
            };
            let mut sibling = self.sibling(p, side);

            if self.is_red(sibling) {
                self.record_delete_case(p, DeleteCase::RedSibling);
                self.paint(sibling, Color::Black);
                self.paint(p, Color::Red);
                self.rotate(p, side);
                sibling = self.sibling(p, side);
            }

            let near = self.nodes[sibling.0].child(side);
            let far = self.nodes[sibling.0].child(side.opposite());
            if !self.is_red_link(near) && !self.is_red_link(far) {
                self.paint(sibling, Color::Red);
                if self.is_red(p) {
                    self.record_delete_case(p, DeleteCase::RedParent);
                    self.paint(p, Color::Black);
                    return;
                }
                self.record_delete_case(p, DeleteCase::BlackParent);
                node = Some(p);
                parent = self.nodes[p.0].parent;
                continue;
            }

            if !self.is_red_link(far) {
                self.record_delete_case(p, DeleteCase::NearRedNephew);
                if let Some(near) = near {
                    self.paint(near, Color::Black);
                }
                self.paint(sibling, Color::Red);
                self.rotate(sibling, side.opposite());
                sibling = self.sibling(p, side);
            }

            self.record_delete_case(p, DeleteCase::FarRedNephew);
            let color = self.nodes[p.0].color;
            self.paint(sibling, color);
            self.paint(p, Color::Black);
            if let Some(far) = self.nodes[sibling.0].child(side.opposite()) {
                self.paint(far, Color::Black);
            }
            self.rotate(p, side);
            return;
        }

        // The deficit reached the root, where it is shared by every path.
        log::debug!("black-height deficit absorbed at the root");
        if let Some(root) = node {
            self.paint(root, Color::Black);
        }
    }

    /// The child of `parent` opposite `side`. It always exists while `side` is short a black
    /// node, because the other side has a black height of at least one.
    fn sibling(&self, parent: NodeId, side: Direction) -> NodeId {
        self.nodes[parent.0]
            .child(side.opposite())
            .expect("the taller side of a deficit is never empty")
    }

    /// Rotates `pivot` down in `direction`, lifting its child on the opposite side into its
    /// place. Parent links, the grandparent's child slot and the root are all kept in step.
    ///
    /// ## Panics
    ///
    /// When `pivot` has no child opposite `direction`.
    ///
    /// # Diagram
    ///
    /// Rotating left transforms:
    ///
    /// ```text
    ///    pivot                 top
    ///    /   \                /   \
    ///   x    top     ->    pivot   z
    ///        / \           /   \
    ///       y   z         x     y
    /// ```
    fn rotate(&mut self, pivot: NodeId, direction: Direction) {
        self.sink.record(TraceEvent::Rotated {
            pivot: &self.nodes[pivot.0].value,
            direction,
        });

        let lifted = direction.opposite();
        let top = self.nodes[pivot.0]
            .child(lifted)
            .expect("rotation needs a child to lift");

        let inner = self.nodes[top.0].child(direction);
        *self.nodes[pivot.0].child_mut(lifted) = inner;
        if let Some(inner) = inner {
            self.nodes[inner.0].parent = Some(pivot);
        }

        let above = self.nodes[pivot.0].parent;
        self.replace_child(above, pivot, Some(top));
        *self.nodes[top.0].child_mut(direction) = Some(pivot);
        self.nodes[pivot.0].parent = Some(top);
    }

    /// Sets the color of `id`, reporting it only if it actually changed.
    fn paint(&mut self, id: NodeId, color: Color) {
        let node = &mut self.nodes[id.0];
        if node.color != color {
            node.color = color;
            self.sink.record(TraceEvent::Recolored {
                at: &node.value,
                color,
            });
        }
    }

    fn record_insert_case(&mut self, at: NodeId, case: InsertCase) {
        self.sink.record(TraceEvent::InsertFixup {
            at: &self.nodes[at.0].value,
            case,
        });
    }

    fn record_delete_case(&mut self, parent: NodeId, case: DeleteCase) {
        log::debug!("delete fixup: {case:?}");
        self.sink.record(TraceEvent::DeleteFixup {
            parent: Some(&self.nodes[parent.0].value),
            case,
        });
    }

    /// In tests and debug builds, check the parts of the invariants that are cheap to check
    /// after every operation.
    fn debug_check_root(&self) {
        if cfg!(debug_assertions) {
            if let Some(root) = self.root {
                let root = &self.nodes[root.0];
                assert_eq!(root.color, Color::Black);
                assert!(root.parent.is_none());
            } else {
                assert!(self.nodes.is_empty());
            }
        }
    }
}

impl<T: Ord, S: TraceSink<T>> SearchTree<T> for Tree<T, S> {
    type Node<'a> = NodeHandle<'a, T>
    where
        Self: 'a,
        T: 'a;

    fn insert(&mut self, value: T) -> bool {
        Tree::insert(self, value)
    }

    fn delete(&mut self, value: &T) -> bool {
        Tree::delete(self, value)
    }

    fn root(&self) -> Option<NodeHandle<'_, T>> {
        Tree::root(self)
    }

    fn len(&self) -> usize {
        self.nodes.len()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Order;

    type Traced = Tree<i32, Vec<TraceEvent<i32>>>;

    fn colors<S>(tree: &Tree<i32, S>) -> Vec<(i32, Color)> {
        let mut out = Vec::new();
        let mut stack: Vec<_> = tree.root().into_iter().collect();
        while let Some(node) = stack.pop() {
            out.push((*node.value(), node.color()));
            stack.extend(node.right());
            stack.extend(node.left());
        }
        out
    }

    /// The delete repairs recorded since the sink was last cleared.
    fn delete_fixups(tree: &Traced) -> Vec<(Option<i32>, DeleteCase)> {
        tree.sink()
            .iter()
            .filter_map(|e| match e {
                TraceEvent::DeleteFixup { parent, case } => Some((*parent, *case)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn insert_outer_child_rotates() {
        let mut tree = Tree::new();
        tree.extend([10, 5, 1]);

        assert_eq!(
            colors(&tree),
            [(5, Color::Black), (1, Color::Red), (10, Color::Red)]
        );
        tree.check_invariants().unwrap();
    }

    #[test]
    fn insert_red_uncle_recolors() {
        let mut tree: Traced = Tree::with_sink(Vec::new());
        tree.extend([10, 5, 15]);
        tree.sink_mut().clear();

        tree.insert(1);
        assert!(!tree
            .sink()
            .iter()
            .any(|e| matches!(e, TraceEvent::Rotated { .. })));
        assert_eq!(
            colors(&tree),
            [
                (10, Color::Black),
                (5, Color::Black),
                (1, Color::Red),
                (15, Color::Black)
            ]
        );
        tree.check_invariants().unwrap();
    }

    #[test]
    fn insert_inner_child_rotates_twice() {
        let mut tree: Traced = Tree::with_sink(Vec::new());
        tree.extend([10, 5]);
        tree.sink_mut().clear();

        tree.insert(7);
        let repairs: Vec<_> = tree
            .sink()
            .iter()
            .filter(|e| !matches!(e, TraceEvent::Descend { .. } | TraceEvent::Inserted { .. }))
            .cloned()
            .collect();
        assert_eq!(
            repairs,
            [
                TraceEvent::InsertFixup {
                    at: 7,
                    case: InsertCase::InnerChild
                },
                TraceEvent::Rotated {
                    pivot: 5,
                    direction: Direction::Left
                },
                TraceEvent::InsertFixup {
                    at: 5,
                    case: InsertCase::OuterChild
                },
                TraceEvent::Recolored {
                    at: 7,
                    color: Color::Black
                },
                TraceEvent::Recolored {
                    at: 10,
                    color: Color::Red
                },
                TraceEvent::Rotated {
                    pivot: 10,
                    direction: Direction::Right
                },
            ]
        );
        assert_eq!(
            colors(&tree),
            [(7, Color::Black), (5, Color::Red), (10, Color::Red)]
        );
    }

    #[test]
    fn parent_links() {
        let tree: Tree<_> = (1..=7).collect();
        let root = tree.root().unwrap();
        assert!(root.parent().is_none());

        let left = root.left().unwrap();
        assert_eq!(left.parent().map(|n| *n.value()), Some(*root.value()));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn delete_red_leaf() {
        let mut tree: Traced = Tree::with_sink(Vec::new());
        tree.extend([10, 5, 15]);
        tree.sink_mut().clear();

        assert!(tree.delete(&5));
        assert!(tree.sink().contains(&TraceEvent::DeleteFixup {
            parent: Some(10),
            case: DeleteCase::RedNode,
        }));
        tree.check_invariants().unwrap();
    }

    #[test]
    fn delete_black_node_with_red_child() {
        let mut tree: Traced = Tree::with_sink(Vec::new());
        // 10 black; 5 and 15 black after 1 triggers a recolor; 1 red under 5.
        tree.extend([10, 5, 15, 1]);
        tree.sink_mut().clear();

        assert!(tree.delete(&5));
        assert!(tree.sink().contains(&TraceEvent::DeleteFixup {
            parent: Some(10),
            case: DeleteCase::RedChild,
        }));
        assert_eq!(
            colors(&tree),
            [(10, Color::Black), (1, Color::Black), (15, Color::Black)]
        );
        tree.check_invariants().unwrap();
    }

    #[test]
    fn delete_black_leaf_with_black_sibling_and_black_parent() {
        let mut tree: Traced = Tree::with_sink(Vec::new());
        tree.extend([10, 5, 15, 1]);
        tree.delete(&1);
        // Three black nodes now.
        tree.sink_mut().clear();

        assert!(tree.delete(&5));
        assert!(tree.sink().contains(&TraceEvent::DeleteFixup {
            parent: Some(10),
            case: DeleteCase::BlackParent,
        }));
        assert_eq!(colors(&tree), [(10, Color::Black), (15, Color::Red)]);
        tree.check_invariants().unwrap();
    }

    #[test]
    fn delete_far_red_nephew() {
        let mut tree: Traced = Tree::with_sink(Vec::new());
        tree.extend([10, 5, 15, 20]);
        tree.sink_mut().clear();

        assert!(tree.delete(&5));
        assert!(tree.sink().contains(&TraceEvent::DeleteFixup {
            parent: Some(10),
            case: DeleteCase::FarRedNephew,
        }));
        assert_eq!(
            colors(&tree),
            [(15, Color::Black), (10, Color::Black), (20, Color::Black)]
        );
        tree.check_invariants().unwrap();
    }

    #[test]
    fn delete_near_red_nephew() {
        let mut tree: Traced = Tree::with_sink(Vec::new());
        tree.extend([10, 5, 15, 12]);
        tree.sink_mut().clear();

        assert!(tree.delete(&5));
        let cases: Vec<_> = tree
            .sink()
            .iter()
            .filter_map(|e| match e {
                TraceEvent::DeleteFixup { case, .. } => Some(*case),
                _ => None,
            })
            .collect();
        assert_eq!(
            cases,
            [DeleteCase::NearRedNephew, DeleteCase::FarRedNephew]
        );
        assert_eq!(
            colors(&tree),
            [(12, Color::Black), (10, Color::Black), (15, Color::Black)]
        );
        tree.check_invariants().unwrap();
    }

    #[test]
    fn delete_red_sibling() {
        let mut tree: Traced = Tree::with_sink(Vec::new());
        // 2 is black with a red right child 4, whose children 3 and 5 are black.
        tree.extend([2, 1, 3, 4, 5, 6]);
        tree.check_invariants().unwrap();
        assert_eq!(tree.root().map(|n| *n.value()), Some(2));
        assert!(tree.root().unwrap().right().unwrap().is_red());
        tree.sink_mut().clear();

        assert!(tree.delete(&1));
        // After the rotation 2 is red with two black-leaf children: case 2.
        assert_eq!(
            delete_fixups(&tree),
            [
                (Some(2), DeleteCase::RedSibling),
                (Some(2), DeleteCase::RedParent)
            ]
        );
        assert_eq!(
            colors(&tree),
            [
                (4, Color::Black),
                (2, Color::Black),
                (3, Color::Red),
                (5, Color::Black),
                (6, Color::Red)
            ]
        );
        tree.check_invariants().unwrap();
        assert_eq!(
            tree.iter().copied().collect::<Vec<_>>(),
            [2, 3, 4, 5, 6]
        );
    }

    #[test]
    fn delete_black_leaf_under_red_parent() {
        let mut tree: Traced = Tree::with_sink(Vec::new());
        // 10 black over 5 red and 15 black; 5 has black leaves 1 and 7.
        tree.extend([10, 5, 15, 1, 7, 6]);
        tree.delete(&6);
        assert_eq!(
            colors(&tree),
            [
                (10, Color::Black),
                (5, Color::Red),
                (1, Color::Black),
                (7, Color::Black),
                (15, Color::Black)
            ]
        );
        tree.sink_mut().clear();

        assert!(tree.delete(&1));
        assert_eq!(delete_fixups(&tree), [(Some(5), DeleteCase::RedParent)]);
        assert!(!tree
            .sink()
            .iter()
            .any(|e| matches!(e, TraceEvent::Rotated { .. })));
        assert_eq!(
            colors(&tree),
            [
                (10, Color::Black),
                (5, Color::Black),
                (7, Color::Red),
                (15, Color::Black)
            ]
        );
        tree.check_invariants().unwrap();
    }

    #[test]
    fn delete_two_children_takes_predecessor() {
        let mut tree: Traced = Tree::with_sink(Vec::new());
        tree.extend([5, 3, 8, 1, 4]);
        tree.sink_mut().clear();

        assert!(tree.delete(&3));
        assert!(tree.sink().contains(&TraceEvent::ReplacedWithPredecessor {
            target: 3,
            predecessor: 1,
        }));
        assert_eq!(tree.sink().last(), Some(&TraceEvent::Removed { value: 3 }));
        assert_eq!(
            tree.traverse(Order::PreOrder).copied().collect::<Vec<_>>(),
            [5, 1, 4, 8]
        );
        tree.check_invariants().unwrap();
    }

    #[test]
    fn delete_root_until_empty() {
        let mut tree: Tree<_> = (0..32).collect();
        while let Some(root) = tree.root().map(|n| *n.value()) {
            assert!(tree.delete(&root));
            tree.check_invariants().unwrap();
        }
        assert!(tree.is_empty());
        assert!(!tree.delete(&0));
    }

    #[test]
    fn sorted_input_stays_shallow() {
        let tree: Tree<_> = (0..10_000).collect();
        tree.check_invariants().unwrap();
        // At most 2 lg(n + 1).
        assert!(tree.height() <= 27);
    }
}
