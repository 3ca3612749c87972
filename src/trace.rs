//! Structural decisions made by the trees, reported to an injectable [`TraceSink`].
//!
//! Every tree is generic over its sink and defaults to [`NoTrace`], which throws events away. To
//! see what a tree is doing, construct it with `with_sink` and one of:
//!
//! - a `Vec<TraceEvent<T>>`, which keeps owned copies of every event (handy for assertions),
//! - [`LogTrace`], which forwards every event to the [`log`] facade at `trace` level,
//! - your own [`TraceSink`] implementation.
//!
//! # Examples
//!
//! ```
//! use search_trees::{avl, Direction, TraceEvent};
//!
//! let mut tree: avl::Tree<i32, Vec<TraceEvent<i32>>> = avl::Tree::with_sink(Vec::new());
//! tree.insert(3);
//! tree.insert(2);
//! tree.insert(1);
//!
//! assert!(tree.sink().contains(&TraceEvent::Rotated {
//!     pivot: 3,
//!     direction: Direction::Right,
//! }));
//!
//! // Callers that want per-call traces clear the sink between calls.
//! tree.sink_mut().clear();
//! tree.insert(2);
//! assert_eq!(*tree.sink(), [TraceEvent::Duplicate { value: 2 }]);
//! ```

use std::fmt;

use crate::rbtree::Color;
use crate::Direction;

/// Where a tree reports its structural decisions. Events borrow from the tree, so sinks that keep
/// them must copy what they need.
pub trait TraceSink<T> {
    /// Accepts one event.
    fn record(&mut self, event: TraceEvent<&T>);
}

/// A sink that discards every event.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NoTrace;

impl<T> TraceSink<T> for NoTrace {
    #[inline]
    fn record(&mut self, _event: TraceEvent<&T>) {}
}

impl<T: Clone> TraceSink<T> for Vec<TraceEvent<T>> {
    fn record(&mut self, event: TraceEvent<&T>) {
        self.push(event.cloned());
    }
}

/// A sink that writes every event to the [`log`] facade at `trace` level under the
/// `search_trees::trace` target.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LogTrace;

impl<T: fmt::Debug> TraceSink<T> for LogTrace {
    fn record(&mut self, event: TraceEvent<&T>) {
        log::trace!(target: "search_trees::trace", "{event}");
    }
}

impl<T, S: TraceSink<T> + ?Sized> TraceSink<T> for &mut S {
    fn record(&mut self, event: TraceEvent<&T>) {
        (**self).record(event);
    }
}

/// Which AVL imbalance shape was found at a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Imbalance {
    /// Left-heavy, and the extra height is on the left child's left. Fixed by one right rotation.
    LeftLeft,
    /// Left-heavy, and the extra height is on the left child's right. Fixed by a left rotation of
    /// the left child followed by a right rotation.
    LeftRight,
    /// Right-heavy, and the extra height is on the right child's right. Fixed by one left
    /// rotation.
    RightRight,
    /// Right-heavy, and the extra height is on the right child's left. Fixed by a right rotation
    /// of the right child followed by a left rotation.
    RightLeft,
}

/// Red-Black insert repair steps. The loop runs while the current node and its parent are both
/// red.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InsertCase {
    /// The uncle is red: recolor and continue from the grandparent.
    RedUncle,
    /// The uncle is black and the node zigzags under its grandparent: rotate the parent to
    /// straighten the chain.
    InnerChild,
    /// The uncle is black and the chain is straight: recolor and rotate the grandparent. Ends the
    /// loop.
    OuterChild,
}

/// Red-Black delete repair steps.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeleteCase {
    /// The removed node was red. No repair needed.
    RedNode,
    /// The removed node was black and its replacement red. Recoloring the replacement black ends
    /// the repair.
    RedChild,
    /// The sibling of the short side is red: rotate it above the parent so the sibling turns
    /// black.
    RedSibling,
    /// Case 1: black sibling with black children under a black parent. The sibling turns red and
    /// the deficit moves up to the parent.
    BlackParent,
    /// Case 2: black sibling with black children under a red parent. Swapping their colors ends
    /// the repair.
    RedParent,
    /// Case 3: black sibling whose far child is black but near child red. A rotation of the
    /// sibling turns this into case 4.
    NearRedNephew,
    /// Case 4: black sibling with a red far child. Recolor and rotate the parent to end the
    /// repair.
    FarRedNephew,
}

/// A single structural decision. Trees emit `TraceEvent<&T>`; owning sinks keep
/// `TraceEvent<T>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TraceEvent<V> {
    /// The search for `value` stepped from the node holding `at` to its child.
    Descend {
        /// The value being searched for.
        value: V,
        /// The node the search stepped away from.
        at: V,
        /// Which child the search moved to.
        direction: Direction,
    },
    /// `value` was already present so nothing was inserted.
    Duplicate {
        /// The rejected value.
        value: V,
    },
    /// A new leaf holding `value` was attached.
    Inserted {
        /// The new value.
        value: V,
    },
    /// `value` wasn't present so nothing was deleted.
    NotFound {
        /// The missing value.
        value: V,
    },
    /// The node holding `value` was located for deletion.
    Found {
        /// The value about to be deleted.
        value: V,
    },
    /// The node holding `removed` had at most one child and was replaced by it.
    Spliced {
        /// The value of the node taken out of the tree.
        removed: V,
        /// The value of the child that took its place, if any.
        child: Option<V>,
    },
    /// A node with two children took the smallest value of its right subtree.
    ReplacedWithSuccessor {
        /// The value being overwritten.
        target: V,
        /// The value copied in.
        successor: V,
    },
    /// A node with two children took the largest value of its left subtree.
    ReplacedWithPredecessor {
        /// The value being overwritten.
        target: V,
        /// The value copied in.
        predecessor: V,
    },
    /// The cached height of the node holding `at` was recomputed.
    HeightUpdated {
        /// The node whose height changed.
        at: V,
        /// Its new height.
        height: usize,
    },
    /// The balance factor (left height minus right height) of the node holding `at`.
    BalanceComputed {
        /// The node that was checked.
        at: V,
        /// Left height minus right height.
        balance: isize,
    },
    /// The node holding `at` violated the AVL balance rule.
    Imbalanced {
        /// The unbalanced node.
        at: V,
        /// The shape of the imbalance, which picks the rotation(s).
        case: Imbalance,
    },
    /// The node holding `pivot` was rotated down in `direction`; its opposite child took its
    /// place.
    Rotated {
        /// The node that moved down.
        pivot: V,
        /// Which way it moved.
        direction: Direction,
    },
    /// The node holding `at` was painted `color`.
    Recolored {
        /// The repainted node.
        at: V,
        /// Its new color.
        color: Color,
    },
    /// A Red-Black insert repair step applied at the node holding `at`.
    InsertFixup {
        /// The red node whose parent is also red.
        at: V,
        /// Which repair was applied.
        case: InsertCase,
    },
    /// A Red-Black delete repair step applied below the node holding `parent`.
    DeleteFixup {
        /// The parent of the short side, or `None` at the root.
        parent: Option<V>,
        /// Which repair was applied.
        case: DeleteCase,
    },
    /// `value` is no longer in the tree.
    Removed {
        /// The deleted value.
        value: V,
    },
}

impl<V> TraceEvent<V> {
    /// Converts the values carried by this event.
    pub fn map<U>(self, mut f: impl FnMut(V) -> U) -> TraceEvent<U> {
        match self {
            Self::Descend {
                value,
                at,
                direction,
            } => TraceEvent::Descend {
                value: f(value),
                at: f(at),
                direction,
            },
            Self::Duplicate { value } => TraceEvent::Duplicate { value: f(value) },
            Self::Inserted { value } => TraceEvent::Inserted { value: f(value) },
            Self::NotFound { value } => TraceEvent::NotFound { value: f(value) },
            Self::Found { value } => TraceEvent::Found { value: f(value) },
            Self::Spliced { removed, child } => TraceEvent::Spliced {
                removed: f(removed),
                child: child.map(f),
            },
            Self::ReplacedWithSuccessor { target, successor } => {
                TraceEvent::ReplacedWithSuccessor {
                    target: f(target),
                    successor: f(successor),
                }
            }
            Self::ReplacedWithPredecessor {
                target,
                predecessor,
            } => TraceEvent::ReplacedWithPredecessor {
                target: f(target),
                predecessor: f(predecessor),
            },
            Self::HeightUpdated { at, height } => TraceEvent::HeightUpdated { at: f(at), height },
            Self::BalanceComputed { at, balance } => {
                TraceEvent::BalanceComputed { at: f(at), balance }
            }
            Self::Imbalanced { at, case } => TraceEvent::Imbalanced { at: f(at), case },
            Self::Rotated { pivot, direction } => TraceEvent::Rotated {
                pivot: f(pivot),
                direction,
            },
            Self::Recolored { at, color } => TraceEvent::Recolored { at: f(at), color },
            Self::InsertFixup { at, case } => TraceEvent::InsertFixup { at: f(at), case },
            Self::DeleteFixup { parent, case } => TraceEvent::DeleteFixup {
                parent: parent.map(f),
                case,
            },
            Self::Removed { value } => TraceEvent::Removed { value: f(value) },
        }
    }
}

impl<V: Clone> TraceEvent<&V> {
    /// Clones the borrowed values into an owned event.
    pub fn cloned(self) -> TraceEvent<V> {
        self.map(V::clone)
    }
}

impl<V: fmt::Debug> fmt::Display for TraceEvent<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Descend {
                value,
                at,
                direction,
            } => {
                let relation = match direction {
                    Direction::Left => "less",
                    Direction::Right => "greater",
                };
                write!(f, "Value {value:?} is {relation} than {at:?}, moving {direction}.")
            }
            Self::Duplicate { value } => write!(f, "Value {value:?} already exists in the tree."),
            Self::Inserted { value } => write!(f, "Inserted {value:?} as a new node."),
            Self::NotFound { value } => write!(f, "Value {value:?} not found, nothing to delete."),
            Self::Found { value } => write!(f, "Found node with value {value:?}."),
            Self::Spliced {
                removed,
                child: Some(child),
            } => write!(f, "Replaced node {removed:?} with its only child {child:?}."),
            Self::Spliced {
                removed,
                child: None,
            } => write!(f, "Removed leaf node {removed:?}."),
            Self::ReplacedWithSuccessor { target, successor } => write!(
                f,
                "Node {target:?} has two children. Replacing it with the smallest value \
                 {successor:?} in its right subtree."
            ),
            Self::ReplacedWithPredecessor {
                target,
                predecessor,
            } => write!(
                f,
                "Node {target:?} has two children. Replacing it with the largest value \
                 {predecessor:?} in its left subtree."
            ),
            Self::HeightUpdated { at, height } => {
                write!(f, "Updated height of node {at:?} to {height}.")
            }
            Self::BalanceComputed { at, balance } => {
                write!(f, "Balance of node {at:?} is {balance}.")
            }
            Self::Imbalanced { at, case } => {
                let case = match case {
                    Imbalance::LeftLeft => "Left-left",
                    Imbalance::LeftRight => "Left-right",
                    Imbalance::RightRight => "Right-right",
                    Imbalance::RightLeft => "Right-left",
                };
                write!(f, "{case} imbalance detected at node {at:?}.")
            }
            Self::Rotated { pivot, direction } => {
                write!(f, "Rotated {direction} around {pivot:?}.")
            }
            Self::Recolored { at, color } => write!(f, "Recolored node {at:?} {color}."),
            Self::InsertFixup { at, case } => {
                let case = match case {
                    InsertCase::RedUncle => "uncle is red, recoloring",
                    InsertCase::InnerChild => "node is an inner child, straightening",
                    InsertCase::OuterChild => "node is an outer child, rotating grandparent",
                };
                write!(f, "Insert fixup at {at:?}: {case}.")
            }
            Self::DeleteFixup { parent, case } => {
                let case = match case {
                    DeleteCase::RedNode => "removed node was red, nothing to repair",
                    DeleteCase::RedChild => "red replacement recolored black",
                    DeleteCase::RedSibling => "sibling is red, rotating it up",
                    DeleteCase::BlackParent => "case 1, pushing the deficit up",
                    DeleteCase::RedParent => "case 2, parent absorbs the deficit",
                    DeleteCase::NearRedNephew => "case 3, rotating the sibling",
                    DeleteCase::FarRedNephew => "case 4, rotating the parent",
                };
                match parent {
                    Some(parent) => write!(f, "Delete fixup under {parent:?}: {case}."),
                    None => write!(f, "Delete fixup at the root: {case}."),
                }
            }
            Self::Removed { value } => write!(f, "Deleted {value:?} from the tree."),
        }
    }
}
