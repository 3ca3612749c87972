use thiserror::Error;

/// Errors from the helpers in [`crate::random`]. Tree operations themselves never fail: inserting
/// a duplicate or deleting a missing value is simply a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A value was requested from a tree with no nodes.
    #[error("the tree is empty")]
    EmptyTree,
    /// The lower bound of a range was greater than its upper bound.
    #[error("the lower bound must be less than or equal to the upper bound")]
    InvalidRange,
}

/// A broken structural rule, as reported by the trees' `check_invariants` methods. Seeing one of
/// these means there is a bug in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// An in-order traversal wasn't strictly increasing.
    #[error("in-order traversal is not strictly increasing at position {position}")]
    OutOfOrder {
        /// Index in the in-order sequence of the first value not greater than its predecessor.
        position: usize,
    },
    /// The tree's element count disagrees with the number of reachable nodes.
    #[error("tree reports {reported} values but {reachable} are reachable")]
    LengthMismatch {
        /// What `len` returned.
        reported: usize,
        /// How many nodes a traversal visited.
        reachable: usize,
    },
    /// An AVL node's cached height is stale.
    #[error("cached height {cached} does not match the computed height {computed}")]
    StaleHeight {
        /// The height stored on the node.
        cached: usize,
        /// `1 + max(left height, right height)`.
        computed: usize,
    },
    /// An AVL node's subtrees differ in height by more than one.
    #[error("balance factor {balance} is outside [-1, 1]")]
    Unbalanced {
        /// Left height minus right height.
        balance: isize,
    },
    /// A Red-Black root is red.
    #[error("the root is red")]
    RedRoot,
    /// A red Red-Black node has a red child.
    #[error("a red node has a red child")]
    RedRed,
    /// Two paths from the same Red-Black node to absent children pass through different numbers
    /// of black nodes.
    #[error("black heights differ: {left} on the left, {right} on the right")]
    BlackHeight {
        /// Black height of the left subtree.
        left: usize,
        /// Black height of the right subtree.
        right: usize,
    },
    /// A Red-Black node's parent link disagrees with its parent's child links.
    #[error("a parent link does not match the child links")]
    BrokenParentLink,
}
