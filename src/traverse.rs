//! Depth-first traversals that work over any [`NodeRef`].

use std::fmt;
use std::iter::FusedIterator;

use crate::{InvariantViolation, NodeRef};

/// The order in which a [`Traverse`] yields a node relative to its two subtrees.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Order {
    /// Node, then left subtree, then right subtree.
    PreOrder,
    /// Left subtree, then node, then right subtree. Yields keys in ascending order.
    #[default]
    InOrder,
    /// Left subtree, then right subtree, then node.
    PostOrder,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreOrder => f.write_str("pre-order"),
            Self::InOrder => f.write_str("in-order"),
            Self::PostOrder => f.write_str("post-order"),
        }
    }
}

enum Frame<N> {
    /// Expand this node's subtrees onto the stack.
    Enter(N),
    /// Yield this node's value.
    Visit(N),
}

impl<N: Copy> Clone for Frame<N> {
    fn clone(&self) -> Self {
        match self {
            Self::Enter(n) => Self::Enter(*n),
            Self::Visit(n) => Self::Visit(*n),
        }
    }
}

/// A lazy depth-first traversal over the values of a tree.
///
/// This keeps an explicit stack instead of recursing so a degenerate (list-shaped) tree can be
/// walked without exhausting the call stack. Cloning a `Traverse` gives an independent cursor at
/// the same position.
pub struct Traverse<'a, N: NodeRef<'a>> {
    order: Order,
    stack: Vec<Frame<N>>,
    _tree: std::marker::PhantomData<&'a N::Value>,
}

impl<'a, N: NodeRef<'a>> Traverse<'a, N> {
    /// Starts a traversal at `root` (an empty traversal if `root` is `None`).
    pub fn new(root: Option<N>, order: Order) -> Self {
        Self {
            order,
            stack: root.map(Frame::Enter).into_iter().collect(),
            _tree: std::marker::PhantomData,
        }
    }

    /// The order this traversal was started with.
    pub fn order(&self) -> Order {
        self.order
    }
}

impl<'a, N: NodeRef<'a>> Clone for Traverse<'a, N> {
    fn clone(&self) -> Self {
        Self {
            order: self.order,
            stack: self.stack.clone(),
            _tree: std::marker::PhantomData,
        }
    }
}

impl<'a, N: NodeRef<'a>> fmt::Debug for Traverse<'a, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Traverse")
            .field("order", &self.order)
            .field("pending", &self.stack.len())
            .finish()
    }
}

impl<'a, N: NodeRef<'a>> Iterator for Traverse<'a, N> {
    type Item = &'a N::Value;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = match self.stack.pop()? {
                Frame::Visit(node) => return Some(node.value()),
                Frame::Enter(node) => node,
            };

            // Frames are popped in reverse, so push the last thing to visit first.
            let right = node.right().map(Frame::Enter);
            let left = node.left().map(Frame::Enter);
            match self.order {
                Order::PreOrder => {
                    self.stack.extend(right);
                    self.stack.extend(left);
                    self.stack.push(Frame::Visit(node));
                }
                Order::InOrder => {
                    self.stack.extend(right);
                    self.stack.push(Frame::Visit(node));
                    self.stack.extend(left);
                }
                Order::PostOrder => {
                    self.stack.push(Frame::Visit(node));
                    self.stack.extend(right);
                    self.stack.extend(left);
                }
            }
        }
    }
}

impl<'a, N: NodeRef<'a>> FusedIterator for Traverse<'a, N> {}

/// The number of nodes on the longest path from `root` down to a leaf.
pub(crate) fn height<'a, N: NodeRef<'a>>(root: Option<N>) -> usize {
    let mut tallest = 0;
    let mut stack: Vec<(N, usize)> = root.map(|n| (n, 1)).into_iter().collect();
    while let Some((node, depth)) = stack.pop() {
        tallest = tallest.max(depth);
        stack.extend(node.left().map(|n| (n, depth + 1)));
        stack.extend(node.right().map(|n| (n, depth + 1)));
    }
    tallest
}

/// Checks that an in-order walk from `root` is strictly increasing and visits `len` nodes.
pub(crate) fn check_order<'a, N>(root: Option<N>, len: usize) -> Result<(), InvariantViolation>
where
    N: NodeRef<'a>,
    N::Value: Ord,
{
    let mut previous = None;
    let mut reachable = 0;
    for (position, value) in Traverse::new(root, Order::InOrder).enumerate() {
        if previous.is_some_and(|previous| previous >= value) {
            return Err(InvariantViolation::OutOfOrder { position });
        }
        previous = Some(value);
        reachable += 1;
    }

    if reachable != len {
        return Err(InvariantViolation::LengthMismatch {
            reported: len,
            reachable,
        });
    }
    Ok(())
}
