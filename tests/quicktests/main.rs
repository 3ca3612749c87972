//! Property tests that drive all three trees through the shared `SearchTree` contract.

mod properties;
mod scenarios;

use quickcheck::{Arbitrary, Gen};
use search_trees::{avl, bst, rbtree, InvariantViolation, SearchTree};

/// An enum for the various kinds of "things" to do to
/// search trees in a quicktest.
///
/// The crate's own `test::quick::Op` is `#[cfg(test)]` and private, so integration tests keep
/// their own copy without the `Traverse` step.
#[derive(Copy, Clone, Debug)]
pub enum Op<T> {
    /// Insert the value into the data structure
    Insert(T),
    /// Delete the value from the data structure
    Delete(T),
}

impl<T: Arbitrary> Arbitrary for Op<T> {
    fn arbitrary(g: &mut Gen) -> Self {
        if bool::arbitrary(g) {
            Op::Insert(T::arbitrary(g))
        } else {
            Op::Delete(T::arbitrary(g))
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            Op::Insert(x) => Box::new(x.shrink().map(Op::Insert)),
            Op::Delete(x) => Box::new(x.shrink().map(Op::Delete)),
        }
    }
}

/// A tree whose structural rules can be checked from the outside.
pub trait Checked<T: Ord>: SearchTree<T> + Default {
    /// Runs the tree's own invariant checks.
    fn check(&self) -> Result<(), InvariantViolation>;
}

impl<T: Ord> Checked<T> for bst::Tree<T> {
    fn check(&self) -> Result<(), InvariantViolation> {
        self.check_invariants()
    }
}

impl<T: Ord> Checked<T> for avl::Tree<T> {
    fn check(&self) -> Result<(), InvariantViolation> {
        self.check_invariants()
    }
}

impl<T: Ord> Checked<T> for rbtree::Tree<T> {
    fn check(&self) -> Result<(), InvariantViolation> {
        self.check_invariants()
    }
}
