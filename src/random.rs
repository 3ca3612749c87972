//! Helpers for front ends that insert or delete values chosen at random.
//!
//! Every helper takes the random number generator as an argument, so a seeded generator gives
//! repeatable results.
//!
//! # Examples
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use search_trees::{random, rbtree::Tree, SearchTree};
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let mut tree = Tree::new();
//!
//! let value = random::insert_random(&mut tree, 1, 100, &mut rng).unwrap();
//! assert!((1..=100).contains(&value));
//! assert!(tree.contains(&value));
//!
//! assert_eq!(random::delete_random(&mut tree, &mut rng), Ok(value));
//! assert!(tree.is_empty());
//! ```

use rand::distr::uniform::SampleUniform;
use rand::Rng;

use crate::{Error, NodeRef, SearchTree};

/// A uniformly chosen value in `low..=high`.
///
/// # Errors
///
/// [`Error::InvalidRange`] if `low > high`.
pub fn random_in_range<T, R>(low: T, high: T, rng: &mut R) -> Result<T, Error>
where
    T: SampleUniform + PartialOrd,
    R: Rng + ?Sized,
{
    if low > high {
        return Err(Error::InvalidRange);
    }
    Ok(rng.random_range(low..=high))
}

/// Inserts a uniformly chosen value in `low..=high` into `tree` and returns it. If the value was
/// already present the tree is left unchanged.
///
/// # Errors
///
/// [`Error::InvalidRange`] if `low > high`. The tree isn't touched.
pub fn insert_random<T, S, R>(tree: &mut S, low: T, high: T, rng: &mut R) -> Result<T, Error>
where
    T: Ord + Clone + SampleUniform,
    S: SearchTree<T> + ?Sized,
    R: Rng + ?Sized,
{
    let value = random_in_range(low, high, rng)?;
    if !tree.insert(value.clone()) {
        log::debug!("randomly chosen value was already present");
    }
    Ok(value)
}

/// Picks a value already stored in `tree` with a random walk: starting at the root, each step
/// moves left, moves right or stops with equal odds. Moving towards an absent child stops at the
/// current node.
///
/// Values near the root are much more likely than deep ones.
///
/// # Errors
///
/// [`Error::EmptyTree`] if there is nothing to pick.
pub fn random_value<T, S, R>(tree: &S, rng: &mut R) -> Result<T, Error>
where
    T: Ord + Clone,
    S: SearchTree<T> + ?Sized,
    R: Rng + ?Sized,
{
    let mut node = tree.root().ok_or(Error::EmptyTree)?;
    loop {
        let next = match rng.random_range(0..3) {
            0 => node.left(),
            1 => node.right(),
            _ => None,
        };
        match next {
            Some(child) => node = child,
            None => return Ok(node.value().clone()),
        }
    }
}

/// Deletes a value picked by [`random_value`] and returns it.
///
/// # Errors
///
/// [`Error::EmptyTree`] if there is nothing to delete.
pub fn delete_random<T, S, R>(tree: &mut S, rng: &mut R) -> Result<T, Error>
where
    T: Ord + Clone,
    S: SearchTree<T> + ?Sized,
    R: Rng + ?Sized,
{
    let value = random_value(tree, rng)?;
    tree.delete(&value);
    Ok(value)
}
