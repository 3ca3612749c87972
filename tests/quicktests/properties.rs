use std::collections::{BTreeSet, HashSet};

use quickcheck_macros::quickcheck;
use search_trees::{avl, bst, rbtree, Order, SearchTree};

use crate::{Checked, Op};

/// Runs a property once per tree type, each as its own quickcheck test.
macro_rules! for_each_tree {
    ($property:ident($($arg:ident: $ty:ty),*) over $t:ty) => {
        mod $property {
            use super::*;

            #[quickcheck]
            fn bst($($arg: $ty),*) -> bool {
                super::$property::<bst::Tree<$t>>($($arg),*)
            }

            #[quickcheck]
            fn avl($($arg: $ty),*) -> bool {
                super::$property::<avl::Tree<$t>>($($arg),*)
            }

            #[quickcheck]
            fn rbtree($($arg: $ty),*) -> bool {
                super::$property::<rbtree::Tree<$t>>($($arg),*)
            }
        }
    };
}

/// The pre-order and in-order sequences, which together pin down the shape of the tree.
fn shape<T: Ord + Clone, S: SearchTree<T>>(tree: &S) -> (Vec<T>, Vec<T>) {
    (
        tree.traverse(Order::PreOrder).cloned().collect(),
        tree.traverse(Order::InOrder).cloned().collect(),
    )
}

/// Applies a set of operations to a tree and a `BTreeSet`.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same set of values in both.
fn matches_set<S: Checked<i8>>(ops: Vec<Op<i8>>) -> bool {
    let mut tree = S::default();
    let mut set = BTreeSet::new();

    for op in ops {
        let agreed = match op {
            Op::Insert(x) => tree.insert(x) == set.insert(x),
            Op::Delete(x) => tree.delete(&x) == set.remove(&x),
        };
        if !agreed || tree.check().is_err() {
            return false;
        }
    }

    tree.len() == set.len() && tree.iter().eq(set.iter())
}
for_each_tree!(matches_set(ops: Vec<Op<i8>>) over i8);

fn in_order_is_sorted<S: Checked<i16>>(xs: Vec<i16>) -> bool {
    let mut tree = S::default();
    for x in &xs {
        tree.insert(*x);
    }

    let expected: BTreeSet<_> = xs.into_iter().collect();
    tree.iter().eq(expected.iter()) && tree.check().is_ok()
}
for_each_tree!(in_order_is_sorted(xs: Vec<i16>) over i16);

fn contains_not<S: Checked<i8>>(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let mut tree = S::default();
    for x in &xs {
        tree.insert(*x);
    }
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    added.iter().all(|x| tree.contains(x)) && nots.all(|x| !tree.contains(x))
}
for_each_tree!(contains_not(xs: Vec<i8>, nots: Vec<i8>) over i8);

fn round_trip<S: Checked<i16>>(xs: Vec<i16>) -> bool {
    let distinct: Vec<_> = xs
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let mut tree = S::default();
    for x in &xs {
        tree.insert(*x);
    }

    // Delete in arrival order rather than sorted order.
    let mut deleted = 0;
    for x in &xs {
        if tree.delete(x) {
            deleted += 1;
        }
        if tree.check().is_err() {
            return false;
        }
    }

    deleted == distinct.len() && tree.root().is_none() && tree.is_empty()
}
for_each_tree!(round_trip(xs: Vec<i16>) over i16);

fn idempotent<S: Checked<i8>>(xs: Vec<i8>, x: i8) -> bool {
    let mut tree = S::default();
    for x in &xs {
        tree.insert(*x);
    }

    tree.insert(x);
    let once = shape(&tree);
    let inserted_again = tree.insert(x);
    if inserted_again || shape(&tree) != once {
        return false;
    }

    tree.delete(&x);
    let once = shape(&tree);
    let deleted_again = tree.delete(&x);
    !deleted_again && shape(&tree) == once
}
for_each_tree!(idempotent(xs: Vec<i8>, x: i8) over i8);

#[quickcheck]
fn balanced_trees_stay_shallow(n: u16) -> bool {
    let n = usize::from(n % 512);
    let avl: avl::Tree<_> = (0..n).collect();
    let rb: rbtree::Tree<_> = (0..n).collect();
    let bst: bst::Tree<_> = (0..n).collect();

    let lg = ((n + 1) as f64).log2();
    bst.height() == n && avl.height() as f64 <= 1.45 * lg + 1.0 && rb.height() as f64 <= 2.0 * lg
}
