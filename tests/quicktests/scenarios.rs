use search_trees::rbtree::Color;
use search_trees::{avl, bst, rbtree, LogTrace, Order, SearchTree};

use crate::Checked;

#[test]
fn avl_single_right_rotation() {
    let mut tree = avl::Tree::new();
    for x in [3, 2, 1] {
        tree.insert(x);
    }

    let root = tree.root().unwrap();
    assert_eq!(*root.value(), 2);
    assert_eq!(root.left().map(|n| *n.value()), Some(1));
    assert_eq!(root.right().map(|n| *n.value()), Some(3));
    assert_eq!(root.balance(), 0);
}

#[test]
fn red_black_fixup_after_third_insert() {
    let mut tree = rbtree::Tree::new();
    for x in [10, 5, 1] {
        tree.insert(x);
    }

    tree.check_invariants().unwrap();
    assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 5, 10]);
    assert_eq!(tree.root().unwrap().color(), Color::Black);
}

#[test]
fn bst_two_child_delete() {
    let mut tree: bst::Tree<_> = [5, 3, 7, 2, 4, 6, 8].into_iter().collect();
    assert!(tree.delete(&3));

    let replaced = tree.root().and_then(|n| n.left()).unwrap();
    assert_eq!(*replaced.value(), 4);
    assert_eq!(
        tree.traverse(Order::InOrder).copied().collect::<Vec<_>>(),
        [2, 4, 5, 6, 7, 8]
    );
    tree.check_invariants().unwrap();
}

fn delete_from_empty<S: Checked<i32>>() {
    let mut tree = S::default();
    assert!(!tree.delete(&1));
    assert!(tree.root().is_none());
    assert_eq!(tree.len(), 0);
    tree.check().unwrap();
}

#[test]
fn empty_tree_delete() {
    delete_from_empty::<bst::Tree<i32>>();
    delete_from_empty::<avl::Tree<i32>>();
    delete_from_empty::<rbtree::Tree<i32>>();
}

#[test]
fn log_trace_without_a_logger() {
    // With no logger installed the events are simply dropped.
    let mut tree: rbtree::Tree<i32, LogTrace> = rbtree::Tree::with_sink(LogTrace);
    tree.extend(0..100);
    for x in (0..100).step_by(3) {
        assert!(tree.delete(&x));
    }
    tree.check_invariants().unwrap();
    assert_eq!(tree.len(), 66);
}

#[test]
fn traversals_agree_across_trees() {
    let values = [50, 30, 70, 20, 40, 60, 80];
    let bst: bst::Tree<_> = values.into_iter().collect();
    let avl: avl::Tree<_> = values.into_iter().collect();
    let rb: rbtree::Tree<_> = values.into_iter().collect();

    // This insertion order never needs a rotation, so all three have the same shape.
    for order in [Order::PreOrder, Order::InOrder, Order::PostOrder] {
        let expected: Vec<_> = bst.traverse(order).collect();
        assert_eq!(avl.traverse(order).collect::<Vec<_>>(), expected, "{order}");
        assert_eq!(rb.traverse(order).collect::<Vec<_>>(), expected, "{order}");
    }
}
