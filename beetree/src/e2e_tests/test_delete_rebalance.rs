//! Test the repairs a deletion triggers: borrowing, merging, root collapse.

use crate::testing::{assert_valid, in_order, root_keys, tree_with_keys};

#[test]
fn test_delete_from_empty_tree() {
    let mut tree = tree_with_keys(2, []);

    assert_eq!(tree.remove(&10), None);
    assert!(tree.is_empty());
    assert!(tree.root().is_none());
}

#[test]
fn test_delete_absent_key_leaves_tree_unchanged() {
    let mut tree = tree_with_keys(3, (1..=20).map(|k| k * 5));
    let before = tree.clone();

    assert_eq!(tree.remove(&100), None);
    assert_eq!(tree.remove(&7), None);
    assert_eq!(tree.remove(&-5), None);

    assert_eq!(tree, before);
}

#[test]
fn test_delete_leaf_without_underflow() {
    let mut tree = tree_with_keys(3, (1..=9).map(|k| k * 10));

    assert_eq!(tree.remove(&90), Some(90));

    assert!(!tree.contains_key(&90));
    assert_eq!(tree.len(), 8);
    assert_valid(&tree);
}

#[test]
fn test_delete_borrows_from_left_sibling() {
    // [30] / [5, 10, 15, 20] [40, 50, 60]
    let mut tree = tree_with_keys(3, [10, 20, 30, 40, 50, 60, 5, 15]);

    tree.remove(&60);
    tree.remove(&50);

    // [20] / [5, 10, 15] [30, 40]
    assert_eq!(root_keys(&tree), vec![20]);
    assert_eq!(in_order(&tree), vec![5, 10, 15, 20, 30, 40]);
    assert_eq!(tree.height(), 2);
    assert_valid(&tree);
}

#[test]
fn test_delete_borrows_from_right_sibling() {
    // [30] / [10, 20] [40, 50, 60, 70]
    let mut tree = tree_with_keys(3, (1..=7).map(|k| k * 10));

    tree.remove(&10);
    assert_eq!(root_keys(&tree), vec![40]);
    tree.remove(&20);

    // [50] / [30, 40] [60, 70]
    assert_eq!(root_keys(&tree), vec![50]);
    assert_eq!(in_order(&tree), vec![30, 40, 50, 60, 70]);
    assert_valid(&tree);
}

#[test]
fn test_delete_without_borrowing_keeps_shape() {
    let mut tree = tree_with_keys(3, (1..=7).map(|k| k * 10));

    tree.remove(&70);
    tree.remove(&60);

    assert_eq!(root_keys(&tree), vec![30]);
    assert_eq!(in_order(&tree), vec![10, 20, 30, 40, 50]);
    assert_valid(&tree);
}

#[test]
fn test_delete_merges_and_collapses_root() {
    // [30] / [10, 20] [40, 50, 60]
    let mut tree = tree_with_keys(3, (1..=6).map(|k| k * 10));
    assert_eq!(tree.node_count(), 3);

    tree.remove(&60);
    tree.remove(&50);

    // The last child merged into its left sibling and the root emptied.
    assert_eq!(tree.height(), 1);
    assert_eq!(tree.node_count(), 1);
    assert_eq!(root_keys(&tree), vec![10, 20, 30, 40]);

    tree.remove(&40);
    assert_eq!(in_order(&tree), vec![10, 20, 30]);
    assert_valid(&tree);
}

#[test]
fn test_delete_minimum_degree_merge() {
    // [20] / [10] [30, 40]
    let mut tree = tree_with_keys(2, [10, 20, 30, 40]);
    tree.remove(&40);
    assert_eq!(tree.height(), 2);

    // The emptied leaf's only sibling has no spare key, so they merge.
    assert_eq!(tree.remove(&10), Some(10));

    assert_eq!(tree.height(), 1);
    assert_eq!(root_keys(&tree), vec![20, 30]);
    assert_valid(&tree);
}

#[test]
fn test_delete_within_single_leaf_root() {
    let mut tree = tree_with_keys(3, (1..=5).map(|k| k * 10));

    tree.remove(&10);
    tree.remove(&20);
    tree.remove(&30);

    assert_eq!(tree.height(), 1);
    assert_eq!(in_order(&tree), vec![40, 50]);
    assert_valid(&tree);
}

#[test]
fn test_delete_last_key_empties_tree() {
    let mut tree = tree_with_keys(2, [10]);

    assert_eq!(tree.remove(&10), Some(10));

    assert!(tree.is_empty());
    assert_eq!(tree.height(), 0);
    assert!(tree.root().is_none());

    tree.insert(11, 11);
    assert_eq!(in_order(&tree), vec![11]);
}

#[test]
fn test_height_shrinks_as_tree_drains() {
    let mut tree = tree_with_keys(2, 0..200);
    let mut last_height = tree.height();

    for key in 0..200 {
        tree.remove(&key);
        let height = tree.height();
        assert!(height <= last_height);
        last_height = height;
    }

    assert_eq!(last_height, 0);
}
