//! Test that inserting a present key overwrites its value in place.

use crate::btree::BTree;
use crate::testing::{assert_valid, in_order, tree_with_keys};

#[test]
fn test_same_key_five_times_matches_single_insert() {
    let once = tree_with_keys(2, [42]);
    let five = tree_with_keys(2, [42; 5]);

    assert_eq!(five.len(), 1);
    assert_eq!(five, once);
}

#[test]
fn test_reinserting_every_key_keeps_structure() {
    let keys: Vec<i64> = (0..60).map(|k| k * 3).collect();
    let original = tree_with_keys(3, keys.iter().copied());
    let mut tree = original.clone();

    for &key in &keys {
        assert_eq!(tree.insert(key, key), Some(key));
    }

    assert_eq!(tree, original);
    assert_valid(&tree);
}

#[test]
fn test_overwrite_reaches_internal_nodes() {
    let mut tree = tree_with_keys(2, 1..=30);
    let internal: Vec<i64> = tree
        .root()
        .map(|root| root.entries().iter().map(|e| e.key).collect())
        .unwrap_or_default();
    assert!(!internal.is_empty());

    for &key in &internal {
        assert_eq!(tree.insert(key, -key), Some(key));
    }

    for &key in &internal {
        assert_eq!(tree.get(&key), Some(&-key));
    }
    assert_eq!(tree.len(), 30);
    assert_eq!(in_order(&tree), (1..=30).collect::<Vec<_>>());
}

#[test]
fn test_values_follow_keys_through_splits() {
    let mut tree: BTree<i64, String> = BTree::new(2).expect("valid degree");
    for key in 0..200 {
        tree.insert(key, format!("value-{key}"));
    }

    for key in 0..200 {
        assert_eq!(tree.get(&key).map(String::as_str), Some(format!("value-{key}").as_str()));
    }
}

#[test]
fn test_duplicate_in_single_node() {
    let mut tree = tree_with_keys(4, [100, 200, 300]);

    assert_eq!(tree.insert(200, 2), Some(200));

    assert_eq!(tree.len(), 3);
    assert_eq!(tree.height(), 1);
    assert_eq!(tree.get(&200), Some(&2));
}
