//! Test deletion of keys held in internal nodes.

use crate::testing::{assert_valid, in_order, root_keys, tree_with_keys};

#[test]
fn test_delete_root_separator() {
    let mut tree = tree_with_keys(3, (1..=10).map(|k| k * 10));
    let separator = root_keys(&tree)[0];
    let before = in_order(&tree);

    assert_eq!(tree.remove(&separator), Some(separator));

    let expected: Vec<i64> = before.into_iter().filter(|&k| k != separator).collect();
    assert_eq!(in_order(&tree), expected);
    assert!(!tree.contains_key(&separator));
    assert_valid(&tree);
}

#[test]
fn test_delete_internal_key_in_deep_tree() {
    let mut tree = tree_with_keys(2, 1..=100);
    assert!(tree.height() >= 3);

    // Walk one level down to a key that lives in a non-root internal node.
    let internal_key = tree
        .root()
        .and_then(|root| root.children().first())
        .and_then(|child| child.entries().first())
        .map(|entry| entry.key)
        .expect("deep tree has internal children");

    assert_eq!(tree.remove(&internal_key), Some(internal_key));
    assert_eq!(tree.len(), 99);
    assert_eq!(tree.get(&internal_key), None);
    assert_valid(&tree);
}

#[test]
fn test_delete_every_separator_repeatedly() {
    let mut tree = tree_with_keys(3, 0..300);

    while tree.height() > 1 {
        let separator = root_keys(&tree)[0];
        assert_eq!(tree.remove(&separator), Some(separator));
        assert_valid(&tree);
    }

    assert!(!tree.is_empty());
}

#[test]
fn test_delete_internal_keeps_values_attached() {
    let mut tree = crate::btree::BTree::new(2).expect("valid degree");
    for key in 0..50_i64 {
        tree.insert(key, key * 7);
    }
    let separator = tree
        .root()
        .and_then(|root| root.entries().first())
        .map(|entry| entry.key)
        .expect("non-empty tree");

    assert_eq!(tree.remove(&separator), Some(separator * 7));
    for key in (0..50).filter(|&k| k != separator) {
        assert_eq!(tree.get(&key), Some(&(key * 7)));
    }
}
