//! Test that inserts keep the tree sorted and balanced as it grows.

use crate::testing::{assert_valid, in_order, root_keys, shuffled, tree_with_keys};

#[test]
fn test_insert_into_empty_tree() {
    let tree = tree_with_keys(2, [10]);

    assert_eq!(tree.len(), 1);
    assert_eq!(tree.height(), 1);
    assert_eq!(root_keys(&tree), vec![10]);
    assert_valid(&tree);
}

#[test]
fn test_insert_causing_root_split() {
    let tree = tree_with_keys(3, (1..=6).map(|k| k * 10));

    assert_eq!(root_keys(&tree), vec![30]);
    assert_eq!(tree.root().map(|r| r.children().len()), Some(2));
    assert_eq!(in_order(&tree), vec![10, 20, 30, 40, 50, 60]);
    assert_valid(&tree);
}

#[test]
fn test_insert_seventeen_keys_minimum_degree() {
    let keys = [10, 20, 30, 40, 50, 60, 5, 15, 25, 35, 45, 55, 65, 75, 85, 95, 105];
    let tree = tree_with_keys(2, keys);

    let mut expected = keys.to_vec();
    expected.sort_unstable();

    assert!(tree.height() > 1);
    assert_eq!(tree.len(), 17);
    assert_eq!(in_order(&tree), expected);
    assert_valid(&tree);
}

#[test]
fn test_insert_sequential_ascending() {
    let tree = tree_with_keys(2, 1..=100);

    assert_eq!(in_order(&tree), (1..=100).collect::<Vec<_>>());
    assert_valid(&tree);
}

#[test]
fn test_insert_sequential_descending() {
    let tree = tree_with_keys(2, (1..=100).rev());

    assert_eq!(in_order(&tree), (1..=100).collect::<Vec<_>>());
    assert_valid(&tree);
}

#[test]
fn test_insert_negative_and_mixed_keys() {
    let tree = tree_with_keys(3, [-5, 10, -20, 0, 15, -1, 7, -100, 100]);

    assert_eq!(in_order(&tree), vec![-100, -20, -5, -1, 0, 7, 10, 15, 100]);
    assert_eq!(tree.get(&-20), Some(&-20));
    assert_valid(&tree);
}

#[test]
fn test_insert_extreme_keys() {
    let tree = tree_with_keys(2, [i64::MAX, i64::MIN, 0, 1_000_000, -1_000_000]);

    assert_eq!(
        in_order(&tree),
        vec![i64::MIN, -1_000_000, 0, 1_000_000, i64::MAX]
    );
    assert_valid(&tree);
}

#[test]
fn test_insert_random_order_across_degrees() {
    for degree in [2, 3, 4, 5, 10] {
        let mut tree = tree_with_keys(degree, []);
        for key in shuffled(500, 17) {
            tree.insert(key, key);
            assert_valid(&tree);
        }

        assert_eq!(in_order(&tree), (0..500).collect::<Vec<_>>());
        for key in 0..500 {
            assert_eq!(tree.get(&key), Some(&key), "degree {degree}, key {key}");
        }
    }
}

#[test]
fn test_larger_degree_gives_shorter_tree() {
    let narrow = tree_with_keys(2, 0..1_000);
    let wide = tree_with_keys(10, 0..1_000);

    assert!(wide.height() < narrow.height());
    assert!(wide.node_count() < narrow.node_count());
}

#[test]
fn test_get_missing_keys() {
    let tree = tree_with_keys(3, (0..50).map(|k| k * 2));

    for key in (0..50).map(|k| k * 2 + 1) {
        assert_eq!(tree.get(&key), None);
    }
    assert_eq!(tree.get(&-1), None);
    assert_eq!(tree.get(&1_000), None);
}
