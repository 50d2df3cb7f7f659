//! Test long runs of deletions in fixed orders.

use crate::testing::{assert_valid, in_order, shuffled, tree_with_keys};

#[test]
fn test_delete_first_half_degree_three() {
    let mut tree = tree_with_keys(3, 1..=20);

    for key in 1..=10 {
        assert_eq!(tree.remove(&key), Some(key));
        assert_valid(&tree);
    }

    assert_eq!(in_order(&tree), (11..=20).collect::<Vec<_>>());
}

#[test]
fn test_delete_sequential() {
    let mut tree = tree_with_keys(2, 1..=100);

    for key in 1..=100 {
        tree.remove(&key);
        assert_valid(&tree);
        assert_eq!(tree.len(), usize::try_from(100 - key).expect("small count"));
    }

    assert!(tree.is_empty());
}

#[test]
fn test_delete_reverse_sequential() {
    let mut tree = tree_with_keys(2, 1..=100);

    for key in (1..=100).rev() {
        tree.remove(&key);
        assert_valid(&tree);
    }

    assert!(tree.is_empty());
}

#[test]
fn test_delete_across_degrees() {
    for degree in [2, 3, 4, 5, 10] {
        let mut tree = tree_with_keys(degree, 1..=200);

        for key in (1..=200).filter(|k| k % 2 == 0) {
            assert_eq!(tree.remove(&key), Some(key), "degree {degree}");
            assert_valid(&tree);
        }

        let odd: Vec<i64> = (1..=200).filter(|k| k % 2 == 1).collect();
        assert_eq!(in_order(&tree), odd, "degree {degree}");
    }
}

#[test]
fn test_delete_all_keys() {
    let keys = shuffled(64, 5);
    let mut tree = tree_with_keys(3, keys.iter().copied());

    for key in &keys {
        assert_eq!(tree.remove(key), Some(*key));
    }

    assert!(tree.is_empty());
    assert_eq!(tree.node_count(), 0);
    assert_valid(&tree);
}

#[test]
fn test_delete_mixed_pattern() {
    let inserted = [
        5, 15, 25, 35, 45, 55, 65, 75, 85, 95, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100,
    ];
    let mut tree = tree_with_keys(3, inserted);

    for key in [50, 25, 75, 10, 90, 35, 65] {
        assert_eq!(tree.remove(&key), Some(key));
        assert!(!tree.contains_key(&key));
        assert_valid(&tree);
    }

    assert_eq!(
        in_order(&tree),
        vec![5, 15, 20, 30, 40, 45, 55, 60, 70, 80, 85, 95, 100]
    );
}

#[test]
fn test_delete_twice_is_noop() {
    let mut tree = tree_with_keys(2, 0..30);

    assert_eq!(tree.remove(&12), Some(12));
    let after_first = tree.clone();
    assert_eq!(tree.remove(&12), None);

    assert_eq!(tree, after_first);
}
