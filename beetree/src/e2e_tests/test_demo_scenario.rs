//! Test the seventeen-key build and teardown the demo binary runs.

use crate::testing::{assert_valid, in_order, tree_with_keys};

const DEMO_INSERTS: [i64; 17] = [
    10, 20, 30, 40, 50, 60, 5, 15, 25, 35, 45, 55, 65, 75, 85, 95, 105,
];
const DEMO_DELETES: [i64; 10] = [20, 10, 15, 25, 5, 105, 95, 85, 75, 60];

#[test]
fn test_demo_teardown() {
    let mut tree = tree_with_keys(2, DEMO_INSERTS);
    let mut live: Vec<i64> = DEMO_INSERTS.to_vec();
    live.sort_unstable();

    for key in DEMO_DELETES {
        assert_eq!(tree.remove(&key), Some(key));
        live.retain(|&k| k != key);
        assert_eq!(in_order(&tree), live);
        assert_valid(&tree);
    }

    assert_eq!(in_order(&tree), vec![30, 35, 40, 45, 50, 55, 65]);
}

#[test]
fn test_demo_level_order_covers_every_key() {
    let tree = tree_with_keys(2, DEMO_INSERTS);
    let dump = tree.level_order().to_string();

    assert_eq!(dump.lines().count(), tree.height());
    assert!(dump.starts_with("-1:0:"));

    let mut printed: Vec<i64> = dump
        .split_whitespace()
        .filter_map(|item| item.rsplit(':').next())
        .filter_map(|key| key.parse().ok())
        .collect();
    printed.sort_unstable();
    assert_eq!(printed, in_order(&tree));
}
