//! Timed bulk insert and delete at a wide degree.
//!
//! Both tests are ignored by default. Run them with
//! `cargo test --release -- --ignored throughput --nocapture` to see timings.

use std::time::Instant;

use crate::btree::BTree;
use crate::testing::{assert_valid, shuffled};

const TREE_SIZE: i64 = 10_000;
const DEGREE: usize = 32;
const ROUNDS: usize = 50;

#[test]
#[ignore] // Long running test
fn test_insert_throughput() {
    let keys = shuffled(TREE_SIZE, 7);

    let start = Instant::now();
    let mut last = None;
    for _ in 0..ROUNDS {
        let mut tree = BTree::new(DEGREE).expect("valid degree");
        for &key in &keys {
            tree.insert(key, key);
        }
        last = Some(tree);
    }
    let elapsed = start.elapsed();

    eprintln!(
        "insert: {} keys x {ROUNDS} rounds in {elapsed:?}",
        keys.len()
    );
    let tree = last.expect("at least one round");
    assert_eq!(tree.len(), keys.len());
    assert_valid(&tree);
}

#[test]
#[ignore] // Long running test
fn test_delete_throughput() {
    let inserts = shuffled(TREE_SIZE, 7);
    let deletes = shuffled(TREE_SIZE, 8);

    let mut elapsed = std::time::Duration::ZERO;
    let mut tree = BTree::new(DEGREE).expect("valid degree");
    for _ in 0..ROUNDS {
        for &key in &inserts {
            tree.insert(key, key);
        }

        let start = Instant::now();
        for key in &deletes {
            assert_eq!(tree.remove(key), Some(*key));
        }
        elapsed += start.elapsed();

        assert!(tree.is_empty());
    }

    eprintln!(
        "delete: {} keys x {ROUNDS} rounds in {elapsed:?}",
        deletes.len()
    );
    assert_valid(&tree);
}
