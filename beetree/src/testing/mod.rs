//! Shared helpers for unit and end-to-end tests.

#![allow(clippy::expect_used)]

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::btree::BTree;

/// Build a tree of the given degree, inserting `keys` in order with each
/// key's value equal to the key itself.
pub fn tree_with_keys(degree: usize, keys: impl IntoIterator<Item = i64>) -> BTree<i64, i64> {
    let mut tree = BTree::new(degree).expect("test degree is valid");
    for key in keys {
        tree.insert(key, key);
    }
    tree
}

/// The tree's keys in order, copied out.
pub fn in_order(tree: &BTree<i64, i64>) -> Vec<i64> {
    tree.keys().into_iter().copied().collect()
}

/// Keys held by the root node.
pub fn root_keys(tree: &BTree<i64, i64>) -> Vec<i64> {
    tree.root()
        .map(|root| root.entries().iter().map(|e| e.key).collect())
        .unwrap_or_default()
}

/// Panic with the violation and a level-order dump if the tree is invalid.
pub fn assert_valid(tree: &BTree<i64, i64>) {
    if let Err(violation) = tree.check_invariants() {
        panic!("{violation}\n{}", tree.level_order());
    }
}

/// `0..n` in a seeded random order.
pub fn shuffled(n: i64, seed: u64) -> Vec<i64> {
    let mut keys: Vec<i64> = (0..n).collect();
    keys.shuffle(&mut StdRng::seed_from_u64(seed));
    keys
}
