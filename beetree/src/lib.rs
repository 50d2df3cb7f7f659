// Test code is allowed to use unwrap() and expect() for convenience.
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

// Layout:
//  - btree: the tree itself (node primitives, insert/get/remove, inspection)
//  - shared: whole-tree RwLock wrapper for use across threads
//  - config: environment configuration for the demo driver
//  - simulation: seeded workloads checked against a BTreeMap model
//
// Every mutation repairs the tree before returning: inserts split full
// nodes on the way back up, removes borrow or merge on the way back up.

pub mod btree;
pub mod config;
pub mod shared;
pub mod simulation;

mod e2e_tests;
#[cfg(test)]
mod testing;

pub use btree::{BTree, BTreeError};
pub use shared::SharedBTree;
