//! In-memory B-tree keyed by any `K: Ord`.
//!
//! The tree follows the CLRS formulation with a minimum degree `t`:
//! every node except the root holds between `t - 1` and `2t - 1` keys,
//! internal nodes have one more child than keys, and all leaves sit at the
//! same depth.
//!
//! # Structure
//!
//! - Insertion splits a node that overflows on the way back up, promoting
//!   its middle entry into the parent. A split root grows the tree by a level.
//! - Deletion repairs an underfull child after recursing into it: borrow
//!   from the left sibling, else borrow from the right, else merge. A root
//!   left with no keys is replaced by its only child.
//! - Deleting a key held in an internal node substitutes its in-order
//!   predecessor or successor and removes that from the leaf instead.
//!
//! # Usage
//!
//! ```
//! use beetree::btree::BTree;
//!
//! let mut tree = BTree::new(3).expect("degree 3 is valid");
//! for key in [10, 20, 30, 40, 50, 60] {
//!     tree.insert(key, key * 100);
//! }
//!
//! assert_eq!(tree.get(&40), Some(&4000));
//! assert_eq!(tree.remove(&40), Some(4000));
//! assert_eq!(tree.get(&40), None);
//! assert!(tree.check_invariants().is_ok());
//! ```

mod inspect;
mod node;
mod tree;

pub use inspect::{InvariantViolation, LevelOrder};
pub use node::{Entry, Node};
pub use tree::{BTree, BTreeError};
