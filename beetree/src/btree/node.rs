//! B-tree node type and node-local primitives.
//!
//! A node holds up to `2t - 1` entries in ascending key order. Internal nodes
//! additionally own `entries.len() + 1` children:
//! - `children[i]` holds keys < `entries[i].key`
//! - `children[i + 1]` holds keys > `entries[i].key`
//!
//! Everything in this module works on one node and its direct children. The
//! recursive descent lives in `tree.rs`.

use std::cmp::Ordering;

/// Maximum number of entries a node may hold for the given minimum degree.
///
/// `degree` must already have been validated by `BTree::new`.
#[must_use]
pub const fn max_entries(degree: usize) -> usize {
    2 * degree - 1
}

/// Minimum number of entries a non-root node must hold.
#[must_use]
pub const fn min_entries(degree: usize) -> usize {
    degree - 1
}

/// A key-value entry stored in a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

/// A B-tree node.
///
/// A node with no children is a leaf. Children are owned exclusively, so
/// moving one between nodes is a transfer of ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<K, V> {
    /// Entries in ascending key order.
    pub(crate) entries: Vec<Entry<K, V>>,
    /// Child nodes. Empty for leaves, `entries.len() + 1` otherwise.
    pub(crate) children: Vec<Box<Node<K, V>>>,
}

impl<K: Ord, V> Node<K, V> {
    /// Create a leaf holding a single entry.
    #[must_use]
    pub(crate) fn leaf(entry: Entry<K, V>) -> Self {
        Self {
            entries: vec![entry],
            children: Vec::new(),
        }
    }

    /// Create an internal node with one separator and two children.
    ///
    /// Used when the root splits and the tree grows by one level.
    #[must_use]
    pub(crate) fn with_children(left: Box<Self>, middle: Entry<K, V>, right: Box<Self>) -> Self {
        Self {
            entries: vec![middle],
            children: vec![left, right],
        }
    }

    /// Whether this node has no children.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::is_empty() is not const-stable
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of keys held by this node.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len() is not const-stable
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// Entries in ascending key order.
    #[must_use]
    pub fn entries(&self) -> &[Entry<K, V>] {
        &self.entries
    }

    /// Child nodes, empty for a leaf.
    #[must_use]
    pub fn children(&self) -> &[Box<Self>] {
        &self.children
    }

    /// Scan the keys left to right.
    ///
    /// Returns `Ok(i)` if `entries[i]` holds `key`. Otherwise returns
    /// `Err(i)` where `i` is the index of the first key greater than `key`
    /// (or the key count if none is), which is also the child to descend into.
    #[must_use]
    pub(crate) fn search(&self, key: &K) -> Result<usize, usize> {
        for (i, entry) in self.entries.iter().enumerate() {
            match key.cmp(&entry.key) {
                Ordering::Equal => return Ok(i),
                Ordering::Less => return Err(i),
                Ordering::Greater => {}
            }
        }
        Err(self.entries.len())
    }

    /// Insert an entry before the first key greater than it, appending if
    /// there is none. Returns the index the entry landed at.
    pub(crate) fn insert_sorted(&mut self, entry: Entry<K, V>) -> usize {
        let idx = self
            .entries
            .iter()
            .position(|e| e.key > entry.key)
            .unwrap_or(self.entries.len());
        self.entries.insert(idx, entry);
        idx
    }

    /// Add an entry, and the right half of a split child if there is one.
    ///
    /// The child goes immediately to the right of the entry, since the entry
    /// is the separator that was promoted out of that child's left neighbour.
    pub(crate) fn absorb(&mut self, entry: Entry<K, V>, right_child: Option<Box<Self>>) {
        let idx = self.insert_sorted(entry);
        if let Some(child) = right_child {
            self.children.insert(idx + 1, child);
        }
        debug_assert!(self.is_leaf() || self.children.len() == self.entries.len() + 1);
    }

    /// Split a full node around its middle entry.
    ///
    /// The entry at index `t - 1` is removed and returned with a new right
    /// sibling holding every entry after it (and, for internal nodes, every
    /// child from index `t`). Both halves are left with `t - 1` entries.
    #[must_use]
    pub(crate) fn split(&mut self, degree: usize) -> (Entry<K, V>, Self) {
        debug_assert_eq!(self.entries.len(), max_entries(degree));

        let right_entries: Vec<Entry<K, V>> = self.entries.drain(degree..).collect();
        let right_children: Vec<Box<Self>> = if self.is_leaf() {
            Vec::new()
        } else {
            self.children.drain(degree..).collect()
        };

        // The middle is now the last entry of the left half.
        let middle = self.entries.remove(degree - 1);

        tracing::trace!(
            left_keys = self.entries.len(),
            right_keys = right_entries.len(),
            leaf = self.is_leaf(),
            "split full node"
        );

        (
            middle,
            Self {
                entries: right_entries,
                children: right_children,
            },
        )
    }

    /// Number of keys in the leaf holding this subtree's maximum.
    #[must_use]
    pub(crate) fn max_leaf_key_count(&self) -> usize {
        let mut node = self;
        while let Some(child) = node.children.last() {
            node = child.as_ref();
        }
        node.entries.len()
    }

    /// Number of keys in the leaf holding this subtree's minimum.
    #[must_use]
    pub(crate) fn min_leaf_key_count(&self) -> usize {
        let mut node = self;
        while let Some(child) = node.children.first() {
            node = child.as_ref();
        }
        node.entries.len()
    }

    /// Repair `children[idx]` if it holds fewer than `t - 1` keys.
    ///
    /// Tries, in order: borrowing from the left sibling, borrowing from the
    /// right sibling, merging with the right sibling, merging with the left
    /// sibling. A sibling can lend only if it holds more than `t - 1` keys.
    pub(crate) fn rebalance_child(&mut self, idx: usize, degree: usize) {
        let min = min_entries(degree);
        if self.children[idx].entries.len() >= min {
            return;
        }

        let has_left = idx > 0;
        let has_right = idx + 1 < self.children.len();

        if has_left && self.children[idx - 1].entries.len() > min {
            self.borrow_from_left(idx);
        } else if has_right && self.children[idx + 1].entries.len() > min {
            self.borrow_from_right(idx);
        } else if has_right {
            self.merge_children(idx);
        } else if has_left {
            self.merge_children(idx - 1);
        }
        // A lone child only happens at the root; the tree collapses it.
    }

    /// Rotate one entry from `children[idx - 1]` through the parent into
    /// `children[idx]`.
    fn borrow_from_left(&mut self, idx: usize) {
        let (before, after) = self.children.split_at_mut(idx);
        let left = &mut before[idx - 1];
        let child = &mut after[0];

        let Some(donated) = left.entries.pop() else {
            return;
        };
        let separator = std::mem::replace(&mut self.entries[idx - 1], donated);
        child.insert_sorted(separator);

        if let Some(moved) = left.children.pop() {
            child.children.insert(0, moved);
        }

        tracing::trace!(child = idx, "borrowed entry from left sibling");
    }

    /// Rotate one entry from `children[idx + 1]` through the parent into
    /// `children[idx]`.
    fn borrow_from_right(&mut self, idx: usize) {
        let (before, after) = self.children.split_at_mut(idx + 1);
        let child = &mut before[idx];
        let right = &mut after[0];

        if right.entries.is_empty() {
            return;
        }
        let donated = right.entries.remove(0);
        let separator = std::mem::replace(&mut self.entries[idx], donated);
        child.insert_sorted(separator);

        if !right.children.is_empty() {
            child.children.push(right.children.remove(0));
        }

        tracing::trace!(child = idx, "borrowed entry from right sibling");
    }

    /// Merge `children[idx]`, `entries[idx]` and `children[idx + 1]` into a
    /// single child at `idx`.
    fn merge_children(&mut self, idx: usize) {
        let right = self.children.remove(idx + 1);
        let separator = self.entries.remove(idx);

        let left = &mut self.children[idx];
        left.entries.push(separator);
        let Self { entries, children } = *right;
        left.entries.extend(entries);
        left.children.extend(children);

        debug_assert!(left.is_leaf() || left.children.len() == left.entries.len() + 1);
        tracing::trace!(
            child = idx,
            merged_keys = left.entries.len(),
            "merged child with right sibling"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: i32) -> Entry<i32, i32> {
        Entry {
            key,
            value: key * 10,
        }
    }

    fn leaf_of(keys: &[i32]) -> Node<i32, i32> {
        Node {
            entries: keys.iter().copied().map(entry).collect(),
            children: Vec::new(),
        }
    }

    fn internal_of(keys: &[i32], children: Vec<Node<i32, i32>>) -> Node<i32, i32> {
        Node {
            entries: keys.iter().copied().map(entry).collect(),
            children: children.into_iter().map(Box::new).collect(),
        }
    }

    fn keys_of(node: &Node<i32, i32>) -> Vec<i32> {
        node.entries.iter().map(|e| e.key).collect()
    }

    #[test]
    fn test_capacity_bounds() {
        assert_eq!(max_entries(2), 3);
        assert_eq!(min_entries(2), 1);
        assert_eq!(max_entries(3), 5);
        assert_eq!(min_entries(3), 2);
    }

    #[test]
    fn test_search() {
        let node = leaf_of(&[10, 20, 30]);

        assert_eq!(node.search(&5), Err(0));
        assert_eq!(node.search(&10), Ok(0));
        assert_eq!(node.search(&15), Err(1));
        assert_eq!(node.search(&30), Ok(2));
        assert_eq!(node.search(&35), Err(3));
    }

    #[test]
    fn test_insert_sorted() {
        let mut node = leaf_of(&[10, 30]);

        assert_eq!(node.insert_sorted(entry(20)), 1);
        assert_eq!(node.insert_sorted(entry(5)), 0);
        assert_eq!(node.insert_sorted(entry(40)), 4);
        assert_eq!(keys_of(&node), vec![5, 10, 20, 30, 40]);
    }

    #[test]
    fn test_absorb_places_child_right_of_entry() {
        let mut node = internal_of(&[20], vec![leaf_of(&[10]), leaf_of(&[30, 35, 40])]);

        // children[1] split around 35, promoting it with a new right half.
        node.children[1].entries.truncate(1);
        node.absorb(entry(35), Some(Box::new(leaf_of(&[40]))));

        assert_eq!(keys_of(&node), vec![20, 35]);
        assert_eq!(keys_of(&node.children[0]), vec![10]);
        assert_eq!(keys_of(&node.children[1]), vec![30]);
        assert_eq!(keys_of(&node.children[2]), vec![40]);
    }

    #[test]
    fn test_leaf_split() {
        let mut node = leaf_of(&[10, 20, 30, 40, 50]);

        let (middle, right) = node.split(3);

        assert_eq!(middle, entry(30));
        assert_eq!(keys_of(&node), vec![10, 20]);
        assert_eq!(keys_of(&right), vec![40, 50]);
        assert!(right.is_leaf());
    }

    #[test]
    fn test_internal_split_moves_children() {
        let mut node = internal_of(
            &[10, 20, 30],
            vec![leaf_of(&[5]), leaf_of(&[15]), leaf_of(&[25]), leaf_of(&[35])],
        );

        let (middle, right) = node.split(2);

        assert_eq!(middle.key, 20);
        assert_eq!(keys_of(&node), vec![10]);
        assert_eq!(node.children.len(), 2);
        assert_eq!(keys_of(&right), vec![30]);
        assert_eq!(right.children.len(), 2);
        assert_eq!(keys_of(&right.children[0]), vec![25]);
        assert_eq!(keys_of(&right.children[1]), vec![35]);
    }

    #[test]
    fn test_extreme_leaf_key_counts() {
        let node = internal_of(&[20], vec![leaf_of(&[5, 10]), leaf_of(&[30])]);

        assert_eq!(node.max_leaf_key_count(), 1);
        assert_eq!(node.min_leaf_key_count(), 2);
    }

    #[test]
    fn test_rebalance_borrows_from_left() {
        let mut node = internal_of(&[20], vec![leaf_of(&[5, 10]), leaf_of(&[])]);

        node.rebalance_child(1, 2);

        assert_eq!(keys_of(&node), vec![10]);
        assert_eq!(keys_of(&node.children[0]), vec![5]);
        assert_eq!(keys_of(&node.children[1]), vec![20]);
        // Values travel with their keys.
        assert_eq!(node.children[1].entries[0].value, 200);
    }

    #[test]
    fn test_rebalance_borrows_from_right() {
        let mut node = internal_of(&[20], vec![leaf_of(&[]), leaf_of(&[30, 40])]);

        node.rebalance_child(0, 2);

        assert_eq!(keys_of(&node), vec![30]);
        assert_eq!(keys_of(&node.children[0]), vec![20]);
        assert_eq!(keys_of(&node.children[1]), vec![40]);
    }

    #[test]
    fn test_rebalance_prefers_left_sibling() {
        let mut node = internal_of(
            &[10, 30],
            vec![leaf_of(&[1, 5]), leaf_of(&[]), leaf_of(&[40, 50])],
        );

        node.rebalance_child(1, 2);

        assert_eq!(keys_of(&node), vec![5, 30]);
        assert_eq!(keys_of(&node.children[1]), vec![10]);
        assert_eq!(keys_of(&node.children[2]), vec![40, 50]);
    }

    #[test]
    fn test_rebalance_merges_with_right() {
        let mut node = internal_of(&[20, 40], vec![leaf_of(&[]), leaf_of(&[30]), leaf_of(&[50])]);

        node.rebalance_child(0, 2);

        assert_eq!(keys_of(&node), vec![40]);
        assert_eq!(node.children.len(), 2);
        assert_eq!(keys_of(&node.children[0]), vec![20, 30]);
    }

    #[test]
    fn test_rebalance_merges_last_child_with_left() {
        let mut node = internal_of(&[20], vec![leaf_of(&[10]), leaf_of(&[])]);

        node.rebalance_child(1, 2);

        assert!(node.entries.is_empty());
        assert_eq!(node.children.len(), 1);
        assert_eq!(keys_of(&node.children[0]), vec![10, 20]);
    }

    #[test]
    fn test_borrow_moves_grandchild() {
        let left = internal_of(
            &[10, 20],
            vec![leaf_of(&[5]), leaf_of(&[15]), leaf_of(&[25])],
        );
        let underflowed = internal_of(&[], vec![leaf_of(&[40])]);
        let mut node = internal_of(&[30], vec![left, underflowed]);

        node.rebalance_child(1, 2);

        assert_eq!(keys_of(&node), vec![20]);
        assert_eq!(keys_of(&node.children[0]), vec![10]);
        assert_eq!(node.children[0].children.len(), 2);
        assert_eq!(keys_of(&node.children[1]), vec![30]);
        assert_eq!(keys_of(&node.children[1].children[0]), vec![25]);
        assert_eq!(keys_of(&node.children[1].children[1]), vec![40]);
    }

    #[test]
    fn test_borrow_from_right_moves_grandchild() {
        let underflowed = internal_of(&[], vec![leaf_of(&[10])]);
        let right = internal_of(
            &[30, 40],
            vec![leaf_of(&[25]), leaf_of(&[35]), leaf_of(&[45])],
        );
        let mut node = internal_of(&[20], vec![underflowed, right]);

        node.rebalance_child(0, 2);

        assert_eq!(keys_of(&node), vec![30]);
        assert_eq!(keys_of(&node.children[0]), vec![20]);
        assert_eq!(keys_of(&node.children[0].children[0]), vec![10]);
        assert_eq!(keys_of(&node.children[0].children[1]), vec![25]);
        assert_eq!(keys_of(&node.children[1]), vec![40]);
        assert_eq!(node.children[1].children.len(), 2);
        assert_eq!(keys_of(&node.children[1].children[0]), vec![35]);
    }

    #[test]
    fn test_rebalance_ignores_healthy_child() {
        let mut node = internal_of(&[20], vec![leaf_of(&[10]), leaf_of(&[30, 40])]);
        let before = node.clone();

        node.rebalance_child(0, 2);

        assert_eq!(node, before);
    }
}
