//! In-memory B-tree with CLRS rebalancing.
//!
//! Insertion splits full nodes on the way back up from the leaf, and
//! deletion repairs underflowed children on the way back up from wherever
//! the key was found. Both are single recursive passes; there is no
//! separate fix-up walk.

use crate::btree::node::{Entry, Node, max_entries, min_entries};

/// An ordered key-value store backed by a B-tree of minimum degree `t`.
///
/// Every non-root node holds between `t - 1` and `2t - 1` keys. The root
/// holds at least one key unless the tree is empty, in which case there is
/// no root at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BTree<K, V> {
    pub(crate) root: Option<Box<Node<K, V>>>,
    pub(crate) degree: usize,
    pub(crate) len: usize,
}

/// What a recursive insert did to the subtree it was handed.
enum InsertResult<K, V> {
    /// A new entry was added without splitting this node.
    Absorbed,
    /// The key was already present; the previous value is returned.
    Updated(V),
    /// The node split. `middle` must be absorbed by the parent and `right`
    /// placed immediately to the right of the node that was split.
    Split {
        middle: Entry<K, V>,
        right: Box<Node<K, V>>,
    },
}

impl<K: Ord, V> BTree<K, V> {
    /// Smallest supported minimum degree.
    pub const MIN_DEGREE: usize = 2;
    /// Largest supported minimum degree, so that `2t - 1` fits in a `usize`.
    pub const MAX_DEGREE: usize = usize::MAX / 2;

    /// Create an empty tree with the given minimum degree.
    ///
    /// # Errors
    ///
    /// Returns `BTreeError::InvalidDegree` if `degree` is outside
    /// `MIN_DEGREE..=MAX_DEGREE`.
    pub const fn new(degree: usize) -> Result<Self, BTreeError> {
        if degree < Self::MIN_DEGREE || degree > Self::MAX_DEGREE {
            return Err(BTreeError::InvalidDegree(degree));
        }
        Ok(Self {
            root: None,
            degree,
            len: 0,
        })
    }

    /// The minimum degree `t` this tree was built with.
    #[must_use]
    pub const fn degree(&self) -> usize {
        self.degree
    }

    /// Number of entries in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The root node, if the tree is not empty.
    #[must_use]
    pub fn root(&self) -> Option<&Node<K, V>> {
        self.root.as_deref()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Look up the value stored for `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        let mut node = self.root.as_deref()?;
        loop {
            match node.search(key) {
                Ok(idx) => return Some(&node.entries[idx].value),
                // Leaves have no children, so a miss there ends the walk.
                Err(idx) => node = node.children.get(idx).map(Box::as_ref)?,
            }
        }
    }

    /// Look up a mutable reference to the value stored for `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let mut node = self.root.as_deref_mut()?;
        loop {
            match node.search(key) {
                Ok(idx) => return Some(&mut node.entries[idx].value),
                Err(idx) => node = node.children.get_mut(idx).map(Box::as_mut)?,
            }
        }
    }

    /// Whether `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Insert a key-value pair.
    ///
    /// If the key is already present its value is overwritten in place and
    /// the previous value is returned; the tree's shape does not change.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let entry = Entry { key, value };

        let Some(mut root) = self.root.take() else {
            self.root = Some(Box::new(Node::leaf(entry)));
            self.len = 1;
            return None;
        };

        match insert_into(&mut root, entry, self.degree) {
            InsertResult::Updated(old) => {
                self.root = Some(root);
                Some(old)
            }
            InsertResult::Absorbed => {
                self.root = Some(root);
                self.len += 1;
                None
            }
            InsertResult::Split { middle, right } => {
                self.root = Some(Box::new(Node::with_children(root, middle, right)));
                self.len += 1;
                tracing::debug!(height = self.height(), "root split, tree grew");
                None
            }
        }
    }

    /// Remove `key`, returning its value if it was present.
    ///
    /// Removing an absent key leaves the tree untouched.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let mut root = self.root.take()?;
        let removed = remove_from(&mut root, key, self.degree);
        self.root = collapse_root(root);

        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }
}

/// Insert `entry` into the subtree rooted at `node`.
fn insert_into<K: Ord, V>(
    node: &mut Node<K, V>,
    entry: Entry<K, V>,
    degree: usize,
) -> InsertResult<K, V> {
    let (entry, pending_child) = match node.search(&entry.key) {
        Ok(idx) => {
            let old = std::mem::replace(&mut node.entries[idx].value, entry.value);
            return InsertResult::Updated(old);
        }
        Err(_) if node.is_leaf() => (entry, None),
        Err(idx) => match insert_into(&mut node.children[idx], entry, degree) {
            InsertResult::Split { middle, right } => (middle, Some(right)),
            done => return done,
        },
    };

    if node.entries.len() < max_entries(degree) {
        node.absorb(entry, pending_child);
        return InsertResult::Absorbed;
    }

    let (middle, mut right) = node.split(degree);
    if entry.key < middle.key {
        node.absorb(entry, pending_child);
    } else {
        right.absorb(entry, pending_child);
    }

    InsertResult::Split {
        middle,
        right: Box::new(right),
    }
}

/// Remove `key` from the subtree rooted at `node`.
///
/// `node` itself may be left underflowed; its parent repairs it.
fn remove_from<K: Ord, V>(node: &mut Node<K, V>, key: &K, degree: usize) -> Option<V> {
    match node.search(key) {
        Ok(idx) if node.is_leaf() => Some(node.entries.remove(idx).value),
        Ok(idx) => remove_separator(node, idx, degree),
        Err(_) if node.is_leaf() => None,
        Err(idx) => {
            let removed = remove_from(&mut node.children[idx], key, degree);
            node.rebalance_child(idx, degree);
            removed
        }
    }
}

/// Remove `entries[idx]` from an internal node.
///
/// The slot is refilled with the predecessor if the leaf holding it can
/// spare a key, otherwise with the successor if its leaf can, otherwise with
/// the predecessor anyway, leaving the left child to be repaired.
fn remove_separator<K: Ord, V>(node: &mut Node<K, V>, idx: usize, degree: usize) -> Option<V> {
    let min = min_entries(degree);
    let use_predecessor = node.children[idx].max_leaf_key_count() > min
        || node.children[idx + 1].min_leaf_key_count() <= min;

    let (substitute, visited) = if use_predecessor {
        (remove_max(&mut node.children[idx], degree)?, idx)
    } else {
        (remove_min(&mut node.children[idx + 1], degree)?, idx + 1)
    };

    // The substitute must be in place before repairing, since a borrow or
    // merge of the visited child can pull this separator down.
    let removed = std::mem::replace(&mut node.entries[idx], substitute);
    node.rebalance_child(visited, degree);

    tracing::trace!(
        separator = idx,
        predecessor = use_predecessor,
        "replaced internal key"
    );
    Some(removed.value)
}

/// Remove and return the largest entry of the subtree rooted at `node`.
fn remove_max<K: Ord, V>(node: &mut Node<K, V>, degree: usize) -> Option<Entry<K, V>> {
    if node.is_leaf() {
        return node.entries.pop();
    }
    let last = node.children.len() - 1;
    let max = remove_max(&mut node.children[last], degree);
    node.rebalance_child(last, degree);
    max
}

/// Remove and return the smallest entry of the subtree rooted at `node`.
fn remove_min<K: Ord, V>(node: &mut Node<K, V>, degree: usize) -> Option<Entry<K, V>> {
    if node.is_leaf() {
        if node.entries.is_empty() {
            return None;
        }
        return Some(node.entries.remove(0));
    }
    let min = remove_min(&mut node.children[0], degree);
    node.rebalance_child(0, degree);
    min
}

/// Shrink the tree if a merge emptied the root.
fn collapse_root<K, V>(mut root: Box<Node<K, V>>) -> Option<Box<Node<K, V>>> {
    if !root.entries.is_empty() {
        return Some(root);
    }
    let child = root.children.pop();
    debug_assert!(root.children.is_empty(), "empty root with several children");
    if child.is_some() {
        tracing::debug!("root emptied by merge, tree shrank");
    }
    child
}

/// Errors returned by B-tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BTreeError {
    /// Minimum degree below 2.
    InvalidDegree(usize),
    /// A shared tree's lock was poisoned by a panicking writer.
    LockPoisoned,
}

impl std::fmt::Display for BTreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDegree(degree) => {
                write!(
                    f,
                    "invalid minimum degree: {degree} (must be between 2 and usize::MAX / 2)"
                )
            }
            Self::LockPoisoned => write!(f, "tree lock poisoned"),
        }
    }
}

impl std::error::Error for BTreeError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_keys(tree: &BTree<i32, i32>) -> Vec<i32> {
        tree.root()
            .map(|root| root.entries().iter().map(|e| e.key).collect())
            .unwrap_or_default()
    }

    fn child_keys(tree: &BTree<i32, i32>) -> Vec<Vec<i32>> {
        tree.root()
            .map(|root| {
                root.children()
                    .iter()
                    .map(|c| c.entries().iter().map(|e| e.key).collect())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn build(degree: usize, keys: &[i32]) -> BTree<i32, i32> {
        let mut tree = BTree::new(degree).expect("valid degree");
        for &key in keys {
            tree.insert(key, key * 10);
        }
        tree
    }

    #[test]
    fn test_new_rejects_small_degree() {
        assert_eq!(
            BTree::<i32, ()>::new(1).unwrap_err(),
            BTreeError::InvalidDegree(1)
        );
        assert_eq!(
            BTree::<i32, ()>::new(0).unwrap_err(),
            BTreeError::InvalidDegree(0)
        );
        assert!(BTree::<i32, ()>::new(2).is_ok());
    }

    #[test]
    fn test_new_rejects_degree_whose_capacity_overflows() {
        assert_eq!(
            BTree::<i32, ()>::new(usize::MAX).unwrap_err(),
            BTreeError::InvalidDegree(usize::MAX)
        );
        assert_eq!(
            BTree::<i32, ()>::new(usize::MAX / 2 + 1).unwrap_err(),
            BTreeError::InvalidDegree(usize::MAX / 2 + 1)
        );
    }

    #[test]
    fn test_largest_degree_is_usable() {
        let mut tree =
            BTree::<i32, ()>::new(BTree::<i32, ()>::MAX_DEGREE).expect("largest degree");

        for key in 0..10 {
            tree.insert(key, ());
        }

        assert_eq!(tree.len(), 10);
        assert_eq!(tree.height(), 1);
        assert!(tree.check_invariants().is_ok());
        for key in 0..10 {
            assert_eq!(tree.remove(&key), Some(()));
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            BTreeError::InvalidDegree(1).to_string(),
            "invalid minimum degree: 1 (must be between 2 and usize::MAX / 2)"
        );
        assert_eq!(BTreeError::LockPoisoned.to_string(), "tree lock poisoned");
    }

    #[test]
    fn test_empty_tree() {
        let mut tree: BTree<i32, i32> = BTree::new(3).expect("valid degree");

        assert!(tree.is_empty());
        assert_eq!(tree.get(&1), None);
        assert_eq!(tree.remove(&1), None);
        assert!(tree.root().is_none());
    }

    #[test]
    fn test_first_insert_creates_leaf_root() {
        let tree = build(3, &[10]);

        assert_eq!(root_keys(&tree), vec![10]);
        assert!(tree.root().is_some_and(Node::is_leaf));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_root_split() {
        let tree = build(3, &[10, 20, 30, 40, 50, 60]);

        assert_eq!(root_keys(&tree), vec![30]);
        assert_eq!(child_keys(&tree), vec![vec![10, 20], vec![40, 50, 60]]);
        assert_eq!(tree.len(), 6);
    }

    #[test]
    fn test_get_finds_keys_in_internal_nodes() {
        let tree = build(2, &[10, 20, 30, 40]);

        assert_eq!(root_keys(&tree), vec![20]);
        assert_eq!(tree.get(&20), Some(&200));
        assert_eq!(tree.get(&40), Some(&400));
        assert_eq!(tree.get(&25), None);
    }

    #[test]
    fn test_get_distinguishes_zero_key_from_missing() {
        let mut tree = build(2, &[-1, 1]);
        assert_eq!(tree.get(&0), None);

        tree.insert(0, 0);
        assert_eq!(tree.get(&0), Some(&0));
    }

    #[test]
    fn test_get_mut() {
        let mut tree = build(2, &[10, 20, 30, 40]);

        if let Some(value) = tree.get_mut(&20) {
            *value = 7;
        }
        assert_eq!(tree.get(&20), Some(&7));
        assert!(tree.get_mut(&99).is_none());
    }

    #[test]
    fn test_insert_returns_previous_value() {
        let mut tree = build(2, &[10, 20, 30, 40]);

        assert_eq!(tree.insert(20, 1), Some(200));
        assert_eq!(tree.insert(40, 2), Some(400));
        assert_eq!(tree.insert(50, 3), None);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn test_remove_from_leaf() {
        let mut tree = build(3, &[10, 20, 30]);

        assert_eq!(tree.remove(&20), Some(200));
        assert_eq!(root_keys(&tree), vec![10, 30]);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_remove_last_key_empties_tree() {
        let mut tree = build(3, &[10]);

        assert_eq!(tree.remove(&10), Some(100));
        assert!(tree.root().is_none());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_remove_uses_predecessor_with_spare_key() {
        let mut tree = build(2, &[10, 20, 30, 40, 5]);
        assert_eq!(child_keys(&tree), vec![vec![5, 10], vec![30, 40]]);

        assert_eq!(tree.remove(&20), Some(200));

        assert_eq!(root_keys(&tree), vec![10]);
        assert_eq!(child_keys(&tree), vec![vec![5], vec![30, 40]]);
        assert_eq!(tree.get(&10), Some(&100));
    }

    #[test]
    fn test_remove_uses_successor_when_predecessor_is_minimal() {
        let mut tree = build(2, &[10, 20, 30, 40]);
        assert_eq!(child_keys(&tree), vec![vec![10], vec![30, 40]]);

        assert_eq!(tree.remove(&20), Some(200));

        assert_eq!(root_keys(&tree), vec![30]);
        assert_eq!(child_keys(&tree), vec![vec![10], vec![40]]);
    }

    #[test]
    fn test_remove_forced_predecessor_merges_and_shrinks() {
        let mut tree = build(2, &[10, 20, 30, 40]);
        tree.remove(&40);
        assert_eq!(child_keys(&tree), vec![vec![10], vec![30]]);

        assert_eq!(tree.remove(&20), Some(200));

        assert_eq!(root_keys(&tree), vec![10, 30]);
        assert!(tree.root().is_some_and(Node::is_leaf));
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_clear() {
        let mut tree = build(2, &[1, 2, 3, 4, 5]);
        tree.clear();

        assert!(tree.is_empty());
        assert!(tree.root().is_none());
        assert_eq!(tree.get(&3), None);
    }
}
