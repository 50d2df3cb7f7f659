//! A tree shared across threads.
//!
//! `SharedBTree` guards a whole [`BTree`] with one `RwLock`: lookups take
//! the read lock and may run in parallel, mutations take the write lock.
//! Cloning the handle shares the same tree.
//!
//! A writer that panics while holding the lock poisons it; every later call
//! then fails with [`BTreeError::LockPoisoned`].

use std::sync::{Arc, RwLock};

use crate::btree::{BTree, BTreeError};

/// Thread-safe handle to a B-tree.
pub struct SharedBTree<K, V> {
    inner: Arc<RwLock<BTree<K, V>>>,
}

impl<K, V> Clone for SharedBTree<K, V> {
    #[allow(clippy::disallowed_methods)] // Arc::clone is safe and expected
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K: Ord, V> SharedBTree<K, V> {
    /// Create an empty shared tree with the given minimum degree.
    ///
    /// # Errors
    ///
    /// Returns `BTreeError::InvalidDegree` if `degree` is outside
    /// `2..=BTree::MAX_DEGREE`.
    pub fn new(degree: usize) -> Result<Self, BTreeError> {
        Ok(Self::from_tree(BTree::new(degree)?))
    }

    /// Wrap an existing tree.
    #[must_use]
    pub fn from_tree(tree: BTree<K, V>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    /// Insert or overwrite, returning the previous value.
    pub fn insert(&self, key: K, value: V) -> Result<Option<V>, BTreeError> {
        let mut tree = self.inner.write().map_err(|_| BTreeError::LockPoisoned)?;
        Ok(tree.insert(key, value))
    }

    /// Look up a key, returning a copy of its value.
    pub fn get(&self, key: &K) -> Result<Option<V>, BTreeError>
    where
        V: Clone,
    {
        let tree = self.inner.read().map_err(|_| BTreeError::LockPoisoned)?;
        Ok(tree.get(key).cloned())
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &K) -> Result<bool, BTreeError> {
        let tree = self.inner.read().map_err(|_| BTreeError::LockPoisoned)?;
        Ok(tree.contains_key(key))
    }

    /// Remove a key, returning its value if it was present.
    pub fn remove(&self, key: &K) -> Result<Option<V>, BTreeError> {
        let mut tree = self.inner.write().map_err(|_| BTreeError::LockPoisoned)?;
        Ok(tree.remove(key))
    }

    /// Number of entries in the tree.
    pub fn len(&self) -> Result<usize, BTreeError> {
        let tree = self.inner.read().map_err(|_| BTreeError::LockPoisoned)?;
        Ok(tree.len())
    }

    /// Whether the tree holds no entries.
    pub fn is_empty(&self) -> Result<bool, BTreeError> {
        Ok(self.len()? == 0)
    }

    /// Run `f` against the tree under the read lock.
    pub fn with_tree<R>(&self, f: impl FnOnce(&BTree<K, V>) -> R) -> Result<R, BTreeError> {
        let tree = self.inner.read().map_err(|_| BTreeError::LockPoisoned)?;
        Ok(f(&tree))
    }
}
