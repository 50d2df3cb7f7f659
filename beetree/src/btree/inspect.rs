//! Read-only inspection of a tree's shape.
//!
//! None of this is needed by `insert`/`get`/`remove`. It exists for
//! debugging, for the demo driver, and for tests that check structural
//! invariants after every operation.

use std::fmt;

use crate::btree::node::{Node, max_entries, min_entries};
use crate::btree::tree::BTree;

impl<K: Ord, V> BTree<K, V> {
    /// Number of levels. 0 for an empty tree, 1 for a lone leaf root.
    #[must_use]
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut node = self.root.as_deref();
        while let Some(current) = node {
            height += 1;
            node = current.children.first().map(Box::as_ref);
        }
        height
    }

    /// Total number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        fn count<K, V>(node: &Node<K, V>) -> usize {
            1 + node.children.iter().map(|c| count(c)).sum::<usize>()
        }
        self.root.as_deref().map_or(0, count)
    }

    /// All keys in ascending order.
    #[must_use]
    pub fn keys(&self) -> Vec<&K> {
        fn collect<'a, K, V>(node: &'a Node<K, V>, out: &mut Vec<&'a K>) {
            for (i, entry) in node.entries.iter().enumerate() {
                if let Some(child) = node.children.get(i) {
                    collect(child, out);
                }
                out.push(&entry.key);
            }
            if let Some(child) = node.children.get(node.entries.len()) {
                collect(child, out);
            }
        }

        let mut out = Vec::with_capacity(self.len);
        if let Some(root) = self.root.as_deref() {
            collect(root, &mut out);
        }
        out
    }

    /// A level-by-level view of the tree, printable with `Display`.
    #[must_use]
    pub fn level_order(&self) -> LevelOrder<'_, K, V> {
        let mut levels = Vec::new();
        let mut current: Vec<(Option<usize>, &Node<K, V>)> =
            self.root.as_deref().map(|root| (None, root)).into_iter().collect();

        while !current.is_empty() {
            let mut next = Vec::new();
            for (index, &(_, node)) in current.iter().enumerate() {
                next.extend(node.children.iter().map(|c| (Some(index), c.as_ref())));
            }
            levels.push(current);
            current = next;
        }

        LevelOrder { levels }
    }

    /// Check every structural invariant of the tree.
    ///
    /// - keys strictly ascend within each node and respect the separators
    ///   above them, so no key appears twice
    /// - non-root nodes hold `t - 1..=2t - 1` keys, the root `1..=2t - 1`
    /// - internal nodes have one more child than keys
    /// - all leaves sit at the same depth
    /// - the cached length matches the number of stored entries
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let Some(root) = self.root.as_deref() else {
            if self.len != 0 {
                return Err(InvariantViolation::new(
                    "empty tree reports entries",
                    format!("len = {}", self.len),
                ));
            }
            return Ok(());
        };

        if root.entries.is_empty() {
            return Err(InvariantViolation::new(
                "root retained with no keys",
                format!("{} children", root.children.len()),
            ));
        }

        let mut checker = StructureCheck {
            degree: self.degree,
            leaf_depth: None,
        };
        let entries = checker.check_node(root, None, None, 0)?;

        if entries != self.len {
            return Err(InvariantViolation::new(
                "cached length disagrees with stored entries",
                format!("len = {}, stored = {entries}", self.len),
            ));
        }
        Ok(())
    }
}

struct StructureCheck {
    degree: usize,
    leaf_depth: Option<usize>,
}

impl StructureCheck {
    /// Check the subtree at `node`, whose keys must lie strictly between
    /// `lower` and `upper`. Returns the number of entries in the subtree.
    fn check_node<K: Ord, V>(
        &mut self,
        node: &Node<K, V>,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
    ) -> Result<usize, InvariantViolation> {
        let keys = node.key_count();
        let location = format!("depth {depth}, {keys} keys");

        if keys > max_entries(self.degree) {
            return Err(InvariantViolation::new("node overflow", location));
        }
        if depth > 0 && keys < min_entries(self.degree) {
            return Err(InvariantViolation::new("node underflow", location));
        }
        if node.entries.windows(2).any(|pair| pair[0].key >= pair[1].key) {
            return Err(InvariantViolation::new(
                "keys not strictly ascending",
                location,
            ));
        }

        let out_of_range = node.entries.iter().any(|e| {
            lower.is_some_and(|low| e.key <= *low) || upper.is_some_and(|high| e.key >= *high)
        });
        if out_of_range {
            return Err(InvariantViolation::new(
                "key outside the range set by its separators",
                location,
            ));
        }

        if node.is_leaf() {
            match self.leaf_depth {
                None => self.leaf_depth = Some(depth),
                Some(expected) if expected != depth => {
                    return Err(InvariantViolation::new(
                        "leaves at different depths",
                        format!("expected depth {expected}, found {depth}"),
                    ));
                }
                Some(_) => {}
            }
            return Ok(keys);
        }

        if node.children.len() != keys + 1 {
            return Err(InvariantViolation::new(
                "child count is not key count + 1",
                format!("{location}, {} children", node.children.len()),
            ));
        }

        let mut total = keys;
        for (i, child) in node.children.iter().enumerate() {
            let low = if i == 0 { lower } else { Some(&node.entries[i - 1].key) };
            let high = node.entries.get(i).map(|e| &e.key).or(upper);
            total += self.check_node(child, low, high, depth + 1)?;
        }
        Ok(total)
    }
}

/// A broken structural invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// What is wrong.
    pub description: String,
    /// Operation index where it was detected, when checked during a run.
    pub operation_index: Option<usize>,
    /// Where in the tree it was found.
    pub context: String,
}

impl InvariantViolation {
    /// Create a violation not yet tied to an operation.
    #[must_use]
    pub fn new(description: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            operation_index: None,
            context: context.into(),
        }
    }

    /// Tag the violation with the operation that exposed it.
    #[must_use]
    pub const fn at_operation(mut self, index: usize) -> Self {
        self.operation_index = Some(index);
        self
    }
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(index) = self.operation_index {
            write!(f, "after operation {index}: ")?;
        }
        write!(f, "{} ({})", self.description, self.context)
    }
}

impl std::error::Error for InvariantViolation {}

/// Nodes of a tree grouped by level, each tagged with its parent's index in
/// the level above.
///
/// `Display` prints one line per level. Each key is rendered as
/// `parent:index:key`, where `index` is the node's position within its level
/// and the root's parent is `-1`.
pub struct LevelOrder<'a, K, V> {
    levels: Vec<Vec<(Option<usize>, &'a Node<K, V>)>>,
}

impl<K, V> LevelOrder<'_, K, V> {
    /// Number of levels.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Vec::len() is not const-stable
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Number of nodes on the given level (0 is the root).
    #[must_use]
    pub fn width(&self, level: usize) -> usize {
        self.levels.get(level).map_or(0, Vec::len)
    }
}

impl<K: fmt::Display, V> fmt::Display for LevelOrder<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, level) in self.levels.iter().enumerate() {
            if depth > 0 {
                writeln!(f)?;
            }
            let mut first = true;
            for (index, (parent, node)) in level.iter().enumerate() {
                for entry in &node.entries {
                    if !first {
                        write!(f, " ")?;
                    }
                    first = false;
                    match parent {
                        Some(p) => write!(f, "{p}:{index}:{}", entry.key)?,
                        None => write!(f, "-1:{index}:{}", entry.key)?,
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(degree: usize, keys: &[i32]) -> BTree<i32, ()> {
        let mut tree = BTree::new(degree).expect("valid degree");
        for &key in keys {
            tree.insert(key, ());
        }
        tree
    }

    #[test]
    fn test_empty_tree_shape() {
        let tree = build(3, &[]);

        assert_eq!(tree.height(), 0);
        assert_eq!(tree.node_count(), 0);
        assert!(tree.keys().is_empty());
        assert_eq!(tree.level_order().to_string(), "");
        assert!(tree.check_invariants().is_ok());
    }

    #[test]
    fn test_level_order_dump() {
        let tree = build(3, &[10, 20, 30, 40, 50, 60]);
        let levels = tree.level_order();

        assert_eq!(levels.depth(), 2);
        assert_eq!(levels.width(0), 1);
        assert_eq!(levels.width(1), 2);
        assert_eq!(
            levels.to_string(),
            "-1:0:30\n0:0:10 0:0:20 0:1:40 0:1:50 0:1:60"
        );
    }

    #[test]
    fn test_level_order_tracks_parent_index() {
        // [4] / [2] [6, 8] / [1] [3] | [5] [7] [9, 10]
        let keys: Vec<i32> = (1..=10).collect();
        let tree = build(2, &keys);
        let levels = tree.level_order();

        assert_eq!(levels.depth(), 3);
        assert_eq!(levels.width(1), 2);
        assert_eq!(levels.width(2), 5);
        assert_eq!(
            levels.to_string(),
            "-1:0:4\n0:0:2 0:1:6 0:1:8\n0:0:1 0:1:3 1:2:5 1:3:7 1:4:9 1:4:10"
        );
    }

    #[test]
    fn test_keys_in_order() {
        let tree = build(2, &[50, 10, 40, 20, 30, 60, 5]);

        assert_eq!(tree.keys(), vec![&5, &10, &20, &30, &40, &50, &60]);
        assert_eq!(tree.len(), 7);
    }

    #[test]
    fn test_height_and_node_count() {
        let tree = build(3, &[10, 20, 30, 40, 50, 60]);

        assert_eq!(tree.height(), 2);
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_check_invariants_catches_underflow() {
        let mut tree = build(3, &[10, 20, 30, 40, 50, 60]);
        if let Some(root) = tree.root.as_deref_mut() {
            root.children[0].entries.truncate(1);
        }
        tree.len -= 1;

        let violation = tree.check_invariants().expect_err("underflow");
        assert_eq!(violation.description, "node underflow");
    }

    #[test]
    fn test_check_invariants_catches_misplaced_key() {
        let mut tree = build(3, &[10, 20, 30, 40, 50, 60]);
        if let Some(root) = tree.root.as_deref_mut() {
            root.children[0].entries[1].key = 35;
        }

        let violation = tree.check_invariants().expect_err("misplaced key");
        assert_eq!(
            violation.description,
            "key outside the range set by its separators"
        );
    }

    #[test]
    fn test_check_invariants_catches_stale_length() {
        let mut tree = build(2, &[1, 2, 3]);
        tree.len = 5;

        let violation = tree.check_invariants().expect_err("stale length");
        assert_eq!(
            violation.description,
            "cached length disagrees with stored entries"
        );
    }

    #[test]
    fn test_violation_display() {
        let violation = InvariantViolation::new("node underflow", "depth 1, 0 keys")
            .at_operation(7);

        assert_eq!(
            violation.to_string(),
            "after operation 7: node underflow (depth 1, 0 keys)"
        );
    }
}
