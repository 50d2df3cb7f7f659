//! Invariant checking for deterministic simulation testing.
//!
//! The checker keeps a `std::collections::BTreeMap` as a reference model.
//! Every operation's result is compared against the model, and the tree's
//! structure and contents are re-validated after each step.

// Snapshotting the tree before a remove needs a full clone
#![allow(clippy::disallowed_methods)]

use std::collections::BTreeMap;

use crate::btree::{BTree, InvariantViolation};

use super::workload::Operation;

/// Checker for tree invariants against a reference model.
pub struct InvariantChecker {
    model: BTreeMap<i64, u64>,
    violations: Vec<InvariantViolation>,
}

impl Default for InvariantChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantChecker {
    /// Create a checker with an empty model.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            model: BTreeMap::new(),
            violations: Vec::new(),
        }
    }

    /// Get all violations.
    #[must_use]
    pub fn violations(&self) -> &[InvariantViolation] {
        &self.violations
    }

    /// Check if any violations were detected.
    #[must_use]
    pub const fn has_violations(&self) -> bool {
        !self.violations.is_empty()
    }

    /// Take the recorded violations, leaving none behind.
    pub fn take_violations(&mut self) -> Vec<InvariantViolation> {
        std::mem::take(&mut self.violations)
    }

    /// Number of keys the model expects to be live.
    #[must_use]
    pub fn expected_len(&self) -> usize {
        self.model.len()
    }

    /// Add a violation.
    pub fn add_violation(&mut self, violation: InvariantViolation) {
        self.violations.push(violation);
    }

    /// Apply `operation` to the tree and the model, then verify the result.
    pub fn apply(&mut self, tree: &mut BTree<i64, u64>, operation: Operation, index: usize) {
        match operation {
            Operation::Insert { key, value } => {
                let actual = tree.insert(key, value);
                let expected = self.model.insert(key, value);
                self.check_result("insert", key, actual, expected, index);
            }
            Operation::Remove { key } => {
                let before = tree.clone();
                let actual = tree.remove(&key);
                let expected = self.model.remove(&key);
                self.check_result("remove", key, actual, expected, index);
                if expected.is_none() && *tree != before {
                    self.add_violation(
                        InvariantViolation::new(
                            "removing an absent key changed the tree",
                            format!("key {key}"),
                        )
                        .at_operation(index),
                    );
                }
            }
            Operation::Get { key } => {
                let actual = tree.get(&key).copied();
                let expected = self.model.get(&key).copied();
                self.check_result("get", key, actual, expected, index);
            }
        }
    }

    /// Check the tree's structural invariants.
    pub fn check_structure(&mut self, tree: &BTree<i64, u64>, index: usize) {
        if let Err(violation) = tree.check_invariants() {
            self.add_violation(violation.at_operation(index));
        }
    }

    /// Check that the tree holds exactly the model's keys, in order.
    pub fn check_contents(&mut self, tree: &BTree<i64, u64>, index: usize) {
        let actual: Vec<i64> = tree.keys().into_iter().copied().collect();
        let expected: Vec<i64> = self.model.keys().copied().collect();

        if actual != expected {
            let first_mismatch = actual
                .iter()
                .zip(&expected)
                .position(|(a, e)| a != e)
                .unwrap_or_else(|| actual.len().min(expected.len()));
            self.add_violation(
                InvariantViolation::new(
                    "in-order keys differ from the model",
                    format!(
                        "tree has {} keys, model has {}, first mismatch at position {first_mismatch}",
                        actual.len(),
                        expected.len()
                    ),
                )
                .at_operation(index),
            );
        }
    }

    fn check_result(
        &mut self,
        operation: &str,
        key: i64,
        actual: Option<u64>,
        expected: Option<u64>,
        index: usize,
    ) {
        if actual != expected {
            self.add_violation(
                InvariantViolation::new(
                    format!("{operation} returned the wrong value"),
                    format!("key {key}: got {actual:?}, expected {expected:?}"),
                )
                .at_operation(index),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agreeing_operations_record_nothing() {
        let mut tree = BTree::new(2).expect("valid degree");
        let mut checker = InvariantChecker::new();

        checker.apply(&mut tree, Operation::Insert { key: 5, value: 1 }, 0);
        checker.apply(&mut tree, Operation::Insert { key: 5, value: 2 }, 1);
        checker.apply(&mut tree, Operation::Get { key: 5 }, 2);
        checker.apply(&mut tree, Operation::Remove { key: 9 }, 3);
        checker.apply(&mut tree, Operation::Remove { key: 5 }, 4);
        checker.check_structure(&tree, 4);
        checker.check_contents(&tree, 4);

        assert!(!checker.has_violations(), "{:?}", checker.violations());
        assert_eq!(checker.expected_len(), 0);
    }

    #[test]
    fn test_divergent_tree_is_reported() {
        let mut tree = BTree::new(2).expect("valid degree");
        let mut checker = InvariantChecker::new();

        checker.apply(&mut tree, Operation::Insert { key: 1, value: 10 }, 0);
        // Mutate the tree behind the model's back.
        tree.insert(2, 20);
        checker.apply(&mut tree, Operation::Get { key: 2 }, 1);
        checker.check_contents(&tree, 1);

        let violations = checker.take_violations();
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].description, "get returned the wrong value");
        assert_eq!(violations[0].operation_index, Some(1));
        assert_eq!(
            violations[1].description,
            "in-order keys differ from the model"
        );
        assert!(!checker.has_violations());
    }
}
