//! Main simulator harness for deterministic simulation testing.
//!
//! Drives a seeded workload against a `BTree<i64, u64>`, checking results
//! against a reference model and re-validating the tree after every step.

use crate::btree::{BTree, BTreeError, InvariantViolation};

use super::invariants::InvariantChecker;
use super::workload::{Operation, WorkloadConfig, WorkloadGenerator};

/// Configuration for the simulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    /// Minimum degree of the tree under test.
    pub degree: usize,
    /// Workload generation configuration.
    pub workload: WorkloadConfig,
    /// Compare full in-order contents with the model every this many
    /// operations. Structure is checked after every operation regardless.
    pub contents_check_interval: usize,
}

impl SimulatorConfig {
    /// Create a new simulator config with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            degree: 2,
            workload: WorkloadConfig::default(),
            contents_check_interval: 1,
        }
    }

    /// Set the minimum degree.
    #[must_use]
    pub const fn with_degree(mut self, degree: usize) -> Self {
        self.degree = degree;
        self
    }

    /// Set the workload configuration.
    #[must_use]
    pub const fn with_workload(mut self, workload: WorkloadConfig) -> Self {
        self.workload = workload;
        self
    }

    /// Set the key space.
    #[must_use]
    pub const fn with_key_space(mut self, key_space: i64) -> Self {
        self.workload.key_space = key_space;
        self
    }

    /// Set how often full contents are compared.
    #[must_use]
    pub const fn with_contents_check_interval(mut self, interval: usize) -> Self {
        self.contents_check_interval = interval;
        self
    }
}

/// Results from a simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The seed used for this simulation.
    pub seed: u64,
    /// The minimum degree of the tree.
    pub degree: usize,
    /// Number of operations processed.
    pub operations_processed: u64,
    /// Inserts of a key that was not present.
    pub inserts: u64,
    /// Inserts that overwrote an existing key.
    pub updates: u64,
    /// Removes that found their key.
    pub removes: u64,
    /// Removes and lookups of absent keys.
    pub misses: u64,
    /// Live keys at the end of the run.
    pub final_len: usize,
    /// Tree height at the end of the run.
    pub final_height: usize,
    /// Invariant violations detected.
    pub invariant_violations: Vec<InvariantViolation>,
}

impl SimulationResult {
    /// Check if the simulation passed (no invariant violations).
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.invariant_violations.is_empty()
    }
}

/// The main simulator harness.
pub struct Simulator {
    config: SimulatorConfig,
    generator: WorkloadGenerator,
    checker: InvariantChecker,
    tree: BTree<i64, u64>,
    stats: SimulatorStats,
}

impl Simulator {
    /// Create a new simulator with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `BTreeError::InvalidDegree` if the configured degree is
    /// below 2.
    pub fn new(config: SimulatorConfig) -> Result<Self, BTreeError> {
        Ok(Self {
            tree: BTree::new(config.degree)?,
            generator: WorkloadGenerator::with_config(config.seed, config.workload),
            checker: InvariantChecker::new(),
            config,
            stats: SimulatorStats::default(),
        })
    }

    /// Run `operation_count` operations and report what happened.
    ///
    /// The simulator can be run repeatedly; later runs continue from the
    /// tree and workload state left by earlier ones.
    pub fn run(&mut self, operation_count: usize) -> SimulationResult {
        let interval = self.config.contents_check_interval.max(1);

        for _ in 0..operation_count {
            let index = usize::try_from(self.stats.operations_processed).unwrap_or(usize::MAX);
            let operation = self.generator.next_operation();
            self.record(operation);
            self.checker.apply(&mut self.tree, operation, index);
            self.checker.check_structure(&self.tree, index);
            if index % interval == 0 {
                self.checker.check_contents(&self.tree, index);
            }
            self.stats.operations_processed += 1;
        }

        let last = usize::try_from(self.stats.operations_processed).unwrap_or(usize::MAX);
        self.checker.check_contents(&self.tree, last);

        let result = SimulationResult {
            seed: self.config.seed,
            degree: self.config.degree,
            operations_processed: self.stats.operations_processed,
            inserts: self.stats.inserts,
            updates: self.stats.updates,
            removes: self.stats.removes,
            misses: self.stats.misses,
            final_len: self.tree.len(),
            final_height: self.tree.height(),
            invariant_violations: self.checker.take_violations(),
        };

        tracing::info!(
            seed = result.seed,
            degree = result.degree,
            operations = result.operations_processed,
            inserts = result.inserts,
            updates = result.updates,
            removes = result.removes,
            misses = result.misses,
            len = result.final_len,
            height = result.final_height,
            violations = result.invariant_violations.len(),
            "simulation finished"
        );
        result
    }

    /// The tree under test.
    #[must_use]
    pub const fn tree(&self) -> &BTree<i64, u64> {
        &self.tree
    }

    /// Get current statistics.
    #[must_use]
    pub const fn stats(&self) -> SimulatorStats {
        self.stats
    }

    /// Classify an operation by the model's view before it is applied.
    fn record(&mut self, operation: Operation) {
        let present = self.tree.contains_key(&operation.key());
        match operation {
            Operation::Insert { .. } if present => self.stats.updates += 1,
            Operation::Insert { .. } => self.stats.inserts += 1,
            Operation::Remove { .. } if present => self.stats.removes += 1,
            Operation::Remove { .. } | Operation::Get { .. } if !present => self.stats.misses += 1,
            Operation::Remove { .. } | Operation::Get { .. } => {}
        }
    }
}

/// Running counters for a simulator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulatorStats {
    /// Number of operations processed.
    pub operations_processed: u64,
    /// Inserts of new keys.
    pub inserts: u64,
    /// Overwrites of existing keys.
    pub updates: u64,
    /// Successful removes.
    pub removes: u64,
    /// Operations on absent keys.
    pub misses: u64,
}
