//! Workload generator for deterministic simulation testing.
//!
//! Produces random but reproducible sequences of tree operations. Keys are
//! drawn from a bounded, signed key space so that inserts collide with
//! existing keys and removes often hit.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Configuration for workload generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkloadConfig {
    /// Probability that an operation is an insert (0.0 - 1.0).
    pub insert_rate: f64,
    /// Probability that an operation is a remove (0.0 - 1.0).
    /// Whatever is left after inserts and removes becomes lookups.
    pub remove_rate: f64,
    /// Keys are drawn from `-key_space..key_space`.
    pub key_space: i64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            insert_rate: 0.5,
            remove_rate: 0.35,
            key_space: 1_000,
        }
    }
}

/// A single operation against the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert { key: i64, value: u64 },
    Remove { key: i64 },
    Get { key: i64 },
}

impl Operation {
    /// The key this operation targets.
    #[must_use]
    pub const fn key(&self) -> i64 {
        match *self {
            Self::Insert { key, .. } | Self::Remove { key } | Self::Get { key } => key,
        }
    }
}

/// Seeded operation generator.
pub struct WorkloadGenerator {
    rng: StdRng,
    config: WorkloadConfig,
    generated: u64,
}

impl WorkloadGenerator {
    /// Create a generator with the default configuration.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, WorkloadConfig::default())
    }

    /// Create a generator with a custom configuration.
    #[must_use]
    pub fn with_config(seed: u64, config: WorkloadConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            config,
            generated: 0,
        }
    }

    /// Generate the next operation.
    pub fn next_operation(&mut self) -> Operation {
        let span = self.config.key_space.max(1);
        let key = self.rng.random_range(-span..span);
        let roll: f64 = self.rng.random();
        self.generated += 1;

        if roll < self.config.insert_rate {
            // The sequence number makes every written value distinct, so a
            // stale value surviving an overwrite is detectable.
            Operation::Insert {
                key,
                value: self.generated,
            }
        } else if roll < self.config.insert_rate + self.config.remove_rate {
            Operation::Remove { key }
        } else {
            Operation::Get { key }
        }
    }

    /// Generate `count` operations.
    pub fn generate(&mut self, count: usize) -> Vec<Operation> {
        (0..count).map(|_| self.next_operation()).collect()
    }
}
