//! Deterministic Simulation Testing (DST) infrastructure.
//!
//! This module provides tools for testing the tree with:
//! - Reproducible random workloads
//! - A `BTreeMap` reference model
//! - Invariant checking after each operation
//!
//! Given the same seed and configuration, a run is identical.
//!
//! # Usage
//!
//! ```
//! use beetree::simulation::{Simulator, SimulatorConfig};
//!
//! let config = SimulatorConfig::new(12345) // seed
//!     .with_degree(3)
//!     .with_key_space(500);
//!
//! let mut sim = Simulator::new(config).expect("degree 3 is valid");
//! let result = sim.run(1000);
//!
//! assert!(result.invariant_violations.is_empty());
//! ```

mod invariants;
mod simulator;
mod workload;

pub use invariants::InvariantChecker;
pub use simulator::{SimulationResult, Simulator, SimulatorConfig, SimulatorStats};
pub use workload::{Operation, WorkloadConfig, WorkloadGenerator};
