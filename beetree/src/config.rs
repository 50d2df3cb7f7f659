//! Demo driver configuration.
//!
//! Loaded from environment variables.
//!
//! # Environment Variables
//!
//! - `BEETREE_DEGREE`: Minimum degree of the tree (default: `2`, must be between 2 and `usize::MAX / 2`)
//! - `BEETREE_WORKLOAD_OPS`: Operations in the random workload (default: `10000`)
//! - `BEETREE_SEED`: Seed for the random workload (default: `42`)
//!
//! Log filtering is handled separately through `RUST_LOG`.

use std::str::FromStr;

use crate::btree::BTree;

/// Configuration for the demo driver.
///
/// # Post-conditions
///
/// When constructed via `from_env()`, `degree` is always a valid B-tree
/// degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Minimum degree `t` of every tree the driver builds.
    pub degree: usize,
    /// Number of operations in the seeded random workload.
    pub workload_ops: usize,
    /// Seed for the random workload. The same seed replays the same run.
    pub seed: u64,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            degree: Self::DEFAULT_DEGREE,
            workload_ops: Self::DEFAULT_WORKLOAD_OPS,
            seed: Self::DEFAULT_SEED,
        }
    }
}

impl DriverConfig {
    /// Default minimum degree.
    pub const DEFAULT_DEGREE: usize = 2;
    /// Default workload length.
    pub const DEFAULT_WORKLOAD_OPS: usize = 10_000;
    /// Default workload seed.
    pub const DEFAULT_SEED: u64 = 42;

    const DEGREE_VAR: &'static str = "BEETREE_DEGREE";
    const WORKLOAD_OPS_VAR: &'static str = "BEETREE_WORKLOAD_OPS";
    const SEED_VAR: &'static str = "BEETREE_SEED";

    /// Load configuration from environment variables.
    ///
    /// Unset variables fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but does not parse, or if
    /// `BEETREE_DEGREE` is outside the supported degree range.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`DriverConfig::from_env`].
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let degree = load(&lookup, Self::DEGREE_VAR, Self::DEFAULT_DEGREE)?;
        if degree < BTree::<(), ()>::MIN_DEGREE {
            return Err(ConfigError::InvalidValue {
                name: Self::DEGREE_VAR.to_string(),
                message: format!(
                    "{degree} is below the minimum degree of {}",
                    BTree::<(), ()>::MIN_DEGREE
                ),
            });
        }
        if degree > BTree::<(), ()>::MAX_DEGREE {
            return Err(ConfigError::InvalidValue {
                name: Self::DEGREE_VAR.to_string(),
                message: format!(
                    "{degree} is above the maximum degree of {}",
                    BTree::<(), ()>::MAX_DEGREE
                ),
            });
        }

        let workload_ops = load(&lookup, Self::WORKLOAD_OPS_VAR, Self::DEFAULT_WORKLOAD_OPS)?;
        let seed = load(&lookup, Self::SEED_VAR, Self::DEFAULT_SEED)?;

        Ok(Self {
            degree,
            workload_ops,
            seed,
        })
    }
}

/// Parse one variable, falling back to `default` when unset.
fn load<T, F>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("'{value}' is not a valid non-negative integer"),
        }),
        None => Ok(default),
    }
}
