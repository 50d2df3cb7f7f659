//! End-to-end tests at the public tree API level.
//!
//! Each test file covers a specific scenario, using deterministic inputs
//! and checking structural invariants along the way.

#![cfg(test)]

mod test_concurrent_access;
mod test_delete_internal;
mod test_delete_rebalance;
mod test_delete_sequences;
mod test_demo_scenario;
mod test_insert_growth;
mod test_insert_upsert;
mod test_random_workloads;
mod test_throughput;
