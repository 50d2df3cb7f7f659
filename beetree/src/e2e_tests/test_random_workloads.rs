//! Test seeded random workloads against a reference model.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::btree::BTree;
use crate::simulation::{Simulator, SimulatorConfig, WorkloadConfig};
use crate::testing::{assert_valid, in_order, shuffled, tree_with_keys};

#[test]
fn test_insert_all_then_delete_all_random_order() {
    for degree in [2, 3, 4, 5, 10] {
        let inserts = shuffled(1_000, 1);
        let deletes = shuffled(1_000, 2);
        let mut tree = tree_with_keys(degree, inserts);
        assert_eq!(tree.len(), 1_000);

        for key in deletes {
            assert_eq!(tree.remove(&key), Some(key), "degree {degree}");
        }

        assert!(tree.is_empty(), "degree {degree}");
        assert!(tree.root().is_none());
    }
}

#[test]
fn test_random_delete_checks_every_step() {
    let mut tree = tree_with_keys(3, 1..=100);
    let mut live: Vec<i64> = (1..=100).collect();

    for key in shuffled(100, 31).into_iter().map(|k| k + 1).take(50) {
        tree.remove(&key);
        live.retain(|&k| k != key);
        assert_valid(&tree);
        assert_eq!(in_order(&tree), live);
    }
}

#[test]
fn test_matches_btreemap_model() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut tree: BTree<i64, u64> = BTree::new(4).expect("valid degree");
    let mut model = BTreeMap::new();

    for step in 0..5_000_u64 {
        let key = rng.random_range(-250..250);
        if rng.random_bool(0.6) {
            assert_eq!(tree.insert(key, step), model.insert(key, step));
        } else {
            assert_eq!(tree.remove(&key), model.remove(&key));
        }
        assert_eq!(tree.len(), model.len());
    }

    let expected: Vec<&i64> = model.keys().collect();
    assert_eq!(tree.keys(), expected);
    for (key, value) in &model {
        assert_eq!(tree.get(key), Some(value));
    }
    assert!(tree.check_invariants().is_ok());
}

#[test]
fn test_simulation_across_degrees() {
    for degree in [2, 3, 4, 5, 10] {
        let config = SimulatorConfig::new(42)
            .with_degree(degree)
            .with_key_space(300)
            .with_contents_check_interval(10);
        let mut simulator = Simulator::new(config).expect("valid degree");

        let result = simulator.run(5_000);

        assert!(
            result.passed(),
            "degree {degree}: {:?}",
            result.invariant_violations
        );
    }
}

#[test]
fn test_remove_heavy_simulation_drains_tree() {
    let config = SimulatorConfig::new(8).with_workload(WorkloadConfig {
        insert_rate: 0.2,
        remove_rate: 0.8,
        key_space: 50,
    });
    let mut simulator = Simulator::new(config).expect("valid degree");

    let result = simulator.run(2_000);

    assert!(result.passed(), "{:?}", result.invariant_violations);
    assert!(result.final_len < 50);
}

#[test]
#[ignore] // Long running test
fn test_large_seeded_stress() {
    for seed in 0..20 {
        let config = SimulatorConfig::new(seed)
            .with_degree(2 + usize::try_from(seed % 6).expect("small"))
            .with_key_space(5_000)
            .with_contents_check_interval(500);
        let mut simulator = Simulator::new(config).expect("valid degree");

        let result = simulator.run(50_000);

        assert!(result.passed(), "seed {seed}: {:?}", result.invariant_violations);
    }
}
