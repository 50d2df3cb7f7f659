#![cfg_attr(not(test), deny(clippy::unwrap_used))]

use beetree::btree::BTree;
use beetree::config::DriverConfig;
use beetree::simulation::{Simulator, SimulatorConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Keys the demo inserts, in order.
const DEMO_INSERTS: [i64; 17] = [
    10, 20, 30, 40, 50, 60, 5, 15, 25, 35, 45, 55, 65, 75, 85, 95, 105,
];

/// Keys the demo then removes. The first five pull separators out of
/// internal nodes; the rest drain the right side until the root shrinks.
const DEMO_DELETES: [i64; 10] = [20, 10, 15, 25, 5, 105, 95, 85, 75, 60];

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "beetree=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment variables
    let config = match DriverConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded configuration: degree={}, workload_ops={}, seed={}",
        config.degree,
        config.workload_ops,
        config.seed
    );

    let mut tree: BTree<i64, i64> = match BTree::new(config.degree) {
        Ok(tree) => tree,
        Err(e) => {
            tracing::error!("Failed to create tree: {e}");
            std::process::exit(1);
        }
    };

    for key in DEMO_INSERTS {
        tree.insert(key, key);
    }
    println!("after inserting {} keys:", DEMO_INSERTS.len());
    println!("{}", tree.level_order());

    for key in DEMO_DELETES {
        if tree.remove(&key).is_none() {
            tracing::warn!(key, "demo key was already absent");
        }
    }
    println!("after removing {} keys:", DEMO_DELETES.len());
    println!("{}", tree.level_order());

    if let Err(violation) = tree.check_invariants() {
        tracing::error!("demo tree is invalid: {violation}");
        std::process::exit(1);
    }

    let simulator_config = SimulatorConfig::new(config.seed).with_degree(config.degree);
    let mut simulator = match Simulator::new(simulator_config) {
        Ok(simulator) => simulator,
        Err(e) => {
            tracing::error!("Failed to create simulator: {e}");
            std::process::exit(1);
        }
    };

    let result = simulator.run(config.workload_ops);
    if !result.passed() {
        for violation in &result.invariant_violations {
            tracing::error!("{violation}");
        }
        std::process::exit(1);
    }
}
