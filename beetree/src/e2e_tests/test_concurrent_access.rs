//! Test the lock-guarded tree under concurrent readers and writers.

use crate::shared::SharedBTree;

#[test]
fn test_readers_see_writers_progress() {
    let tree = SharedBTree::new(3).expect("valid degree");
    for key in 0..100_i64 {
        tree.insert(key, key).expect("lock");
    }

    std::thread::scope(|scope| {
        let writer = tree.clone();
        scope.spawn(move || {
            for key in 100..1_100_i64 {
                writer.insert(key, key).expect("lock");
            }
            for key in (0..100_i64).filter(|k| k % 2 == 0) {
                writer.remove(&key).expect("lock");
            }
        });

        for _ in 0..4 {
            let reader = tree.clone();
            scope.spawn(move || {
                for key in (0..100_i64).filter(|k| k % 2 == 1) {
                    assert_eq!(reader.get(&key).expect("lock"), Some(key));
                }
                let len = reader.len().expect("lock");
                assert!((50..=1_100).contains(&len));
            });
        }
    });

    assert_eq!(tree.len().expect("lock"), 1_050);
    assert!(
        tree.with_tree(|t| t.check_invariants().is_ok())
            .expect("lock")
    );
}

#[test]
fn test_disjoint_writers_then_removers() {
    let tree = SharedBTree::new(2).expect("valid degree");

    std::thread::scope(|scope| {
        for worker in 0..4_i64 {
            let tree = tree.clone();
            scope.spawn(move || {
                for i in 0..200 {
                    tree.insert(worker * 1_000 + i, i).expect("lock");
                }
                for i in 0..100 {
                    assert_eq!(tree.remove(&(worker * 1_000 + i)).expect("lock"), Some(i));
                }
            });
        }
    });

    assert_eq!(tree.len().expect("lock"), 400);
    for worker in 0..4_i64 {
        assert!(!tree.contains_key(&(worker * 1_000)).expect("lock"));
        assert!(tree.contains_key(&(worker * 1_000 + 150)).expect("lock"));
    }
}
