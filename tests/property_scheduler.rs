mod common;

use std::collections::HashSet;
use std::sync::Arc;

use casimir_sweep::domain::models::TaskKey;
use casimir_sweep::domain::ports::EvalRequest;
use casimir_sweep::services::Scheduler;
use casimir_sweep::{EvalError, ScheduleError};
use proptest::prelude::*;

use common::ManualExecutor;

const FREQUENCIES: [f64; 3] = [0.125, 1.5, 40.0];

#[derive(Debug, Clone)]
enum Op {
    Submit { row: usize, m: u32 },
    Finish { index: usize },
    Drain,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..FREQUENCIES.len(), 0u32..4).prop_map(|(row, m)| Op::Submit { row, m }),
        (0usize..16).prop_map(|index| Op::Finish { index }),
        Just(Op::Drain),
    ]
}

fn scheduler(executor: &Arc<ManualExecutor>) -> Scheduler {
    let evaluator =
        Arc::new(|req: &EvalRequest| Ok::<_, EvalError>(-req.xi - f64::from(req.m)));
    Scheduler::new(evaluator, executor.clone(), 0.05, 4)
}

proptest! {
    /// Property: a key is never in flight twice
    ///
    /// Submitting a key that is still outstanding is rejected without
    /// spawning work, and the outstanding count always equals the number of
    /// distinct keys submitted but not yet drained.
    #[test]
    fn prop_no_duplicate_outstanding_keys(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let executor = Arc::new(ManualExecutor::default());
        let mut scheduler = scheduler(&executor);
        let mut outstanding: HashSet<TaskKey> = HashSet::new();
        let mut spawned = 0usize;

        for op in ops {
            match op {
                Op::Submit { row, m } => {
                    let xi = FREQUENCIES[row];
                    let key = TaskKey::new(xi, m);
                    let result = scheduler.submit(xi, m);
                    if outstanding.contains(&key) {
                        prop_assert_eq!(result, Err(ScheduleError::DuplicateKey(key)));
                    } else {
                        prop_assert!(result.is_ok());
                        outstanding.insert(key);
                        spawned += 1;
                    }
                }
                Op::Finish { index } => {
                    executor.run_one(index);
                }
                Op::Drain => {
                    for task in scheduler.drain() {
                        prop_assert!(outstanding.remove(&task.key), "drained unknown key {}", task.key);
                        let expected = -task.xi() - f64::from(task.m());
                        prop_assert_eq!(task.outcome, Ok(expected));
                    }
                }
            }

            prop_assert_eq!(scheduler.outstanding_count(), outstanding.len());
            for key in &outstanding {
                prop_assert!(scheduler.is_outstanding(key));
            }
        }

        // Every spawn is either parked, finished and undrained, or drained
        prop_assert!(executor.parked() <= spawned);
    }

    /// Property: draining never loses a finished task
    #[test]
    fn prop_everything_finished_is_drained(
        submits in prop::collection::hash_set((0..FREQUENCIES.len(), 0u32..4), 1..12)
    ) {
        let executor = Arc::new(ManualExecutor::default());
        let mut scheduler = scheduler(&executor);

        for &(row, m) in &submits {
            scheduler.submit(FREQUENCIES[row], m).unwrap();
        }
        executor.run_all();

        let drained = scheduler.drain();
        prop_assert_eq!(drained.len(), submits.len());
        prop_assert_eq!(scheduler.outstanding_count(), 0);
        prop_assert!(scheduler.drain().is_empty());
    }
}
