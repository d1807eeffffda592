//! Common test utilities for integration tests
//!
//! Stub evaluators, a manually driven executor and config fixtures shared
//! across the integration test files.

#![allow(dead_code)]

use std::sync::Mutex;

use casimir_sweep::domain::models::{Config, PacingConfig};
use casimir_sweep::domain::ports::{Completion, EvalRequest, Executor, Job};
use casimir_sweep::EvalError;

/// Terms -(m+1) up to order 3, zero beyond; every row converges at order 4
pub fn decaying_stub(request: &EvalRequest) -> Result<f64, EvalError> {
    if request.m <= 3 {
        Ok(-f64::from(request.m + 1))
    } else {
        Ok(0.0)
    }
}

/// Row sum produced by [`decaying_stub`]: -1/2 - 2 - 3 - 4
pub const DECAYING_STUB_SUM: f64 = -9.5;

/// Small, fast config: few nodes, 1ms pacing, everything drained at the end
pub fn test_config(nodes: usize, pool_size: usize) -> Config {
    Config {
        nodes,
        pool_size,
        final_residue: Some(0),
        pacing: PacingConfig {
            idle_ms: 1,
            max_idle_ms: 1,
            multiplier: 1.0,
        },
        ..Config::default()
    }
}

/// Executor that parks jobs until the test runs them
#[derive(Default)]
pub struct ManualExecutor {
    parked: Mutex<Vec<(Job, Completion)>>,
}

impl ManualExecutor {
    /// Runs the parked job at `index`, if there is one
    pub fn run_one(&self, index: usize) -> bool {
        let entry = {
            let mut parked = self.parked.lock().unwrap();
            if parked.is_empty() {
                return false;
            }
            let index = index % parked.len();
            parked.swap_remove(index)
        };
        let (job, completion) = entry;
        completion.complete(job());
        true
    }

    pub fn run_all(&self) {
        while self.run_one(0) {}
    }

    pub fn parked(&self) -> usize {
        self.parked.lock().unwrap().len()
    }
}

impl Executor for ManualExecutor {
    fn spawn(&self, job: Job, completion: Completion) {
        self.parked.lock().unwrap().push((job, completion));
    }

    fn capacity(&self) -> usize {
        usize::MAX
    }
}

/// Initializes a test-writer subscriber once per test binary
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
