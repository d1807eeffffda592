mod common;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use casimir_sweep::domain::models::Config;
use casimir_sweep::domain::ports::{EvalRequest, NullProgress};
use casimir_sweep::infrastructure::executors::{BlockingExecutor, RayonExecutor};
use casimir_sweep::services::{run_sweep, run_sweep_on_grid, FrequencyGrid, SweepError};
use casimir_sweep::{DriverError, EvalError};

use common::{decaying_stub, setup_test_logging, test_config, DECAYING_STUB_SUM};

#[tokio::test]
async fn test_decaying_series_terminates_before_lmax() {
    setup_test_logging();
    let config = test_config(6, 3);

    let result = run_sweep(
        &config,
        Arc::new(decaying_stub),
        Arc::new(BlockingExecutor::new(config.pool_size)),
        Arc::new(NullProgress),
    )
    .await
    .unwrap();

    assert!(result.report.converged_early);
    assert!(result.report.max_order < config.lmax - 1);
    assert_eq!(result.report.abandoned, 0);
    assert_eq!(result.sums.len(), 6);
    for (k, sum) in result.sums.iter().enumerate() {
        assert_eq!(sum.k, k);
        assert_eq!(sum.log_det_d, DECAYING_STUB_SUM);
    }
}

#[tokio::test]
async fn test_output_frequencies_are_nodes_times_alpha() {
    let config = test_config(5, 2);
    let grid = FrequencyGrid::gauss_laguerre(config.nodes, config.alpha()).unwrap();

    let result = run_sweep_on_grid(
        &config,
        &grid,
        Arc::new(decaying_stub),
        Arc::new(BlockingExecutor::new(config.pool_size)),
        Arc::new(NullProgress),
    )
    .await
    .unwrap();

    for sum in &result.sums {
        let expected = grid.node(sum.k) * grid.alpha();
        assert_eq!(sum.x, expected);
        assert!((sum.x - grid.node(sum.k)).abs() > 1e-3 * grid.node(sum.k));
    }
}

#[tokio::test]
async fn test_rayon_backend_gives_same_sums() {
    let config = test_config(4, 2);

    let result = run_sweep(
        &config,
        Arc::new(decaying_stub),
        Arc::new(RayonExecutor::new(config.pool_size).unwrap()),
        Arc::new(NullProgress),
    )
    .await
    .unwrap();

    assert!(result
        .sums
        .iter()
        .all(|sum| sum.log_det_d == DECAYING_STUB_SUM));
}

#[tokio::test]
async fn test_default_residue_leaves_at_most_pool_size_abandoned() {
    let config = Config {
        final_residue: None,
        ..test_config(8, 4)
    };

    let result = run_sweep(
        &config,
        Arc::new(decaying_stub),
        Arc::new(BlockingExecutor::new(config.pool_size)),
        Arc::new(NullProgress),
    )
    .await
    .unwrap();

    assert!(result.report.abandoned <= config.pool_size as u64);
    assert_eq!(
        result.report.submitted,
        result.report.completed + result.report.abandoned
    );
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let mut config = test_config(3, 2);
    config.retry.max_retries = 1;

    let failed_once = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&failed_once);
    let evaluator = move |request: &EvalRequest| {
        if request.m == 2 && !flag.swap(true, Ordering::SeqCst) {
            return Err(EvalError::Timeout { timeout_ms: 10 });
        }
        decaying_stub(request)
    };

    let result = run_sweep(
        &config,
        Arc::new(evaluator),
        Arc::new(BlockingExecutor::new(config.pool_size)),
        Arc::new(NullProgress),
    )
    .await
    .unwrap();

    assert!(failed_once.load(Ordering::SeqCst));
    assert_eq!(result.report.retried, 1);
    assert!(result
        .sums
        .iter()
        .all(|sum| sum.log_det_d == DECAYING_STUB_SUM));
}

#[tokio::test]
async fn test_persistent_failure_aborts_with_key() {
    let mut config = test_config(2, 2);
    config.retry.max_retries = 2;

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let evaluator = move |request: &EvalRequest| {
        if request.m == 1 {
            counter.fetch_add(1, Ordering::SeqCst);
            return Err(EvalError::NonZeroExit {
                status: "exit status: 2".to_string(),
                stderr: "singular matrix".to_string(),
            });
        }
        decaying_stub(request)
    };

    let err = run_sweep(
        &config,
        Arc::new(evaluator),
        Arc::new(BlockingExecutor::new(config.pool_size)),
        Arc::new(NullProgress),
    )
    .await
    .unwrap_err();

    match err {
        SweepError::Driver(DriverError::Evaluation { key, attempts, .. }) => {
            assert_eq!(key.m, 1);
            assert_eq!(attempts, 3);
        }
        other => panic!("expected evaluation failure, got {other:?}"),
    }
    assert!(calls.load(Ordering::SeqCst) >= 3);
}

#[tokio::test]
async fn test_positive_terms_run_to_order_bound() {
    let mut config = test_config(2, 2);
    config.lmax = 5;

    let result = run_sweep(
        &config,
        Arc::new(|_: &EvalRequest| Ok::<_, EvalError>(1.0)),
        Arc::new(BlockingExecutor::new(config.pool_size)),
        Arc::new(NullProgress),
    )
    .await
    .unwrap();

    assert!(!result.report.converged_early);
    assert_eq!(result.report.max_order, 4);
    // 0.5 + 1 + 1 + 1 + 1
    assert!(result.sums.iter().all(|sum| sum.log_det_d == 4.5));
}

#[tokio::test]
async fn test_zero_nodes_is_a_quadrature_error() {
    let config = test_config(0, 1);
    let err = run_sweep(
        &config,
        Arc::new(decaying_stub),
        Arc::new(BlockingExecutor::new(1)),
        Arc::new(NullProgress),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SweepError::Quadrature(_)));
}
