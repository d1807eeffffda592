//! casimir-sweep - adaptive Matsubara x order sweep of `logdetD`
//!
//! Evaluates `logdetD(xi, m)` for every (Gauss-Laguerre frequency, order index)
//! pair on a bounded worker pool, stops growing each frequency row once its
//! terms have decayed below the requested precision, and reduces every row to
//! an exactly rounded sum.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): task keys, result matrix, configuration and
//!   the `Evaluator`, `Executor` and `ProgressSink` ports
//! - **Service Layer** (`services`): scheduler, convergence test, driver loop,
//!   quadrature and aggregation
//! - **Infrastructure Layer** (`infrastructure`): executor backends, the
//!   external evaluator program, configuration loading and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use casimir_sweep::domain::ports::{EvalRequest, NullProgress};
//! use casimir_sweep::domain::EvalError;
//! use casimir_sweep::infrastructure::executors::BlockingExecutor;
//! use casimir_sweep::{run_sweep, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let evaluator = Arc::new(|req: &EvalRequest| {
//!         Ok::<_, EvalError>(-(-req.xi).exp() / f64::from(req.m + 1).powi(2))
//!     });
//!     let executor = Arc::new(BlockingExecutor::new(config.pool_size));
//!
//!     let result = run_sweep(&config, evaluator, executor, Arc::new(NullProgress)).await?;
//!     for sum in &result.sums {
//!         println!("{} {} {}", sum.k, sum.x, sum.log_det_d);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    Config, ExecutorBackend, LoggingConfig, NodeSum, ResultMatrix, RunReport, SweepResult, TaskKey,
};
pub use domain::ports::{EvalRequest, Evaluator, Executor, ProgressSink};
pub use domain::{DriverError, EvalError, MatrixError, ScheduleError};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{accurate, exact_sum, run_sweep, FrequencyGrid, Scheduler, SweepError};
