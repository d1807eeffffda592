//! Sweep entry point: builds the grid, runs the driver and aggregates.

use std::sync::Arc;
use thiserror::Error;

use crate::domain::error::DriverError;
use crate::domain::models::{Config, SweepResult};
use crate::domain::ports::{Evaluator, Executor, ProgressSink};
use crate::services::aggregator::aggregate;
use crate::services::driver::{Driver, DriverConfig};
use crate::services::quadrature::{FrequencyGrid, QuadratureError};
use crate::services::scheduler::Scheduler;

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Failed to build the frequency grid: {0}")]
    Quadrature(#[from] QuadratureError),

    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Runs a full sweep on the Gauss-Laguerre grid described by `config`
pub async fn run_sweep(
    config: &Config,
    evaluator: Arc<dyn Evaluator>,
    executor: Arc<dyn Executor>,
    progress: Arc<dyn ProgressSink>,
) -> Result<SweepResult, SweepError> {
    let grid = FrequencyGrid::gauss_laguerre(config.nodes, config.alpha())?;
    run_sweep_on_grid(config, &grid, evaluator, executor, progress).await
}

/// Runs a full sweep on an explicit grid
pub async fn run_sweep_on_grid(
    config: &Config,
    grid: &FrequencyGrid,
    evaluator: Arc<dyn Evaluator>,
    executor: Arc<dyn Executor>,
    progress: Arc<dyn ProgressSink>,
) -> Result<SweepResult, SweepError> {
    let scheduler = Scheduler::new(evaluator, executor, config.size_ratio, config.lmax);
    let driver = Driver::new(DriverConfig::from(config), grid, scheduler, progress);
    let output = driver.run().await?;

    Ok(SweepResult {
        sums: aggregate(&output.matrix, grid),
        report: output.report,
    })
}
