//! Executor backends for the evaluation pool

pub mod blocking;
pub mod rayon_pool;

pub use blocking::BlockingExecutor;
pub use rayon_pool::RayonExecutor;

// Panicking evaluations surface as `EvalError::WorkerLost` only when they unwind
#[cfg(panic = "abort")]
compile_error!("the executor backends need panic = \"unwind\" to report lost workers");

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::domain::models::ExecutorBackend;
use crate::domain::ports::Executor;

/// Builds the configured backend with `pool_size` workers
pub fn build_executor(backend: ExecutorBackend, pool_size: usize) -> Result<Arc<dyn Executor>> {
    let executor: Arc<dyn Executor> = match backend {
        ExecutorBackend::Blocking => Arc::new(BlockingExecutor::new(pool_size)),
        ExecutorBackend::Rayon => Arc::new(
            RayonExecutor::new(pool_size).context("Failed to build the rayon thread pool")?,
        ),
    };
    Ok(executor)
}
