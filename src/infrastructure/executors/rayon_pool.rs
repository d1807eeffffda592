use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::warn;

use crate::domain::error::EvalError;
use crate::domain::ports::{Completion, Executor, Job};

/// Runs jobs on a dedicated rayon pool with `pool_size` threads
///
/// Needs no async runtime; completions still wake an async waiter.
pub struct RayonExecutor {
    pool: rayon::ThreadPool,
}

impl RayonExecutor {
    pub fn new(pool_size: usize) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(pool_size.max(1))
            .thread_name(|index| format!("casimir-eval-{index}"))
            .build()?;
        Ok(Self { pool })
    }
}

impl Executor for RayonExecutor {
    fn spawn(&self, job: Job, completion: Completion) {
        self.pool.spawn(move || match catch_unwind(AssertUnwindSafe(job)) {
            Ok(outcome) => completion.complete(outcome),
            Err(_) => {
                warn!("evaluation worker panicked");
                completion.complete(Err(EvalError::WorkerLost));
            }
        });
    }

    fn capacity(&self) -> usize {
        self.pool.current_num_threads()
    }
}
