use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;
use tracing::{error, warn};

use crate::domain::error::EvalError;
use crate::domain::ports::{Completion, Executor, Job};

/// Runs jobs on tokio's blocking thread pool, at most `pool_size` at a time
///
/// Must be used from inside a tokio runtime; a job spawned outside one is
/// reported back as a lost worker.
#[derive(Debug, Clone)]
pub struct BlockingExecutor {
    permits: Arc<Semaphore>,
    pool_size: usize,
}

impl BlockingExecutor {
    pub fn new(pool_size: usize) -> Self {
        let pool_size = pool_size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(pool_size)),
            pool_size,
        }
    }
}

impl Executor for BlockingExecutor {
    fn spawn(&self, job: Job, completion: Completion) {
        let Ok(handle) = Handle::try_current() else {
            error!("blocking executor used outside a tokio runtime");
            return;
        };

        let permits = Arc::clone(&self.permits);
        handle.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };

            match tokio::task::spawn_blocking(job).await {
                Ok(outcome) => completion.complete(outcome),
                Err(join_error) => {
                    warn!(error = %join_error, "evaluation worker panicked");
                    completion.complete(Err(EvalError::WorkerLost));
                }
            }
        });
    }

    fn capacity(&self) -> usize {
        self.pool_size
    }
}
