//! Work scheduler: bounded set of in-flight evaluations keyed by (xi, m).

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tracing::{debug, trace};

use crate::domain::error::ScheduleError;
use crate::domain::models::TaskKey;
use crate::domain::ports::{
    completion_channel, EvalRequest, Evaluator, Executor, Outcome, TaskHandle, TaskPoll,
};

/// A task taken out of the scheduler by [`Scheduler::drain`]
#[derive(Debug, PartialEq)]
pub struct DrainedTask {
    pub key: TaskKey,
    pub outcome: Outcome,
}

impl DrainedTask {
    pub const fn xi(&self) -> f64 {
        self.key.xi.value()
    }

    pub const fn m(&self) -> u32 {
        self.key.m
    }
}

/// Owns the outstanding evaluations of a sweep
///
/// The outstanding map never leaves this type: callers can only submit a key,
/// drain finished keys and read the count. This keeps the
/// one-outstanding-task-per-key rule in one place.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use casimir_sweep::domain::ports::EvalRequest;
/// use casimir_sweep::domain::EvalError;
/// use casimir_sweep::infrastructure::executors::BlockingExecutor;
/// use casimir_sweep::services::Scheduler;
///
/// # async fn example() -> anyhow::Result<()> {
/// let evaluator = Arc::new(|req: &EvalRequest| Ok::<_, EvalError>(-f64::from(req.m + 1)));
/// let executor = Arc::new(BlockingExecutor::new(4));
/// let mut scheduler = Scheduler::new(evaluator, executor, 0.05, 160);
///
/// scheduler.submit(1.25, 0)?;
/// while scheduler.outstanding_count() > 0 {
///     scheduler.wait_for_completion(Duration::from_millis(2)).await;
///     for task in scheduler.drain() {
///         println!("{} -> {:?}", task.key, task.outcome);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct Scheduler {
    evaluator: Arc<dyn Evaluator>,
    executor: Arc<dyn Executor>,
    size_ratio: f64,
    lmax: u32,
    pending: HashMap<TaskKey, TaskHandle>,
    notify: Arc<Notify>,
}

impl Scheduler {
    pub fn new(
        evaluator: Arc<dyn Evaluator>,
        executor: Arc<dyn Executor>,
        size_ratio: f64,
        lmax: u32,
    ) -> Self {
        Self {
            evaluator,
            executor,
            size_ratio,
            lmax,
            pending: HashMap::new(),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Starts an asynchronous evaluation for (xi, m)
    pub fn submit(&mut self, xi: f64, m: u32) -> Result<(), ScheduleError> {
        let key = TaskKey::new(xi, m);
        let Entry::Vacant(slot) = self.pending.entry(key) else {
            return Err(ScheduleError::DuplicateKey(key));
        };

        let request = EvalRequest {
            size_ratio: self.size_ratio,
            xi,
            m,
            lmax: self.lmax,
        };
        let evaluator = Arc::clone(&self.evaluator);
        let (completion, handle) = completion_channel(Arc::clone(&self.notify));

        self.executor
            .spawn(Box::new(move || evaluator.log_det_d(&request)), completion);
        slot.insert(handle);

        trace!(%key, outstanding = self.pending.len(), "task submitted");
        Ok(())
    }

    /// Removes and returns every finished task without waiting
    ///
    /// Unfinished tasks stay outstanding. The returned order is unspecified.
    pub fn drain(&mut self) -> Vec<DrainedTask> {
        let mut drained = Vec::new();
        self.pending.retain(|key, handle| match handle.poll() {
            TaskPoll::Pending => true,
            TaskPoll::Ready(outcome) => {
                drained.push(DrainedTask { key: *key, outcome });
                false
            }
        });

        if !drained.is_empty() {
            trace!(
                drained = drained.len(),
                outstanding = self.pending.len(),
                "tasks drained"
            );
        }
        drained
    }

    pub fn outstanding_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_outstanding(&self, key: &TaskKey) -> bool {
        self.pending.contains_key(key)
    }

    /// Waits until some task finished since the last wait, or until `timeout`
    ///
    /// Returns immediately with `false` when nothing is outstanding. Results
    /// are not consumed; call [`Scheduler::drain`] afterwards.
    pub async fn wait_for_completion(&self, timeout: Duration) -> bool {
        if self.pending.is_empty() {
            return false;
        }
        tokio::time::timeout(timeout, self.notify.notified())
            .await
            .is_ok()
    }

    /// Drops every outstanding task and returns how many were dropped
    ///
    /// Running evaluations finish on their worker; their results are discarded.
    pub fn abandon(&mut self) -> usize {
        let abandoned = self.pending.len();
        self.pending.clear();
        if abandoned > 0 {
            debug!(abandoned, "outstanding tasks abandoned");
        }
        abandoned
    }

    pub fn capacity(&self) -> usize {
        self.executor.capacity()
    }
}
