use std::sync::Arc;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::sync::Notify;

use crate::domain::error::EvalError;

/// Outcome of one evaluation as seen by the scheduler
pub type Outcome = Result<f64, EvalError>;

/// Unit of work handed to an executor
pub type Job = Box<dyn FnOnce() -> Outcome + Send + 'static>;

/// Sending half of a task: delivers the outcome and wakes the scheduler
///
/// Dropping a completion without calling [`Completion::complete`] (a panicking
/// job) still wakes the scheduler, which then observes the task as lost.
pub struct Completion {
    tx: Option<oneshot::Sender<Outcome>>,
    notify: Arc<Notify>,
}

impl Completion {
    pub fn complete(mut self, outcome: Outcome) {
        if let Some(tx) = self.tx.take() {
            // The receiver is gone when the task was abandoned
            let _ = tx.send(outcome);
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.notify.notify_one();
    }
}

/// Result of a non-blocking poll
#[derive(Debug, PartialEq)]
pub enum TaskPoll {
    Pending,
    Ready(Outcome),
}

/// Receiving half of a task, owned by the scheduler
#[derive(Debug)]
pub struct TaskHandle {
    rx: oneshot::Receiver<Outcome>,
}

impl TaskHandle {
    /// Checks for the outcome without waiting
    pub fn poll(&mut self) -> TaskPoll {
        match self.rx.try_recv() {
            Ok(outcome) => TaskPoll::Ready(outcome),
            Err(TryRecvError::Empty) => TaskPoll::Pending,
            Err(TryRecvError::Closed) => TaskPoll::Ready(Err(EvalError::WorkerLost)),
        }
    }
}

/// Creates the two halves of a task that report to `notify`
pub fn completion_channel(notify: Arc<Notify>) -> (Completion, TaskHandle) {
    let (tx, rx) = oneshot::channel();
    (
        Completion {
            tx: Some(tx),
            notify,
        },
        TaskHandle { rx },
    )
}

/// Port for a bounded concurrent executor
///
/// `spawn` must return immediately. The job runs on one of at most
/// `capacity()` workers and its outcome goes to `completion`.
pub trait Executor: Send + Sync {
    fn spawn(&self, job: Job, completion: Completion);

    fn capacity(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_before_and_after_completion() {
        let (completion, mut handle) = completion_channel(Arc::new(Notify::new()));
        assert_eq!(handle.poll(), TaskPoll::Pending);

        completion.complete(Ok(-2.5));
        assert_eq!(handle.poll(), TaskPoll::Ready(Ok(-2.5)));
    }

    #[test]
    fn test_dropped_completion_is_worker_lost() {
        let (completion, mut handle) = completion_channel(Arc::new(Notify::new()));
        drop(completion);
        assert_eq!(handle.poll(), TaskPoll::Ready(Err(EvalError::WorkerLost)));
    }

    #[tokio::test]
    async fn test_completion_wakes_waiter() {
        let notify = Arc::new(Notify::new());
        let (completion, _handle) = completion_channel(Arc::clone(&notify));
        completion.complete(Ok(0.0));

        // The permit is stored, so a later wait returns at once
        tokio::time::timeout(std::time::Duration::from_secs(1), notify.notified())
            .await
            .expect("completion should leave a wake-up permit");
    }
}
