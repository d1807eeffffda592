use crate::domain::models::{RunReport, TaskKey};

/// Observer of driver progress
///
/// Every method has an empty default so sinks only implement what they show.
pub trait ProgressSink: Send + Sync {
    /// A new order index pass begins
    fn order_started(&self, _m: u32, _lmax: u32) {}

    /// An order index pass ended; `converged` of `rows` needed no new task
    fn order_finished(&self, _m: u32, _converged: usize, _rows: usize) {}

    /// A task was drained with a value
    fn task_completed(&self, _key: TaskKey, _outstanding: usize) {}

    /// The run finished successfully
    fn finished(&self, _report: &RunReport) {}
}

/// Sink that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressSink for NullProgress {}
