use thiserror::Error;

use super::models::task_key::TaskKey;

/// Failure of a single evaluator invocation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Failed to launch evaluator '{program}': {reason}")]
    Spawn { program: String, reason: String },

    #[error("Evaluator exited with status {status}: {stderr}")]
    NonZeroExit { status: String, stderr: String },

    #[error("Evaluator output is not a number: {0:?}")]
    UnparsableOutput(String),

    #[error("Evaluator returned a non-finite value: {0}")]
    NonFinite(f64),

    #[error("Evaluator timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Worker dropped the task without reporting a result")]
    WorkerLost,

    #[error("Evaluation failed: {0}")]
    Failed(String),
}

/// Bookkeeping faults inside the work scheduler
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("Task {0} is already outstanding")]
    DuplicateKey(TaskKey),
}

/// Result matrix faults
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    #[error("Cell [{row}][{order}] is outside the {rows}x{orders} matrix")]
    OutOfBounds {
        row: usize,
        order: usize,
        rows: usize,
        orders: usize,
    },

    #[error("Cell [{row}][{order}] was already written")]
    AlreadyWritten { row: usize, order: usize },

    #[error("Frequency {0} does not belong to any quadrature node")]
    UnknownFrequency(f64),
}

/// Errors that abort a driver run
#[derive(Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error("Evaluation of {key} failed after {attempts} attempt(s): {source}")]
    Evaluation {
        key: TaskKey,
        attempts: u32,
        #[source]
        source: EvalError,
    },
}
