//! Port trait definitions (Hexagonal Architecture)
//!
//! Interfaces that infrastructure adapters implement:
//! - Evaluator: the expensive `logdetD` computation
//! - Executor: bounded pool that runs evaluations
//! - ProgressSink: progress reporting out of the driver loop

pub mod evaluator;
pub mod executor;
pub mod progress;

pub use evaluator::{EvalRequest, Evaluator};
pub use executor::{completion_channel, Completion, Executor, Job, Outcome, TaskHandle, TaskPoll};
pub use progress::{NullProgress, ProgressSink};
