pub mod config;
pub mod report;
pub mod result_matrix;
pub mod task_key;

pub use config::{
    Config, EvaluatorConfig, ExecutorBackend, ExecutorConfig, LoggingConfig, PacingConfig,
    RetryConfig,
};
pub use report::{NodeSum, RunReport, SweepResult};
pub use result_matrix::ResultMatrix;
pub use task_key::{Frequency, TaskKey};
