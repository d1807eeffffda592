//! Domain layer for the logdetD sweep
//!
//! Core data model (task keys, result matrix, configuration, run reports),
//! error types and the port traits implemented by infrastructure adapters.

pub mod error;
pub mod models;
pub mod ports;

pub use error::{DriverError, EvalError, MatrixError, ScheduleError};
