//! Infrastructure layer module
//!
//! Adapters that satisfy the domain ports, plus configuration and logging:
//! - Configuration management (figment)
//! - Logging infrastructure (tracing)
//! - Executor backends (tokio blocking pool, rayon)
//! - External evaluator program

pub mod config;
pub mod evaluators;
pub mod executors;
pub mod logging;
