//! Evaluator adapters

pub mod command;

pub use command::{parse_value, CommandEvaluator};
