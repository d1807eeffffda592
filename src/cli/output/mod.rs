//! Output formatting utilities for the CLI.

pub mod format;
pub mod progress;
pub mod table;

use serde::Serialize;

pub use format::format_g;
pub use progress::{create_progress_bar, SweepProgress};
pub use table::{NodeRow, TableFormatter};

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&result.to_json()).unwrap_or_default()
        );
    } else {
        println!("{}", result.to_human());
    }
}
