//! Progress bar utilities using indicatif for terminal output
//!
//! The sweep bar tracks the order index pass; it draws on stderr so stdout
//! stays clean for results.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

use crate::domain::models::{RunReport, TaskKey};
use crate::domain::ports::ProgressSink;

/// Style template for the sweep bar
const PROGRESS_TEMPLATE: &str =
    "[{elapsed_precise}] {bar:40.cyan/blue} m={pos}/{len} {prefix} {msg} (ETA: {eta})";

/// Progress bar characters for visual effect
const PROGRESS_CHARS: &str = "█▓▒░ ";

/// Create a standard progress bar with ETA calculation
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr());
    let style = ProgressStyle::default_bar()
        .template(PROGRESS_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(PROGRESS_CHARS);
    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Progress sink that drives an indicatif bar over the order index
pub struct SweepProgress {
    bar: ProgressBar,
}

impl SweepProgress {
    pub fn new(lmax: u32) -> Self {
        Self {
            bar: create_progress_bar(u64::from(lmax)),
        }
    }

    /// Sink drawing to a hidden target (for testing)
    pub fn hidden(lmax: u32) -> Self {
        Self {
            bar: ProgressBar::with_draw_target(Some(u64::from(lmax)), ProgressDrawTarget::hidden()),
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

impl ProgressSink for SweepProgress {
    fn order_started(&self, m: u32, _lmax: u32) {
        self.bar.set_position(u64::from(m));
    }

    fn order_finished(&self, _m: u32, converged: usize, rows: usize) {
        self.bar.set_prefix(format!("{converged}/{rows} rows converged"));
    }

    fn task_completed(&self, key: TaskKey, outstanding: usize) {
        self.bar
            .set_message(format!("last {key}, {outstanding} in flight"));
    }

    fn finished(&self, report: &RunReport) {
        self.bar.set_position(u64::from(report.max_order) + 1);
        self.bar.finish_and_clear();
    }
}
