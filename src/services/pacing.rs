use backoff::backoff::Backoff;
use backoff::{ExponentialBackoff, ExponentialBackoffBuilder};
use std::time::Duration;

use crate::domain::models::PacingConfig;

/// Idle delay between drain attempts
///
/// Grows from `idle_ms` by `multiplier` after each poll that drained nothing,
/// is capped at `max_idle_ms`, and drops back to `idle_ms` after a productive
/// poll. With the default multiplier of 1 it is a fixed interval.
pub struct PollPacing {
    backoff: ExponentialBackoff,
    max_idle: Duration,
}

impl PollPacing {
    pub fn new(config: &PacingConfig) -> Self {
        let initial = Duration::from_millis(config.idle_ms);
        let max_idle = Duration::from_millis(config.max_idle_ms.max(config.idle_ms));
        let backoff = ExponentialBackoffBuilder::new()
            .with_initial_interval(initial)
            .with_multiplier(config.multiplier)
            .with_randomization_factor(0.0)
            .with_max_interval(max_idle)
            .with_max_elapsed_time(None)
            .build();

        Self { backoff, max_idle }
    }

    /// Delay before the next poll
    pub fn next_wait(&mut self) -> Duration {
        self.backoff.next_backoff().unwrap_or(self.max_idle)
    }

    /// Records whether the last poll made progress
    pub fn observe(&mut self, progressed: bool) {
        if progressed {
            self.backoff.reset();
        }
    }
}
