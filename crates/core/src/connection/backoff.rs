//! Linear connect backoff with a ceiling
//!
//! Delays start at `initial`, grow by `step` after every failed attempt, and
//! stay at `max` once reached. There is no attempt limit.

use std::time::Duration;

use erplink_domain::BackoffConfig;

/// Iterator over successive retry delays
#[derive(Debug, Clone)]
pub struct Backoff {
    config: BackoffConfig,
    next_secs: u64,
}

impl Backoff {
    pub fn new(config: BackoffConfig) -> Self {
        Self { next_secs: config.initial_secs.min(config.max_secs), config }
    }

    /// Delay to wait before the next attempt, advancing the schedule
    pub fn next_delay(&mut self) -> Duration {
        let delay = Duration::from_secs(self.next_secs);
        self.next_secs =
            self.next_secs.saturating_add(self.config.step_secs).min(self.config.max_secs);
        delay
    }

    /// Restart the schedule from the initial delay
    pub fn reset(&mut self) {
        self.next_secs = self.config.initial_secs.min(self.config.max_secs);
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        Some(self.next_delay())
    }
}
