//! Exponential reconnect backoff.

use std::time::Duration;

/// Doubling delay between `initial` and `max`.
#[derive(Debug, Clone)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    attempt: u32,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max: max.max(initial),
            attempt: 0,
        }
    }

    /// Delay before the next attempt. Each call doubles the delay until it
    /// reaches `max`.
    pub fn next_delay(&mut self) -> Duration {
        let factor = 1u32.checked_shl(self.attempt).unwrap_or(u32::MAX);
        let delay = self.initial.saturating_mul(factor).min(self.max);
        self.attempt = self.attempt.saturating_add(1);
        delay
    }

    /// Starts over from `initial` after a successful attempt.
    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Consecutive failed attempts since the last reset.
    pub fn attempts(&self) -> u32 {
        self.attempt
    }
}
