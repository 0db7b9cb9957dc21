// src/poller/policy.rs
// Fixed-interval polling cadence with an attempt cap

use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    interval: Duration,
    max_attempts: u32,
}

impl Default for PollPolicy {
    /// 2s x 30 attempts: a 60 second ceiling
    fn default() -> Self {
        Self::new(Duration::from_secs(2), 30)
    }
}

impl PollPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// `attempt` is zero-based
    pub fn has_next(&self, attempt: u32) -> bool {
        attempt + 1 < self.max_attempts
    }

    pub async fn wait(&self, attempt: u32) {
        tracing::debug!(
            "Polling again in {}ms (attempt {}/{})",
            self.interval.as_millis(),
            attempt + 2,
            self.max_attempts
        );
        sleep(self.interval).await;
    }
}
