use std::time::Duration;

const DEFAULT_BACKOFF_MS: u64 = 500;

/// Timeout and retry behaviour for service requests.
///
/// The default performs a single attempt with no timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePolicy {
    pub timeout: Option<Duration>,
    pub retries: u32,
    pub backoff: Duration,
}

impl Default for ServicePolicy {
    fn default() -> Self {
        Self {
            timeout: None,
            retries: 0,
            backoff: Duration::from_millis(DEFAULT_BACKOFF_MS),
        }
    }
}

impl ServicePolicy {
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    #[cfg(test)]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Total number of attempts, including the first
    pub fn attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Delay before retry number `retry` (1-based), doubling each time
    pub fn delay_before(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.backoff.saturating_mul(1u32 << exponent)
    }
}
