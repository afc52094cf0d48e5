use std::future::Future;
use std::time::Duration;

use designdb_core::config::RetrySettings;
use tracing::debug;

use crate::error::RemoteResult;

/// Retries transient failures with a doubling backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self { Self { retries: 2, initial_delay: Duration::from_millis(1500) } }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(s: &RetrySettings) -> Self { Self { retries: s.retries, initial_delay: s.initial_delay() } }
}

impl RetryPolicy {
    pub fn new(retries: u32, initial_delay: Duration) -> Self { Self { retries, initial_delay } }

    /// Call `f` until it succeeds, fails with a non-retryable error, or the
    /// retry budget runs out. At most `retries + 1` attempts.
    pub async fn run<F, Fut, T>(&self, mut f: F) -> RemoteResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RemoteResult<T>>,
    {
        let mut remaining = self.retries;
        let mut delay = self.initial_delay;
        loop {
            match f().await {
                Ok(v) => return Ok(v),
                Err(e) if remaining > 0 && e.is_retryable() => {
                    debug!(remaining, ?delay, "retrying after error: {}", e);
                    tokio::time::sleep(delay).await;
                    remaining -= 1;
                    delay = delay.saturating_mul(2);
                }
                Err(e) => return Err(e),
            }
        }
    }
}
