//! Three-state circuit breaker.
//!
//! Closed counts consecutive failures and opens at the threshold. Open rejects
//! without calling through until the reset timeout has passed, then lets a
//! single trial call run in HalfOpen. The trial decides between Closed and Open.
use std::future::Future;
use std::time::Duration;

use designdb_core::config::BreakerEntry;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{RemoteError, RemoteResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerConfig {
    pub failure_threshold: u32,
    pub reset_timeout: Duration,
}

impl BreakerConfig {
    pub fn generator() -> Self { Self { failure_threshold: 3, reset_timeout: Duration::from_secs(30) } }

    pub fn quick() -> Self { Self { failure_threshold: 3, reset_timeout: Duration::from_secs(5) } }
}

impl From<&BreakerEntry> for BreakerConfig {
    fn from(e: &BreakerEntry) -> Self { Self { failure_threshold: e.failure_threshold.max(1), reset_timeout: e.reset_timeout() } }
}

#[derive(Debug)]
struct BreakerInner {
    state: CircuitState,
    failure_count: u32,
    next_attempt_at: Option<Instant>,
    trial_in_flight: bool,
}

#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: BreakerConfig,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: BreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(BreakerInner { state: CircuitState::Closed, failure_count: 0, next_attempt_at: None, trial_in_flight: false }),
        }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn config(&self) -> BreakerConfig { self.config }
    pub fn state(&self) -> CircuitState { self.inner.lock().state }
    pub fn failure_count(&self) -> u32 { self.inner.lock().failure_count }

    /// Run `f` through the breaker. When the circuit is open (or a half-open
    /// trial is already running) `f` is not invoked and `CircuitOpen` is returned.
    pub async fn call<F, Fut, T>(&self, f: F) -> RemoteResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = RemoteResult<T>>,
    {
        self.acquire()?;
        let result = f().await;
        match &result {
            Ok(_) => self.on_success(),
            Err(e) => self.on_failure(e),
        }
        result
    }

    fn acquire(&self) -> RemoteResult<()> {
        let mut inner = self.inner.lock();
        match inner.state {
            CircuitState::Closed => Ok(()),
            CircuitState::Open => {
                let now = Instant::now();
                match inner.next_attempt_at {
                    Some(at) if now <= at => {
                        debug!(breaker = %self.name, "rejecting call, circuit open");
                        Err(RemoteError::CircuitOpen(self.name.clone()))
                    }
                    _ => {
                        inner.state = CircuitState::HalfOpen;
                        inner.trial_in_flight = true;
                        info!(breaker = %self.name, "circuit half-open, trying one call");
                        Ok(())
                    }
                }
            }
            CircuitState::HalfOpen if inner.trial_in_flight => Err(RemoteError::CircuitOpen(self.name.clone())),
            CircuitState::HalfOpen => {
                inner.trial_in_flight = true;
                Ok(())
            }
        }
    }

    fn on_success(&self) {
        let mut inner = self.inner.lock();
        if inner.state != CircuitState::Closed {
            info!(breaker = %self.name, "circuit closed");
        }
        inner.state = CircuitState::Closed;
        inner.failure_count = 0;
        inner.next_attempt_at = None;
        inner.trial_in_flight = false;
    }

    fn on_failure(&self, error: &RemoteError) {
        let mut inner = self.inner.lock();
        inner.failure_count = inner.failure_count.saturating_add(1);
        let reopen = match inner.state {
            CircuitState::HalfOpen => true,
            CircuitState::Closed => inner.failure_count >= self.config.failure_threshold,
            CircuitState::Open => false,
        };
        if reopen {
            inner.state = CircuitState::Open;
            inner.next_attempt_at = Some(Instant::now() + self.config.reset_timeout);
            warn!(breaker = %self.name, failures = inner.failure_count, "circuit opened: {}", error);
        }
        inner.trial_in_flight = false;
    }
}
