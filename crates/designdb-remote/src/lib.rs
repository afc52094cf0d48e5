#![deny(warnings, dead_code, unused_variables, unused_imports)]

pub mod adapter;
pub mod breaker;
pub mod cache;
pub mod error;
pub mod guarded;
pub mod retry;

pub use adapter::{DesignAdapter, HttpDesignAdapter};
pub use breaker::{BreakerConfig, CircuitBreaker, CircuitState};
pub use cache::ResilienceCache;
pub use error::{RemoteError, RemoteResult};
pub use guarded::GuardedAdapter;
pub use retry::RetryPolicy;
