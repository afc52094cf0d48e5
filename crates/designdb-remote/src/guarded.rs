//! Remote calls wrapped in cache, retry and circuit breaker.
//!
//! Order from the outside in: a cache hit returns immediately; on a miss the
//! retry policy drives attempts, and every attempt passes through the breaker
//! for the requested generation mode.
use std::sync::Arc;

use designdb_core::config::Settings;
use designdb_core::types::{DesignRequest, GenerationMode};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::adapter::DesignAdapter;
use crate::breaker::{BreakerConfig, CircuitBreaker};
use crate::cache::ResilienceCache;
use crate::error::RemoteResult;
use crate::retry::RetryPolicy;

pub struct GuardedAdapter {
    adapter: Arc<dyn DesignAdapter>,
    cache: Arc<ResilienceCache<Value>>,
    retry: RetryPolicy,
    generator: Arc<CircuitBreaker>,
    quick: Arc<CircuitBreaker>,
}

impl GuardedAdapter {
    pub fn new(adapter: Arc<dyn DesignAdapter>) -> Self {
        Self {
            adapter,
            cache: Arc::new(ResilienceCache::default()),
            retry: RetryPolicy::default(),
            generator: Arc::new(CircuitBreaker::new("generator", BreakerConfig::generator())),
            quick: Arc::new(CircuitBreaker::new("quick", BreakerConfig::quick())),
        }
    }

    pub fn from_settings(adapter: Arc<dyn DesignAdapter>, settings: &Settings) -> Self {
        Self::new(adapter)
            .with_cache(Arc::new(ResilienceCache::from_settings(&settings.cache)))
            .with_retry(RetryPolicy::from(&settings.retry))
            .with_breakers(
                Arc::new(CircuitBreaker::new("generator", BreakerConfig::from(&settings.breakers.generator))),
                Arc::new(CircuitBreaker::new("quick", BreakerConfig::from(&settings.breakers.quick))),
            )
    }

    pub fn with_cache(mut self, cache: Arc<ResilienceCache<Value>>) -> Self { self.cache = cache; self }
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self { self.retry = retry; self }

    pub fn with_breakers(mut self, generator: Arc<CircuitBreaker>, quick: Arc<CircuitBreaker>) -> Self {
        self.generator = generator;
        self.quick = quick;
        self
    }

    pub fn cache(&self) -> &Arc<ResilienceCache<Value>> { &self.cache }

    pub fn breaker(&self, mode: GenerationMode) -> &Arc<CircuitBreaker> {
        match mode {
            GenerationMode::Full => &self.generator,
            GenerationMode::Quick => &self.quick,
        }
    }

    pub fn cache_key(request: &DesignRequest, mode: GenerationMode) -> String {
        ResilienceCache::<Value>::key(&json!({ "request": request, "mode": mode }))
    }

    /// Cached or freshly generated overlay, with the failure surfaced.
    pub async fn try_generate(&self, request: &DesignRequest, mode: GenerationMode) -> RemoteResult<Value> {
        let key = Self::cache_key(request, mode);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }
        let breaker: &CircuitBreaker = self.breaker(mode);
        let adapter: &dyn DesignAdapter = self.adapter.as_ref();
        let value = self.retry.run(move || breaker.call(move || adapter.generate(request, mode))).await?;
        self.cache.set(&key, value.clone());
        Ok(value)
    }

    /// Like `try_generate`, but any failure degrades to `None`.
    pub async fn generate(&self, request: &DesignRequest, mode: GenerationMode) -> Option<Value> {
        match self.try_generate(request, mode).await {
            Ok(v) => Some(v),
            Err(e) if e.is_circuit_open() => {
                debug!(adapter = self.adapter.name(), "skipping adaptation: {}", e);
                None
            }
            Err(e) => {
                warn!(adapter = self.adapter.name(), "adaptation unavailable, using foundation only: {}", e);
                None
            }
        }
    }
}
