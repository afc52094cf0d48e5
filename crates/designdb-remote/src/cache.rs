//! Bounded TTL cache for remote results.
//!
//! Entries expire `ttl` after insertion. At capacity the oldest inserted entry
//! is evicted; reads never refresh an entry and overwrites keep their place.
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use designdb_core::config::CacheSettings;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::time::Instant;
use tracing::{debug, warn};

pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);
pub const DEFAULT_MAX_SIZE: usize = 100;

#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub created_at: Instant,
    pub expires_at: Instant,
}

impl<T> CacheEntry<T> {
    pub fn is_valid(&self, now: Instant) -> bool { now <= self.expires_at }
}

struct Inner<T> {
    entries: HashMap<String, CacheEntry<T>>,
    order: VecDeque<String>,
}

pub struct ResilienceCache<T> {
    inner: Mutex<Inner<T>>,
    ttl: Duration,
    max_size: usize,
}

impl<T: Clone> ResilienceCache<T> {
    pub fn new(ttl: Duration, max_size: usize) -> Self {
        Self { inner: Mutex::new(Inner { entries: HashMap::new(), order: VecDeque::new() }), ttl, max_size: max_size.max(1) }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self { Self::new(settings.ttl(), settings.max_size) }

    /// Canonical JSON of `input` with object keys sorted at every level.
    /// Returns an empty key when `input` cannot be serialized.
    pub fn key<K: Serialize + ?Sized>(input: &K) -> String {
        match serde_json::to_value(input) {
            Ok(v) => canonical(&v).to_string(),
            Err(e) => {
                warn!("Cache key serialization failed, result will not be cached: {}", e);
                String::new()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<T> {
        if key.is_empty() { return None; }
        let mut inner = self.inner.lock();
        let now = Instant::now();
        match inner.entries.get(key) {
            Some(entry) if entry.is_valid(now) => {
                debug!(key_len = key.len(), "cache hit");
                Some(entry.value.clone())
            }
            Some(_) => {
                inner.entries.remove(key);
                inner.order.retain(|k| k != key);
                debug!(key_len = key.len(), "cache entry expired");
                None
            }
            None => {
                debug!(key_len = key.len(), "cache miss");
                None
            }
        }
    }

    pub fn set(&self, key: &str, value: T) {
        if key.is_empty() { return; }
        let mut inner = self.inner.lock();
        if !inner.entries.contains_key(key) && inner.entries.len() >= self.max_size {
            if let Some(oldest) = inner.order.pop_front() {
                inner.entries.remove(&oldest);
                debug!("cache full, evicted oldest entry");
            }
        }
        let created_at = Instant::now();
        let entry = CacheEntry { value, created_at, expires_at: created_at + self.ttl };
        // an overwrite keeps the key's original place in the eviction order
        if inner.entries.insert(key.to_string(), entry).is_none() {
            inner.order.push_back(key.to_string());
        }
    }

    pub fn len(&self) -> usize { self.inner.lock().entries.len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }
}

impl<T: Clone> Default for ResilienceCache<T> {
    fn default() -> Self { Self::new(DEFAULT_TTL, DEFAULT_MAX_SIZE) }
}

fn canonical(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for k in keys {
                sorted.insert(k.clone(), canonical(&map[k]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonical).collect()),
        other => other.clone(),
    }
}
