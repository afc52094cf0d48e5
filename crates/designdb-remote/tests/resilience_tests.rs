use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use designdb_core::types::{DesignRequest, GenerationMode};
use designdb_remote::{
    BreakerConfig, CircuitBreaker, CircuitState, DesignAdapter, GuardedAdapter, RemoteError, RemoteResult, ResilienceCache, RetryPolicy,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::Notify;
use tokio::time::{advance, Instant};

fn unavailable() -> RemoteError { RemoteError::Status { status: 503, body: "unavailable".into() } }

/// Adapter that replays a script of results and then keeps failing.
struct Scripted {
    script: Mutex<VecDeque<RemoteResult<Value>>>,
    calls: AtomicUsize,
}

impl Scripted {
    fn new(script: Vec<RemoteResult<Value>>) -> Arc<Self> { Arc::new(Self { script: Mutex::new(script.into()), calls: AtomicUsize::new(0) }) }
    fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

#[async_trait]
impl DesignAdapter for Scripted {
    async fn generate(&self, _request: &DesignRequest, _mode: GenerationMode) -> RemoteResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script.lock().pop_front().unwrap_or_else(|| Err(unavailable()))
    }
}

fn brief() -> DesignRequest {
    DesignRequest { app_type: "dashboard".into(), industry: "fintech".into(), brand_mood: vec!["calm".into()], ..Default::default() }
}

#[tokio::test(start_paused = true)]
async fn cache_entries_expire_after_ttl() {
    let cache = ResilienceCache::new(Duration::from_secs(3600), 10);
    cache.set("k", 7);
    advance(Duration::from_secs(3600)).await;
    assert_eq!(cache.get("k"), Some(7), "valid while now <= expires_at");
    advance(Duration::from_millis(1)).await;
    assert_eq!(cache.get("k"), None);
    assert!(cache.is_empty(), "expired entry is removed on read");
}

#[tokio::test(start_paused = true)]
async fn cache_evicts_first_inserted_and_reads_do_not_refresh() {
    let cache = ResilienceCache::new(Duration::from_secs(60), 2);
    cache.set("a", 1);
    cache.set("b", 2);
    assert_eq!(cache.get("a"), Some(1));
    cache.set("c", 3);
    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("b"), Some(2));
    assert_eq!(cache.get("c"), Some(3));
    assert_eq!(cache.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn breaker_opens_rejects_then_recovers_through_half_open() {
    let breaker = CircuitBreaker::new("generator", BreakerConfig { failure_threshold: 3, reset_timeout: Duration::from_secs(30) });
    for _ in 0..3 {
        let r: RemoteResult<()> = breaker.call(|| async { Err(unavailable()) }).await;
        assert!(r.is_err());
    }
    assert_eq!(breaker.state(), CircuitState::Open);
    assert_eq!(breaker.failure_count(), 3);

    let invoked = AtomicUsize::new(0);
    let rejected = breaker.call(|| async { invoked.fetch_add(1, Ordering::SeqCst); Ok(()) }).await;
    assert!(matches!(rejected, Err(RemoteError::CircuitOpen(_))));
    assert_eq!(invoked.load(Ordering::SeqCst), 0, "open circuit never calls through");

    advance(Duration::from_secs(30)).await;
    assert!(breaker.call(|| async { Ok(()) }).await.is_err(), "still open at exactly next_attempt_at");

    advance(Duration::from_millis(1)).await;
    let trial = breaker.call(|| async { invoked.fetch_add(1, Ordering::SeqCst); Ok(42) }).await;
    assert_eq!(trial.ok(), Some(42));
    assert_eq!(invoked.load(Ordering::SeqCst), 1);
    assert_eq!(breaker.state(), CircuitState::Closed);
    assert_eq!(breaker.failure_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn failed_trial_reopens_with_fresh_timeout() {
    let breaker = CircuitBreaker::new("quick", BreakerConfig::quick());
    for _ in 0..3 {
        let _ = breaker.call(|| async { Err::<(), _>(unavailable()) }).await;
    }
    advance(Duration::from_secs(6)).await;
    let _ = breaker.call(|| async { Err::<(), _>(unavailable()) }).await;
    assert_eq!(breaker.state(), CircuitState::Open);

    advance(Duration::from_secs(4)).await;
    assert!(matches!(breaker.call(|| async { Ok(()) }).await, Err(RemoteError::CircuitOpen(_))));
    advance(Duration::from_secs(2)).await;
    assert!(breaker.call(|| async { Ok(()) }).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn half_open_admits_a_single_trial() {
    let breaker = CircuitBreaker::new("generator", BreakerConfig { failure_threshold: 1, reset_timeout: Duration::from_secs(1) });
    let _ = breaker.call(|| async { Err::<(), _>(unavailable()) }).await;
    advance(Duration::from_secs(2)).await;

    let release = Notify::new();
    let (trial, concurrent) = tokio::join!(
        breaker.call(|| async {
            release.notified().await;
            Ok::<_, RemoteError>(1)
        }),
        async {
            let r = breaker.call(|| async { Ok::<_, RemoteError>(2) }).await;
            release.notify_one();
            r
        },
    );
    assert_eq!(trial.ok(), Some(1));
    assert!(matches!(concurrent, Err(RemoteError::CircuitOpen(_))));
    assert_eq!(breaker.state(), CircuitState::Closed);
}

#[tokio::test(start_paused = true)]
async fn retry_doubles_backoff_and_stops_on_success() {
    let counter = AtomicUsize::new(0);
    let attempts = &counter;
    let start = Instant::now();
    let result = RetryPolicy::default()
        .run(move || async move {
            match attempts.fetch_add(1, Ordering::SeqCst) {
                0 | 1 => Err(unavailable()),
                _ => Ok("done"),
            }
        })
        .await;
    assert_eq!(result.ok(), Some("done"));
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
    assert!(start.elapsed() >= Duration::from_millis(1500 + 3000));
}

#[tokio::test(start_paused = true)]
async fn retry_skips_client_errors_but_not_rate_limits() {
    let policy = RetryPolicy::new(2, Duration::from_millis(10));

    let counter = AtomicUsize::new(0);
    let attempts = &counter;
    let r: RemoteResult<()> = policy
        .run(move || async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(RemoteError::Status { status: 400, body: "bad".into() })
        })
        .await;
    assert!(r.is_err());
    assert_eq!(attempts.load(Ordering::SeqCst), 1);

    let counter = AtomicUsize::new(0);
    let attempts = &counter;
    let r: RemoteResult<()> = policy
        .run(move || async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(RemoteError::Status { status: 429, body: "slow down".into() })
        })
        .await;
    assert!(matches!(r, Err(RemoteError::Status { status: 429, .. })));
    assert_eq!(attempts.load(Ordering::SeqCst), 3, "budget exhausted after retries + 1 attempts");

    let counter = AtomicUsize::new(0);
    let attempts = &counter;
    let _: RemoteResult<()> = policy
        .run(move || async move {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(RemoteError::CircuitOpen("generator".into()))
        })
        .await;
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[test]
fn error_taxonomy() {
    assert!(RemoteError::Network("reset".into()).is_retryable());
    assert!(RemoteError::Status { status: 502, body: String::new() }.is_retryable());
    assert!(!RemoteError::Malformed { status: 200, reason: "x".into() }.is_retryable());
    assert!(!RemoteError::Remote { status: 422, message: "x".into() }.is_retryable());
    assert_eq!(RemoteError::CircuitOpen("q".into()).status(), None);
}

#[tokio::test(start_paused = true)]
async fn guarded_adapter_caches_success_per_mode() {
    let adapter = Scripted::new(vec![Ok(json!({"colors": {"primary": "#111111"}})), Ok(json!({"colors": {"primary": "#222222"}}))]);
    let guarded = GuardedAdapter::new(adapter.clone());

    let first = guarded.generate(&brief(), GenerationMode::Full).await;
    let again = guarded.generate(&brief(), GenerationMode::Full).await;
    assert_eq!(first, again);
    assert_eq!(adapter.calls(), 1);

    let quick = guarded.generate(&brief(), GenerationMode::Quick).await;
    assert_eq!(quick, Some(json!({"colors": {"primary": "#222222"}})));
    assert_eq!(adapter.calls(), 2);
    assert_ne!(GuardedAdapter::cache_key(&brief(), GenerationMode::Full), GuardedAdapter::cache_key(&brief(), GenerationMode::Quick));
}

#[tokio::test(start_paused = true)]
async fn every_attempt_counts_toward_the_breaker() {
    let adapter = Scripted::new(vec![]);
    let guarded = GuardedAdapter::new(adapter.clone()).with_retry(RetryPolicy::new(2, Duration::from_millis(100)));

    assert_eq!(guarded.generate(&brief(), GenerationMode::Full).await, None);
    assert_eq!(adapter.calls(), 3);
    assert_eq!(guarded.breaker(GenerationMode::Full).state(), CircuitState::Open);
    assert_eq!(guarded.breaker(GenerationMode::Quick).state(), CircuitState::Closed, "breakers never share state");

    let err = guarded.try_generate(&brief(), GenerationMode::Full).await;
    assert!(matches!(err, Err(RemoteError::CircuitOpen(_))));
    assert_eq!(adapter.calls(), 3);
    assert!(guarded.cache().is_empty());
}
