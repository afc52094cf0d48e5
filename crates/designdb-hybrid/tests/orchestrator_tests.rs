use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use designdb_core::types::{DesignRequest, GenerationMode, Severity, TokenSource};
use designdb_core::Error;
use designdb_hybrid::derive::derive;
use designdb_hybrid::HybridOrchestrator;
use designdb_patterns::PatternRepository;
use designdb_remote::{CircuitState, DesignAdapter, GuardedAdapter, RemoteError, RemoteResult, RetryPolicy};
use designdb_text::{DocumentStore, RankingEngine};
use serde_json::{json, Value};

/// Answers every call with the same result.
struct Fixed {
    answer: RemoteResult<Value>,
    calls: AtomicUsize,
}

impl Fixed {
    fn ok(v: Value) -> Arc<Self> { Arc::new(Self { answer: Ok(v), calls: AtomicUsize::new(0) }) }
    fn failing() -> Arc<Self> { Arc::new(Self { answer: Err(RemoteError::Status { status: 500, body: "boom".into() }), calls: AtomicUsize::new(0) }) }
    fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

#[async_trait]
impl DesignAdapter for Fixed {
    async fn generate(&self, _request: &DesignRequest, _mode: GenerationMode) -> RemoteResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone()
    }
}

type Orchestrator = HybridOrchestrator<RankingEngine, PatternRepository>;

fn local(repo: Arc<PatternRepository>) -> Orchestrator {
    let ranker = Arc::new(RankingEngine::new(Arc::new(DocumentStore::builtin().expect("builtin"))));
    HybridOrchestrator::new(ranker, repo)
}

fn guarded(adapter: Arc<Fixed>) -> Arc<GuardedAdapter> {
    Arc::new(GuardedAdapter::new(adapter).with_retry(RetryPolicy::new(0, Duration::from_millis(10))))
}

fn fintech() -> DesignRequest {
    DesignRequest {
        app_type: "mobile banking".into(),
        industry: "Fintech".into(),
        brand_mood: vec!["calm".into()],
        primary_color: None,
        description: String::new(),
    }
}

#[tokio::test]
async fn foundation_uses_tagged_patterns_and_ranked_documents() {
    let orchestrator = local(Arc::new(PatternRepository::with_builtin()));
    let rec = orchestrator.foundation_only(&fintech()).await.expect("foundation");

    assert!(!rec.adaptation_applied);
    assert_eq!(rec.tokens.colors.primary, "#1D4ED8");
    assert_eq!(rec.tokens.typography.font_family.heading, "Poppins");
    assert_eq!(rec.tokens.spacing.md, "16px");
    assert_eq!(rec.tokens.radius.md, "6px");
    assert_eq!(rec.references.patterns, vec!["color-trust-blue", "type-modern-pro", "spacing-compact"]);
    assert!(rec.references.documents.iter().any(|d| d.collection == "colors" && d.title == "Fintech"));
    assert_eq!(rec.provenance.get("colors.primary"), Some(&TokenSource::Foundation));
    assert_eq!(rec.provenance.get("states.primary_hover"), Some(&TokenSource::Derived));
}

#[tokio::test]
async fn documents_fill_in_when_no_pattern_matches() {
    let orchestrator = local(Arc::new(PatternRepository::new()));
    let rec = orchestrator.foundation_only(&fintech()).await.expect("foundation");
    assert!(rec.references.patterns.is_empty());
    assert_eq!(rec.references.documents.iter().find(|d| d.collection == "colors").map(|d| d.title.as_str()), Some("Fintech"));
    assert_ne!(rec.tokens.colors.primary, "");
}

#[tokio::test]
async fn explicit_primary_color_wins() {
    let orchestrator = local(Arc::new(PatternRepository::with_builtin()));
    let request = DesignRequest { primary_color: Some("#be185d".into()), ..fintech() };
    let rec = orchestrator.foundation_only(&request).await.expect("foundation");
    assert_eq!(rec.tokens.colors.primary, "#BE185D");
    assert_eq!(rec.tokens.states, derive(&rec.tokens.colors).states);
}

#[tokio::test]
async fn nothing_local_is_a_hard_error() {
    let ranker = Arc::new(RankingEngine::new(Arc::new(DocumentStore::new())));
    let orchestrator = HybridOrchestrator::new(ranker, Arc::new(PatternRepository::new()));
    let err = orchestrator.recommend(&fintech()).await.unwrap_err();
    assert!(matches!(err, Error::FoundationUnavailable(_)));
}

#[tokio::test]
async fn adaptation_overlays_and_derived_states_follow() {
    let adapter = Fixed::ok(json!({
        "colors": {"primary": "#0F766E", "accent": null},
        "radius": null,
        "states": {"primary_hover": "#123456"},
        "notes": "ignored"
    }));
    let orchestrator = local(Arc::new(PatternRepository::with_builtin())).with_remote(guarded(adapter.clone()));
    let base = orchestrator.foundation_only(&fintech()).await.expect("foundation");
    let rec = orchestrator.recommend(&fintech()).await.expect("recommendation");

    assert!(rec.adaptation_applied);
    assert_eq!(rec.tokens.colors.primary, "#0F766E");
    assert_eq!(rec.tokens.colors.accent, base.tokens.colors.accent, "null never clears");
    assert_eq!(rec.tokens.radius, base.tokens.radius);
    assert_eq!(rec.tokens.states.primary_hover, "#123456", "explicit derived value wins");
    assert_eq!(rec.tokens.states.primary_active, derive(&rec.tokens.colors).states.primary_active);

    assert_eq!(rec.provenance.get("colors.primary"), Some(&TokenSource::Adaptation));
    assert_eq!(rec.provenance.get("colors.accent"), Some(&TokenSource::Foundation));
    assert_eq!(rec.provenance.get("states.primary_hover"), Some(&TokenSource::Adaptation));
    assert_eq!(rec.provenance.get("states.primary_active"), Some(&TokenSource::Derived));
    assert_eq!(rec.provenance.get("radius.md"), Some(&TokenSource::Foundation));
    assert!(!rec.provenance.contains_key("notes"));
}

#[tokio::test]
async fn mistyped_adaptation_fields_keep_foundation_values() {
    let adapter = Fixed::ok(json!({"colors": {"primary": "#0F766E"}, "typography": {"line_height": "1.6"}, "spacing": "wide"}));
    let orchestrator = local(Arc::new(PatternRepository::with_builtin())).with_remote(guarded(adapter));
    let base = orchestrator.foundation_only(&fintech()).await.expect("foundation");
    let rec = orchestrator.recommend(&fintech()).await.expect("recommendation");

    assert!(rec.adaptation_applied);
    assert_eq!(rec.tokens.colors.primary, "#0F766E");
    assert_eq!(rec.tokens.typography, base.tokens.typography);
    assert_eq!(rec.tokens.spacing, base.tokens.spacing);
    let rejected: Vec<&str> = rec.issues.iter().map(|i| i.component.as_str()).collect();
    assert!(rejected.contains(&"typography.line_height"), "{rejected:?}");
    assert!(rejected.contains(&"spacing"), "{rejected:?}");
    assert_eq!(rec.provenance.get("typography.line_height"), Some(&TokenSource::Foundation));
}

#[tokio::test]
async fn unmatched_adaptation_is_neither_applied_nor_promoted() {
    let repo = Arc::new(PatternRepository::with_builtin());
    let adapter = Fixed::ok(json!({"palette": {"hero": "#F97316"}, "notes": "bold"}));
    let orchestrator = local(repo.clone()).with_remote(guarded(adapter)).with_promotion(true);
    let base = orchestrator.foundation_only(&fintech()).await.expect("foundation");
    let before = repo.len();

    let rec = orchestrator.recommend(&fintech()).await.expect("recommendation");
    assert!(!rec.adaptation_applied);
    assert_eq!(rec.promoted, None);
    assert_eq!(rec.tokens, base.tokens);
    assert_eq!(repo.len(), before);
}

#[tokio::test]
async fn camel_case_adaptations_are_applied() {
    let adapter = Fixed::ok(json!({"typography": {"fontFamily": {"heading": "Lora"}}}));
    let orchestrator = local(Arc::new(PatternRepository::with_builtin())).with_remote(guarded(adapter));
    let rec = orchestrator.recommend(&fintech()).await.expect("recommendation");
    assert!(rec.adaptation_applied);
    assert_eq!(rec.tokens.typography.font_family.heading, "Lora");
    assert_eq!(rec.provenance.get("typography.font_family.heading"), Some(&TokenSource::Adaptation));
}

#[tokio::test(start_paused = true)]
async fn repeated_failures_open_the_breaker_and_degrade_to_foundation() {
    let adapter = Fixed::failing();
    let remote = guarded(adapter.clone());
    let orchestrator = local(Arc::new(PatternRepository::with_builtin())).with_remote(remote.clone());
    let base = orchestrator.foundation_only(&fintech()).await.expect("foundation");

    for _ in 0..3 {
        let rec = orchestrator.recommend(&fintech()).await.expect("degraded, not failed");
        assert!(!rec.adaptation_applied);
    }
    assert_eq!(remote.breaker(GenerationMode::Full).state(), CircuitState::Open);

    let rec = orchestrator.recommend(&fintech()).await.expect("foundation only");
    assert_eq!(adapter.calls(), 3, "open breaker short-circuits the adapter");
    assert_eq!(rec.tokens, base.tokens);
    assert_eq!(rec.provenance, base.provenance);

    // quick generation keeps its own breaker
    assert_eq!(remote.breaker(GenerationMode::Quick).state(), CircuitState::Closed);
    let _ = orchestrator.recommend_with_mode(&fintech(), GenerationMode::Quick).await.expect("quick");
    assert_eq!(adapter.calls(), 4);
}

#[tokio::test]
async fn consistency_repairs_unsafe_adaptations() {
    let adapter = Fixed::ok(json!({
        "colors": {"primary": "#FDE68A", "text": "#777777", "background": "#FFFFFF", "muted": "grey"},
        "on_colors": {"primary": "#FFFFFF"},
        "typography": {"font_family": {"heading": " "}}
    }));
    let orchestrator = local(Arc::new(PatternRepository::with_builtin())).with_remote(guarded(adapter));
    let rec = orchestrator.recommend(&fintech()).await.expect("recommendation");

    assert_eq!(rec.tokens.on_colors.primary, "#000000");
    assert_eq!(rec.tokens.colors.text, "#000000");
    assert_eq!(rec.tokens.colors.muted, "#94A3B8");
    assert_eq!(rec.tokens.typography.font_family.heading, "Inter");

    let fixed: Vec<&str> = rec.issues.iter().map(|i| i.component.as_str()).collect();
    for component in ["on_colors.primary", "colors.text", "colors.muted", "typography.font_family.heading"] {
        assert!(fixed.contains(&component), "{component} in {fixed:?}");
    }
    assert!(rec.issues.iter().all(|i| i.auto_fixed && i.severity == Severity::Warning));
    assert_eq!(rec.provenance.get("colors.text"), Some(&TokenSource::Derived));
}

#[tokio::test]
async fn successful_adaptations_are_promoted_once() {
    let repo = Arc::new(PatternRepository::with_builtin());
    let adapter = Fixed::ok(json!({"colors": {"accent": "#F97316"}}));
    let orchestrator = local(repo.clone()).with_remote(guarded(adapter)).with_promotion(true);

    let first = orchestrator.recommend(&fintech()).await.expect("recommendation");
    let id = first.promoted.clone().expect("promoted");
    assert!(id.starts_with("generated-"));
    let stored = repo.get_by_id(&id).expect("stored");
    assert_eq!(stored.category, "generated");
    assert_eq!(stored.tags(), ["calm".to_string(), "fintech".to_string()]);

    let before = repo.len();
    let second = orchestrator.recommend(&fintech()).await.expect("recommendation");
    assert_eq!(second.promoted, Some(id));
    assert_eq!(repo.len(), before);
}
