use std::hash::Hasher;
use std::sync::Arc;

use designdb_core::config::Settings;
use designdb_core::tokens::DesignTokens;
use designdb_core::traits::{DocumentRanker, PatternStore};
use designdb_core::types::{DesignRequest, GeneratedPattern, GenerationMode, Issue, Pattern, PatternData, PatternMetadata, TokenSource};
use designdb_core::Result;
use designdb_remote::GuardedAdapter;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use twox_hash::XxHash64;

use crate::consistency::ConsistencyEngine;
use crate::foundation::{self, References};
use crate::merge::{merge, Provenance};

pub const GENERATED_CATEGORY: &str = "generated";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub tokens: DesignTokens,
    pub provenance: Provenance,
    pub issues: Vec<Issue>,
    pub adaptation_applied: bool,
    pub mode: GenerationMode,
    pub references: References,
    /// Id of the pattern this result was promoted to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promoted: Option<String>,
}

/// Local foundation plus an optional remote adaptation, merged and checked.
pub struct HybridOrchestrator<R, P> where R: DocumentRanker, P: PatternStore {
    ranker: Arc<R>,
    patterns: Arc<P>,
    remote: Option<Arc<GuardedAdapter>>,
    consistency: ConsistencyEngine,
    foundation_top_k: usize,
    promote_generated: bool,
}

impl<R, P> HybridOrchestrator<R, P> where R: DocumentRanker, P: PatternStore {
    pub fn new(ranker: Arc<R>, patterns: Arc<P>) -> Self {
        Self { ranker, patterns, remote: None, consistency: ConsistencyEngine::default(), foundation_top_k: 3, promote_generated: false }
    }

    pub fn with_remote(mut self, remote: Arc<GuardedAdapter>) -> Self { self.remote = Some(remote); self }
    pub fn with_promotion(mut self, enabled: bool) -> Self { self.promote_generated = enabled; self }
    pub fn with_foundation_top_k(mut self, k: usize) -> Self { self.foundation_top_k = k.max(1); self }

    pub fn with_settings(self, settings: &Settings) -> Self {
        self.with_foundation_top_k(settings.search.foundation_top_k).with_promotion(settings.orchestrator.promote_generated)
    }

    pub fn remote(&self) -> Option<&Arc<GuardedAdapter>> { self.remote.as_ref() }

    pub async fn recommend(&self, request: &DesignRequest) -> Result<Recommendation> {
        self.recommend_with_mode(request, GenerationMode::Full).await
    }

    /// Foundation and adaptation run concurrently. A missing or failed
    /// adaptation is never an error; the foundation alone is returned.
    pub async fn recommend_with_mode(&self, request: &DesignRequest, mode: GenerationMode) -> Result<Recommendation> {
        let adaptation = async {
            match &self.remote {
                Some(remote) => remote.generate(request, mode).await,
                None => None,
            }
        };
        let base = foundation::compute(self.ranker.as_ref(), self.patterns.as_ref(), request, self.foundation_top_k);
        let (base, adaptation) = tokio::join!(base, adaptation);
        let base = base?;
        let mut recommendation = self.finish(base, adaptation.as_ref(), mode);
        if recommendation.adaptation_applied && self.promote_generated {
            if let Some(adaptation) = &adaptation {
                recommendation.promoted = self.promote(request, mode, adaptation);
            }
        }
        Ok(recommendation)
    }

    /// Local-only result, never touching the remote service.
    pub async fn foundation_only(&self, request: &DesignRequest) -> Result<Recommendation> {
        let base = foundation::compute(self.ranker.as_ref(), self.patterns.as_ref(), request, self.foundation_top_k).await?;
        Ok(self.finish(base, None, GenerationMode::Full))
    }

    fn finish(&self, base: foundation::Foundation, adaptation: Option<&Value>, mode: GenerationMode) -> Recommendation {
        let merged = merge(&base.tokens, adaptation);
        let mut tokens = merged.tokens;
        let mut provenance = merged.provenance;
        let mut issues = self.consistency.check(&mut tokens);
        for issue in issues.iter().filter(|i| i.auto_fixed) {
            if let Some(source) = provenance.get_mut(&issue.component) {
                *source = TokenSource::Derived;
            }
        }
        issues.extend(merged.rejected.iter().map(|path| Issue::fixed(path, "adaptation value does not fit the token schema; foundation value kept")));
        debug!(adaptation = merged.adaptation_applied, issues = issues.len(), "recommendation assembled");
        Recommendation { tokens, provenance, issues, adaptation_applied: merged.adaptation_applied, mode, references: base.references, promoted: None }
    }

    fn promote(&self, request: &DesignRequest, mode: GenerationMode, adaptation: &Value) -> Option<String> {
        let id = generated_id(request, mode);
        if self.patterns.get_by_id(&id).is_some() {
            debug!(%id, "generated pattern already stored");
            return Some(id);
        }
        let pattern = Pattern {
            id: id.clone(),
            category: GENERATED_CATEGORY.to_string(),
            name: format!("{} {}", request.industry.trim(), request.app_type.trim()).trim().to_string(),
            data: PatternData::Generated(GeneratedPattern { design_system: adaptation.clone(), tags: request.tags() }),
            metadata: PatternMetadata::now("generated"),
        };
        match self.patterns.save(pattern) {
            Ok(()) => {
                info!(%id, "promoted generated design system");
                Some(id)
            }
            Err(e) => {
                warn!(%id, "failed to promote generated design system: {}", e);
                None
            }
        }
    }
}

/// `generated-<xxhash64 of the cache key>`, stable for a given brief and mode.
pub fn generated_id(request: &DesignRequest, mode: GenerationMode) -> String {
    let mut hasher = XxHash64::with_seed(0);
    hasher.write(GuardedAdapter::cache_key(request, mode).as_bytes());
    format!("generated-{:016x}", hasher.finish())
}
