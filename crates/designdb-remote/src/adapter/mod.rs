//! Remote generation service seam.
use async_trait::async_trait;
use designdb_core::types::{DesignRequest, GenerationMode};
use serde_json::Value;

use crate::error::RemoteResult;

pub mod http;

pub use http::HttpDesignAdapter;

/// Produces a partial `designSystem` overlay for a brief.
#[async_trait]
pub trait DesignAdapter: Send + Sync {
    async fn generate(&self, request: &DesignRequest, mode: GenerationMode) -> RemoteResult<Value>;

    fn name(&self) -> &str { "remote" }
}
