use std::time::Duration;

use async_trait::async_trait;
use designdb_core::config::RemoteSettings;
use designdb_core::types::{DesignRequest, GenerationMode};
use serde_json::Value;
use tracing::debug;

use super::DesignAdapter;
use crate::error::{RemoteError, RemoteResult};

/// POSTs the brief as camelCase JSON and expects `{ "designSystem": {...} }`.
#[derive(Debug, Clone)]
pub struct HttpDesignAdapter {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpDesignAdapter {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> RemoteResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint: endpoint.into(), api_key: None })
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// `None` when no endpoint is configured.
    pub fn from_settings(settings: &RemoteSettings) -> RemoteResult<Option<Self>> {
        let Some(endpoint) = settings.endpoint.as_deref().filter(|e| !e.trim().is_empty()) else { return Ok(None) };
        let adapter = Self::new(endpoint, settings.timeout())?;
        Ok(Some(match &settings.api_key {
            Some(key) => adapter.with_api_key(key.clone()),
            None => adapter,
        }))
    }

    pub fn endpoint(&self) -> &str { &self.endpoint }
}

pub fn request_payload(request: &DesignRequest, mode: GenerationMode) -> RemoteResult<Value> {
    let mut payload = serde_json::to_value(request).map_err(|e| RemoteError::Malformed { status: 0, reason: e.to_string() })?;
    if let Value::Object(map) = &mut payload {
        map.insert("mode".into(), serde_json::to_value(mode).unwrap_or(Value::Null));
    }
    Ok(payload)
}

/// Interpret a response body. Anything but a 2xx carrying a `designSystem`
/// object is a failure.
pub fn parse_response(status: u16, body: &str) -> RemoteResult<Value> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error_message = parsed.as_ref().and_then(|v| v.get("error")).map(|e| match e {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    });

    if !(200..300).contains(&status) {
        return Err(match error_message {
            Some(message) => RemoteError::Remote { status, message },
            None => RemoteError::Status { status, body: body.to_string() },
        });
    }
    if let Some(message) = error_message {
        return Err(RemoteError::Remote { status, message });
    }
    match parsed {
        Some(Value::Object(mut map)) => match map.remove("designSystem") {
            Some(ds @ Value::Object(_)) => Ok(ds),
            Some(_) => Err(RemoteError::Malformed { status, reason: "designSystem is not an object".into() }),
            None => Err(RemoteError::Malformed { status, reason: "missing designSystem".into() }),
        },
        Some(_) => Err(RemoteError::Malformed { status, reason: "response is not an object".into() }),
        None => Err(RemoteError::Malformed { status, reason: "response is not JSON".into() }),
    }
}

#[async_trait]
impl DesignAdapter for HttpDesignAdapter {
    async fn generate(&self, request: &DesignRequest, mode: GenerationMode) -> RemoteResult<Value> {
        let payload = request_payload(request, mode)?;
        let mut req = self.client.post(&self.endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req.send().await.map_err(|e| RemoteError::Network(e.to_string()))?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| RemoteError::Network(e.to_string()))?;
        debug!(endpoint = %self.endpoint, status, bytes = body.len(), "remote generation response");
        parse_response(status, &body)
    }

    fn name(&self) -> &str { "http" }
}
