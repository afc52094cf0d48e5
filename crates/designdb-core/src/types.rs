//! Domain types shared by the ranking engine, pattern store and orchestrator.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// A flat record of named string fields. Field order is the order of the
/// source record and is preserved through serialization.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct Document {
    fields: Vec<(String, String)>,
}

impl Document {
    pub fn new<K, V, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self { fields: fields.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize { self.fields.len() }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }

    /// All field values joined by a single space.
    pub fn joined(&self) -> String {
        self.fields.iter().map(|(_, v)| v.as_str()).collect::<Vec<_>>().join(" ")
    }

    /// Values of the named fields, in the order requested, joined by a single space.
    /// Missing fields are skipped.
    pub fn joined_fields<S: AsRef<str>>(&self, names: &[S]) -> String {
        names.iter().filter_map(|n| self.get(n.as_ref())).collect::<Vec<_>>().join(" ")
    }
}

impl From<Map<String, Value>> for Document {
    fn from(map: Map<String, Value>) -> Self {
        let fields = map
            .into_iter()
            .map(|(k, v)| {
                let v = match v {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (k, v)
            })
            .collect();
        Self { fields }
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// A ranked document. `score` is always positive; higher is better.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub score: f64,
    pub document: Document,
}

/// Named search domains. Each maps to a backing collection and a field set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Styles,
    Colors,
    Typography,
    Guidelines,
    Products,
    Charts,
    /// Stack-specific guidance, e.g. `Stack("react".into())` backed by `stacks/react`.
    Stack(String),
}

impl Domain {
    pub fn collection(&self) -> String {
        match self {
            Self::Styles => "styles".into(),
            Self::Colors => "colors".into(),
            Self::Typography => "typography".into(),
            Self::Guidelines => "guidelines".into(),
            Self::Products => "products".into(),
            Self::Charts => "charts".into(),
            Self::Stack(name) => format!("stacks/{}", name.to_lowercase()),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "styles" | "style" => Some(Self::Styles),
            "colors" | "color" => Some(Self::Colors),
            "typography" => Some(Self::Typography),
            "guidelines" | "ux" => Some(Self::Guidelines),
            "products" | "product" => Some(Self::Products),
            "charts" | "chart" => Some(Self::Charts),
            other => other.strip_prefix("stack:").or_else(|| other.strip_prefix("stacks/")).map(|n| Self::Stack(n.to_string())),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.collection()) }
}

/// A curated, reusable recommendation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    pub id: String,
    pub category: String,
    pub name: String,
    pub data: PatternData,
    pub metadata: PatternMetadata,
}

impl Pattern {
    pub fn tags(&self) -> &[String] { self.data.tags() }
}

/// Category-specific payload. Every variant carries a tag list and a bag of
/// extra attributes for anything the typed fields do not cover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PatternData {
    Color(ColorPattern),
    Typography(TypographyPattern),
    Spacing(SpacingPattern),
    Component(ComponentPattern),
    Generated(GeneratedPattern),
}

impl PatternData {
    pub fn tags(&self) -> &[String] {
        match self {
            Self::Color(p) => &p.tags,
            Self::Typography(p) => &p.tags,
            Self::Spacing(p) => &p.tags,
            Self::Component(p) => &p.tags,
            Self::Generated(p) => &p.tags,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ColorPattern {
    pub primary: String,
    #[serde(default)]
    pub secondary: Option<String>,
    #[serde(default)]
    pub accent: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypographyPattern {
    pub heading: String,
    pub body: String,
    #[serde(default)]
    pub mono: Option<String>,
    #[serde(default)]
    pub base_size: Option<String>,
    #[serde(default)]
    pub scale_ratio: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpacingPattern {
    /// Base grid unit in px.
    pub unit: u32,
    #[serde(default)]
    pub radius: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComponentPattern {
    pub component: String,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

/// A remote adaptation promoted into the store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeneratedPattern {
    pub design_system: Value,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMetadata {
    pub source: String,
    pub version: String,
    pub last_updated: DateTime<Utc>,
}

impl PatternMetadata {
    pub fn now(source: &str) -> Self {
        Self { source: source.to_string(), version: "1.0.0".to_string(), last_updated: Utc::now() }
    }
}

/// Pattern lookup filter. `None` means "no filter" for either field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl PatternQuery {
    pub fn category(category: &str) -> Self { Self { category: Some(category.to_string()), tags: None } }

    pub fn with_tags<S: AsRef<str>>(mut self, tags: &[S]) -> Self {
        self.tags = Some(tags.iter().map(|t| t.as_ref().to_string()).collect());
        self
    }
}

/// A project brief. Serialized camelCase, which is also the remote wire format.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignRequest {
    pub app_type: String,
    pub industry: String,
    #[serde(default)]
    pub brand_mood: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl DesignRequest {
    /// Lowercased mood and industry tags used for pattern lookups.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.brand_mood.iter().map(|m| m.trim().to_lowercase()).filter(|m| !m.is_empty()).collect();
        let industry = self.industry.trim().to_lowercase();
        if !industry.is_empty() && !tags.contains(&industry) { tags.push(industry); }
        tags
    }

    /// Free-text query for the ranking engine built from the whole brief.
    pub fn query_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        parts.extend(self.brand_mood.iter().map(String::as_str));
        parts.push(&self.industry);
        parts.push(&self.app_type);
        parts.into_iter().map(str::trim).filter(|p| !p.is_empty()).collect::<Vec<_>>().join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    #[default]
    Full,
    Quick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A finding from the consistency pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub component: String,
    pub message: String,
    pub auto_fixed: bool,
}

impl Issue {
    pub fn fixed(component: &str, message: impl Into<String>) -> Self {
        Self { severity: Severity::Warning, component: component.to_string(), message: message.into(), auto_fixed: true }
    }
}

/// Which source a merged token value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenSource {
    Foundation,
    Adaptation,
    Derived,
}
