//! Deterministic base token set built from local patterns and ranked documents.
//!
//! Each section prefers a tagged pattern, then the best ranked document, then
//! the fixed defaults. An explicit primary color in the brief always wins.
use designdb_core::tokens::{BaseColors, BaseTokens, FontFamily, Radius, Spacing, Typography};
use designdb_core::traits::{DocumentRanker, PatternStore};
use designdb_core::types::{DesignRequest, Document, Domain, Pattern, PatternData, PatternQuery, SearchResult};
use designdb_core::{Error, Result};
use serde::Serialize;
use tracing::debug;

use crate::color::{is_valid_hex, Rgb};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentRef {
    pub collection: String,
    pub title: String,
    pub score: f64,
}

/// What a recommendation was built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct References {
    pub patterns: Vec<String>,
    pub documents: Vec<DocumentRef>,
}

impl References {
    fn extend(&mut self, other: References) {
        self.patterns.extend(other.patterns);
        self.documents.extend(other.documents);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Foundation {
    pub tokens: BaseTokens,
    pub references: References,
}

struct Pick<T> {
    value: T,
    references: References,
}

/// Normalized `#RRGGBB` or `None` for anything that is not a hex color.
fn hex(value: Option<&str>) -> Option<String> { value.and_then(Rgb::parse).map(Rgb::to_hex) }

fn candidates<P: PatternStore + ?Sized>(patterns: &P, category: &str, tags: &[String]) -> Vec<Pattern> {
    if tags.is_empty() { return Vec::new(); }
    patterns.find(&PatternQuery::category(category).with_tags(tags))
}

fn document_refs(domain: &Domain, title_field: &str, hits: &[SearchResult]) -> Vec<DocumentRef> {
    hits.iter()
        .map(|h| DocumentRef {
            collection: domain.collection(),
            title: h.document.get(title_field).unwrap_or_default().to_string(),
            score: h.score,
        })
        .collect()
}

fn colors_from_document(doc: &Document) -> Option<BaseColors> {
    let primary = hex(doc.get("Primary (Hex)"))?;
    let defaults = BaseColors::default();
    Some(BaseColors {
        primary,
        secondary: hex(doc.get("Secondary (Hex)")).unwrap_or(defaults.secondary),
        accent: hex(doc.get("CTA (Hex)")).unwrap_or(defaults.accent),
        background: hex(doc.get("Background (Hex)")).unwrap_or(defaults.background),
        text: hex(doc.get("Text (Hex)")).unwrap_or(defaults.text),
        border: hex(doc.get("Border (Hex)")).unwrap_or(defaults.border),
        ..defaults
    })
}

fn pick_colors<R, P>(ranker: &R, patterns: &P, request: &DesignRequest, tags: &[String], query: &str, top_k: usize) -> Pick<BaseColors>
where
    R: DocumentRanker + ?Sized,
    P: PatternStore + ?Sized,
{
    let hits = ranker.search_domain(&Domain::Colors, query, top_k);
    let mut references = References { patterns: Vec::new(), documents: document_refs(&Domain::Colors, "Product Type", &hits) };

    let from_pattern = candidates(patterns, "color", tags).into_iter().find_map(|p| match &p.data {
        PatternData::Color(c) if is_valid_hex(&c.primary) => {
            let defaults = BaseColors::default();
            Some((p.id.clone(), BaseColors {
                primary: hex(Some(c.primary.as_str())).unwrap_or_else(|| defaults.primary.clone()),
                secondary: hex(c.secondary.as_deref()).unwrap_or(defaults.secondary.clone()),
                accent: hex(c.accent.as_deref()).unwrap_or(defaults.accent.clone()),
                background: hex(c.background.as_deref()).unwrap_or(defaults.background.clone()),
                text: hex(c.text.as_deref()).unwrap_or(defaults.text.clone()),
                ..defaults
            }))
        }
        _ => None,
    });

    let mut colors = match from_pattern {
        Some((id, colors)) => {
            references.patterns.push(id);
            colors
        }
        None => hits.iter().find_map(|h| colors_from_document(&h.document)).unwrap_or_default(),
    };
    if let Some(primary) = hex(request.primary_color.as_deref()) {
        colors.primary = primary;
    }
    Pick { value: colors, references }
}

fn pick_typography<R, P>(ranker: &R, patterns: &P, tags: &[String], query: &str, top_k: usize) -> Pick<Typography>
where
    R: DocumentRanker + ?Sized,
    P: PatternStore + ?Sized,
{
    let hits = ranker.search_domain(&Domain::Typography, query, top_k);
    let mut references = References { patterns: Vec::new(), documents: document_refs(&Domain::Typography, "Font Pairing Name", &hits) };
    let defaults = Typography::default();

    let from_pattern = candidates(patterns, "typography", tags).into_iter().find_map(|p| match &p.data {
        PatternData::Typography(t) if !t.heading.trim().is_empty() && !t.body.trim().is_empty() => Some((p.id.clone(), Typography {
            font_family: FontFamily {
                heading: t.heading.clone(),
                body: t.body.clone(),
                mono: t.mono.clone().unwrap_or_else(|| defaults.font_family.mono.clone()),
            },
            base_size: t.base_size.clone().unwrap_or_else(|| defaults.base_size.clone()),
            scale_ratio: t.scale_ratio.filter(|r| *r > 1.0).unwrap_or(defaults.scale_ratio),
            ..defaults.clone()
        })),
        _ => None,
    });

    let typography = match from_pattern {
        Some((id, typography)) => {
            references.patterns.push(id);
            typography
        }
        None => hits
            .iter()
            .find_map(|h| {
                let heading = h.document.get("Heading Font").filter(|s| !s.trim().is_empty())?;
                let body = h.document.get("Body Font").filter(|s| !s.trim().is_empty())?;
                Some(Typography {
                    font_family: FontFamily { heading: heading.to_string(), body: body.to_string(), ..FontFamily::default() },
                    ..defaults.clone()
                })
            })
            .unwrap_or(defaults),
    };
    Pick { value: typography, references }
}

fn pick_spacing<P: PatternStore + ?Sized>(patterns: &P, tags: &[String]) -> Pick<(Spacing, Radius)> {
    let mut references = References::default();
    let from_pattern = candidates(patterns, "spacing", tags).into_iter().find_map(|p| match &p.data {
        PatternData::Spacing(s) if s.unit > 0 => {
            let radius = s.radius.as_deref().map(Radius::from_md).unwrap_or_default();
            Some((p.id.clone(), (Spacing::from_unit(s.unit), radius)))
        }
        _ => None,
    });
    let value = match from_pattern {
        Some((id, value)) => {
            references.patterns.push(id);
            value
        }
        None => (Spacing::default(), Radius::default()),
    };
    Pick { value, references }
}

/// Build the base token set for `request`. Fails only when there is nothing
/// local to build from.
pub async fn compute<R, P>(ranker: &R, patterns: &P, request: &DesignRequest, top_k: usize) -> Result<Foundation>
where
    R: DocumentRanker + ?Sized,
    P: PatternStore + ?Sized,
{
    if patterns.is_empty() && ranker.is_empty() {
        return Err(Error::FoundationUnavailable("no patterns and no ranked documents are loaded".into()));
    }
    let tags = request.tags();
    let query = request.query_text();

    let (colors, typography, spacing) = futures::join!(
        async { pick_colors(ranker, patterns, request, &tags, &query, top_k) },
        async { pick_typography(ranker, patterns, &tags, &query, top_k) },
        async { pick_spacing(patterns, &tags) },
    );

    let mut references = colors.references;
    references.extend(typography.references);
    references.extend(spacing.references);
    let (spacing, radius) = spacing.value;
    debug!(patterns = ?references.patterns, documents = references.documents.len(), "foundation computed");

    Ok(Foundation {
        tokens: BaseTokens { colors: colors.value, typography: typography.value, spacing, radius, ..BaseTokens::default() },
        references,
    })
}
