//! Overlay of a remote adaptation onto the foundation token set.
//!
//! The adaptation is applied leaf by leaf. A leaf whose path names no token is
//! ignored; a leaf that would not fit the token schema is rejected and the
//! foundation value at that path stays.
use std::collections::{BTreeMap, BTreeSet};

use designdb_core::tokens::{BaseTokens, DesignTokens};
use designdb_core::types::TokenSource;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::derive::derive;

pub type Provenance = BTreeMap<String, TokenSource>;

/// Dotted paths of every non-object leaf in `value`.
pub fn leaf_paths(value: &Value) -> Vec<String> {
    fn walk(value: &Value, prefix: &str, out: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                for (k, v) in map {
                    let path = if prefix.is_empty() { k.clone() } else { format!("{prefix}.{k}") };
                    walk(v, &path, out);
                }
            }
            _ if !prefix.is_empty() => out.push(prefix.to_string()),
            _ => {}
        }
    }
    let mut out = Vec::new();
    walk(value, "", &mut out);
    out
}

/// Object keys rewritten from camelCase to snake_case at every level.
pub fn snake_case_keys(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (k, v) in map {
                out.insert(to_snake_case(k), snake_case_keys(v));
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

fn to_snake_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() && !out.ends_with('_') { out.push('_'); }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |v, key| v.get(key))
}

fn lookup_mut<'a>(value: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    path.split('.').try_fold(value, |v, key| v.get_mut(key))
}

fn is_derived(path: &str) -> bool {
    DesignTokens::DERIVED_SECTIONS.contains(&path.split('.').next().unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Merged {
    pub tokens: DesignTokens,
    pub provenance: Provenance,
    /// True when at least one adaptation value landed in the token set.
    pub adaptation_applied: bool,
    /// Adaptation paths whose values did not fit the token schema.
    pub rejected: Vec<String>,
}

/// Foundation first, then the adaptation, then derived sections computed from
/// the merged colors. Explicit adaptation values for derived keys win.
pub fn merge(foundation: &BaseTokens, adaptation: Option<&Value>) -> Merged {
    match adaptation {
        Some(overlay) if overlay.is_object() => match overlay_onto(foundation, &snake_case_keys(overlay)) {
            Ok(merged) => return merged,
            Err(e) => warn!("Discarding adaptation, token set could not be rebuilt: {}", e),
        },
        Some(other) => warn!("Discarding adaptation that is not an object: {}", other),
        None => {}
    }
    let tokens = DesignTokens::assemble(foundation.clone(), derive(&foundation.colors));
    Merged { provenance: provenance(&tokens, &BTreeSet::new()), tokens, adaptation_applied: false, rejected: Vec::new() }
}

fn overlay_onto(foundation: &BaseTokens, overlay: &Value) -> serde_json::Result<Merged> {
    let (derived_paths, base_paths): (Vec<String>, Vec<String>) = leaf_paths(overlay).into_iter().partition(|p| is_derived(p));
    let mut rejected = Vec::new();

    let mut base = serde_json::to_value(foundation)?;
    let mut applied = overlay_leaves::<BaseTokens>(&mut base, overlay, &base_paths, &mut rejected);
    let merged_base: BaseTokens = serde_json::from_value(base)?;

    let derived = derive(&merged_base.colors);
    let mut full = serde_json::to_value(DesignTokens::assemble(merged_base, derived))?;
    applied.extend(overlay_leaves::<DesignTokens>(&mut full, overlay, &derived_paths, &mut rejected));
    let tokens: DesignTokens = serde_json::from_value(full)?;

    for path in &rejected {
        warn!(%path, "Ignoring adaptation value that does not fit the token schema");
    }
    let applied: BTreeSet<String> = applied.into_iter().collect();
    if applied.is_empty() {
        warn!("Adaptation matched no token fields");
    }
    Ok(Merged { provenance: provenance(&tokens, &applied), tokens, adaptation_applied: !applied.is_empty(), rejected })
}

/// Copy each non-null leaf of `overlay` named in `paths` into `target`, one at
/// a time. A leaf is kept only if `target` still deserializes as `T`.
fn overlay_leaves<T: DeserializeOwned>(target: &mut Value, overlay: &Value, paths: &[String], rejected: &mut Vec<String>) -> Vec<String> {
    let mut accepted = Vec::new();
    for path in paths {
        let Some(value) = lookup(overlay, path).filter(|v| !v.is_null()) else { continue };
        let Some(slot) = lookup_mut(target, path) else {
            debug!(%path, "adaptation path names no token");
            continue;
        };
        let previous = std::mem::replace(slot, value.clone());
        if serde_json::from_value::<T>(target.clone()).is_ok() {
            accepted.push(path.clone());
        } else {
            if let Some(slot) = lookup_mut(target, path) { *slot = previous; }
            rejected.push(path.clone());
        }
    }
    accepted
}

pub fn provenance(tokens: &DesignTokens, applied: &BTreeSet<String>) -> Provenance {
    let Ok(value) = serde_json::to_value(tokens) else { return Provenance::new() };
    leaf_paths(&value).into_iter().map(|path| {
        let source = if applied.contains(&path) {
            TokenSource::Adaptation
        } else if is_derived(&path) {
            TokenSource::Derived
        } else {
            TokenSource::Foundation
        };
        (path, source)
    }).collect()
}
