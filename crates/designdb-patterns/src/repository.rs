//! In-memory pattern registry keyed by category.
//!
//! Buckets are kept in creation order and patterns in registration order, so
//! every lookup is deterministic. Nothing is ever removed.
use parking_lot::RwLock;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use designdb_core::traits::PatternStore;
use designdb_core::types::{Pattern, PatternQuery};
use designdb_core::{Error, Result};

#[derive(Default)]
pub struct PatternRepository {
    buckets: RwLock<Vec<(String, Vec<Pattern>)>>,
    /// Patterns added through `save`, mirrored to `persist_path` when set.
    saved: RwLock<Vec<Pattern>>,
    persist_path: Option<PathBuf>,
}

impl PatternRepository {
    pub fn new() -> Self { Self::default() }

    /// Repository holding the bundled static patterns.
    pub fn with_builtin() -> Self {
        let repo = Self::new();
        repo.register(crate::builtin_patterns());
        repo
    }

    /// Persist saved patterns to `path` and restore any saved by a previous run.
    pub fn with_persistence(mut self, path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let restored: Vec<Pattern> = if content.trim().is_empty() { Vec::new() } else { serde_json::from_str(&content)? };
            info!("Restored {} saved patterns from {}", restored.len(), path.display());
            self.register(restored.clone());
            self.saved.write().extend(restored);
        }
        self.persist_path = Some(path);
        Ok(self)
    }

    /// Append patterns into their category buckets. Ids are not deduplicated.
    pub fn register(&self, patterns: Vec<Pattern>) {
        let mut buckets = self.buckets.write();
        for pattern in patterns {
            match buckets.iter_mut().find(|(category, _)| *category == pattern.category) {
                Some((_, bucket)) => bucket.push(pattern),
                None => buckets.push((pattern.category.clone(), vec![pattern])),
            }
        }
    }

    pub fn find(&self, query: &PatternQuery) -> Vec<Pattern> {
        let buckets = self.buckets.read();
        let candidates = buckets
            .iter()
            .filter(|(category, _)| query.category.as_ref().map_or(true, |c| c == category))
            .flat_map(|(_, bucket)| bucket.iter());
        let found: Vec<Pattern> = match query.tags.as_deref() {
            Some(tags) if !tags.is_empty() => candidates
                .filter(|p| p.tags().iter().any(|t| tags.iter().any(|q| q.eq_ignore_ascii_case(t))))
                .cloned()
                .collect(),
            _ => candidates.cloned().collect(),
        };
        debug!(category = ?query.category, tags = ?query.tags, found = found.len(), "pattern lookup");
        found
    }

    /// First pattern with this id across all buckets.
    pub fn get_by_id(&self, id: &str) -> Option<Pattern> {
        self.buckets.read().iter().flat_map(|(_, bucket)| bucket.iter()).find(|p| p.id == id).cloned()
    }

    /// Append a newly promoted pattern. The in-memory append always happens;
    /// a persistence failure is reported afterwards.
    pub fn save(&self, pattern: Pattern) -> Result<()> {
        if pattern.category.trim().is_empty() {
            return Err(Error::Operation(format!("pattern {} has an empty category", pattern.id)));
        }
        self.register(vec![pattern.clone()]);
        let snapshot = {
            let mut saved = self.saved.write();
            saved.push(pattern);
            saved.clone()
        };
        if let Some(path) = &self.persist_path {
            if let Err(e) = write_atomically(path, &snapshot) {
                warn!("Failed to persist patterns to {}: {}", path.display(), e);
                return Err(e);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize { self.buckets.read().iter().map(|(_, b)| b.len()).sum() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn categories(&self) -> Vec<String> { self.buckets.read().iter().map(|(c, _)| c.clone()).collect() }
}

fn write_atomically(path: &Path, patterns: &[Pattern]) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(serde_json::to_string_pretty(patterns)?.as_bytes())?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

impl PatternStore for PatternRepository {
    fn find(&self, query: &PatternQuery) -> Vec<Pattern> { Self::find(self, query) }
    fn get_by_id(&self, id: &str) -> Option<Pattern> { Self::get_by_id(self, id) }
    fn save(&self, pattern: Pattern) -> Result<()> { Self::save(self, pattern) }
    fn is_empty(&self) -> bool { Self::is_empty(self) }
}
