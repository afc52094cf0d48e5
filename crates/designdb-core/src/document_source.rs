//! Directory-backed document source.
//!
//! Every `*.json` file under the root is one collection holding an array of
//! flat objects. The collection name is the path relative to the root without
//! extension, with `/` separators (`stacks/react.json` -> `stacks/react`).
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::traits::DocumentSource;
use crate::types::Document;

pub struct JsonDirectorySource {
    root: PathBuf,
}

impl JsonDirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    pub fn root(&self) -> &Path { &self.root }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
        }
    }

    fn collection_name(&self, file_path: &Path) -> String {
        let relative_path = file_path.strip_prefix(&self.root).unwrap_or(file_path);
        let stem = relative_path.with_extension("");
        stem.components().map(|c| c.as_os_str().to_string_lossy().to_string()).collect::<Vec<_>>().join("/")
    }

    fn list_json_files(&self) -> Vec<PathBuf> {
        let mut json_files = Vec::new();
        for entry in walkdir::WalkDir::new(&self.root).into_iter().filter_map(|e| e.ok()).filter(|e| e.file_type().is_file()) {
            let path = entry.path(); if path.extension().and_then(|s| s.to_str()) == Some("json") { json_files.push(path.to_path_buf()); }
        }
        json_files.sort(); json_files
    }
}

impl DocumentSource for JsonDirectorySource {
    fn load(&self) -> Result<Vec<(String, Vec<Document>)>> {
        if !self.root.is_dir() {
            anyhow::bail!("document directory {} does not exist", self.root.display());
        }
        let files = self.list_json_files();
        let mut collections = Vec::with_capacity(files.len());
        for file_path in &files {
            let content = self.read_file_content(file_path)?;
            let documents: Vec<Document> = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse collection {}", file_path.display()))?;
            let name = self.collection_name(file_path);
            debug!(collection = %name, documents = documents.len(), "loaded collection");
            collections.push((name, documents));
        }
        info!("Loaded {} collections from {}", collections.len(), self.root.display());
        Ok(collections)
    }
}
