//! Named collections loaded from one or more document sources.
use parking_lot::RwLock;
use std::collections::BTreeMap;

use designdb_core::traits::DocumentSource;
use designdb_core::types::Document;
use tracing::info;

use crate::builtin::BuiltinSource;
use crate::index::Collection;

#[derive(Default)]
pub struct DocumentStore {
    collections: RwLock<BTreeMap<String, Collection>>,
}

impl DocumentStore {
    pub fn new() -> Self { Self::default() }

    /// Store preloaded with the bundled collections.
    pub fn builtin() -> anyhow::Result<Self> {
        let store = Self::new();
        store.load_from(&BuiltinSource)?;
        Ok(store)
    }

    /// Load every collection of `source`. A collection with the same name
    /// replaces the existing one. Returns the number of collections loaded.
    pub fn load_from(&self, source: &dyn DocumentSource) -> anyhow::Result<usize> {
        let loaded = source.load()?;
        let count = loaded.len();
        let mut collections = self.collections.write();
        for (name, documents) in loaded {
            collections.insert(name.clone(), Collection::build(name, documents));
        }
        info!("Document store holds {} collections", collections.len());
        Ok(count)
    }

    pub fn insert(&self, name: &str, documents: Vec<Document>) {
        self.collections.write().insert(name.to_string(), Collection::build(name, documents));
    }

    /// Append to a collection (creating it if needed) and rebuild its statistics.
    pub fn append(&self, name: &str, documents: Vec<Document>) {
        let mut collections = self.collections.write();
        match collections.get_mut(name) {
            Some(c) => c.append(documents),
            None => { collections.insert(name.to_string(), Collection::build(name, documents)); }
        }
    }

    pub fn with_collection<R>(&self, name: &str, f: impl FnOnce(&Collection) -> R) -> Option<R> {
        self.collections.read().get(name).map(f)
    }

    pub fn collection_names(&self) -> Vec<String> { self.collections.read().keys().cloned().collect() }

    pub fn document_count(&self) -> usize { self.collections.read().values().map(Collection::len).sum() }
}
