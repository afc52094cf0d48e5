use crate::types::{Document, Domain, Pattern, PatternQuery, SearchResult};

/// Opaque loader for named document collections.
pub trait DocumentSource: Send + Sync {
    /// Returns `(collection name, documents)` pairs in a stable order.
    fn load(&self) -> anyhow::Result<Vec<(String, Vec<Document>)>>;
}

pub trait DocumentRanker: Send + Sync {
    fn search_domain(&self, domain: &Domain, query: &str, top_k: usize) -> Vec<SearchResult>;
    /// True when no collection holds any document.
    fn is_empty(&self) -> bool;
}

pub trait PatternStore: Send + Sync {
    fn find(&self, query: &PatternQuery) -> Vec<Pattern>;
    fn get_by_id(&self, id: &str) -> Option<Pattern>;
    fn save(&self, pattern: Pattern) -> crate::Result<()>;
    fn is_empty(&self) -> bool;
}
