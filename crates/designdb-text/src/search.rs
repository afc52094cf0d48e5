//! BM25-style scorer and the named search entry points built on it.
use std::cmp::Ordering;
use std::sync::Arc;

use designdb_core::traits::DocumentRanker;
use designdb_core::types::{Domain, SearchResult};
use tracing::debug;

use crate::index::Collection;
use crate::store::DocumentStore;
use crate::tokenize::{containing_words, query_terms};

pub const K1: f64 = 1.2;
pub const B: f64 = 0.75;
pub const DEFAULT_TOP_K: usize = 10;

pub const STYLE_FIELDS: &[&str] = &["Style Category", "Type", "Keywords", "Best For"];
pub const COLOR_FIELDS: &[&str] = &["Product Type", "Keywords", "Notes"];
pub const TYPOGRAPHY_FIELDS: &[&str] = &["Font Pairing Name", "Category", "Mood/Style Keywords", "Best For", "Heading Font", "Body Font"];
pub const GUIDELINE_FIELDS: &[&str] = &["Category", "Issue", "Keywords", "Description"];
pub const PRODUCT_FIELDS: &[&str] = &["Product Type", "Keywords", "Primary Style Recommendation", "Key Considerations"];
pub const CHART_FIELDS: &[&str] = &["Data Type", "Keywords", "Best Chart Type", "Accessibility Notes"];
pub const STACK_FIELDS: &[&str] = &["Category", "Guideline", "Description", "Do", "Don't"];

/// Score every document of `collection` against `query`, restricted to `fields`,
/// and return the best `top_k` with a positive score.
///
/// `idf` uses the whole collection: `N` is the collection size and `n` the
/// number of documents with the term in any field. `tf` is the share of words
/// in the restricted text that contain the term.
pub fn search<S: AsRef<str>>(collection: &Collection, query: &str, fields: &[S], top_k: usize) -> Vec<SearchResult> {
	let terms = query_terms(query);
	if terms.is_empty() || collection.is_empty() || top_k == 0 { return Vec::new(); }

	let n_docs = collection.len() as f64;
	let idfs: Vec<f64> = terms.iter().map(|t| {
		let n = collection.document_frequency(t) as f64;
		((n_docs - n + 0.5) / (n + 0.5) + 1.0).ln()
	}).collect();
	let avg_length = collection.avg_length();

	let mut results = Vec::new();
	for (i, document) in collection.documents().iter().enumerate() {
		let Some(lowered) = collection.lowered(i) else { continue };
		let text = lowered.joined_fields(fields);
		let words: Vec<&str> = text.split_whitespace().collect();
		if words.is_empty() { continue; }
		let length_ratio = if avg_length > 0.0 { collection.length(i) as f64 / avg_length } else { 1.0 };
		let norm = K1 * (1.0 - B + B * length_ratio);

		let mut score = 0.0;
		for (term, idf) in terms.iter().zip(&idfs) {
			let tf = containing_words(&words, term) as f64 / words.len() as f64;
			if tf <= 0.0 { continue; }
			score += idf * (tf * (K1 + 1.0)) / (tf + norm);
		}
		if score > 0.0 { results.push(SearchResult { score, document: document.clone() }); }
	}

	// stable: ties keep collection order
	results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
	results.truncate(top_k);
	results
}

/// Domain-aware front end over a shared `DocumentStore`.
#[derive(Clone)]
pub struct RankingEngine {
	store: Arc<DocumentStore>,
}

impl RankingEngine {
	pub fn new(store: Arc<DocumentStore>) -> Self { Self { store } }

	pub fn store(&self) -> &Arc<DocumentStore> { &self.store }

	/// Search a named collection. Unknown collections yield no results.
	pub fn search<S: AsRef<str>>(&self, collection: &str, query: &str, fields: &[S], top_k: usize) -> Vec<SearchResult> {
		let results = self.store.with_collection(collection, |c| search(c, query, fields, top_k)).unwrap_or_default();
		debug!(collection, query, hits = results.len(), "ranked search");
		results
	}

	pub fn fields_for(domain: &Domain) -> &'static [&'static str] {
		match domain {
			Domain::Styles => STYLE_FIELDS,
			Domain::Colors => COLOR_FIELDS,
			Domain::Typography => TYPOGRAPHY_FIELDS,
			Domain::Guidelines => GUIDELINE_FIELDS,
			Domain::Products => PRODUCT_FIELDS,
			Domain::Charts => CHART_FIELDS,
			Domain::Stack(_) => STACK_FIELDS,
		}
	}

	pub fn search_styles(&self, query: &str, top_k: usize) -> Vec<SearchResult> { self.search_domain(&Domain::Styles, query, top_k) }
	pub fn search_colors(&self, query: &str, top_k: usize) -> Vec<SearchResult> { self.search_domain(&Domain::Colors, query, top_k) }
	pub fn search_typography(&self, query: &str, top_k: usize) -> Vec<SearchResult> { self.search_domain(&Domain::Typography, query, top_k) }
	pub fn search_guidelines(&self, query: &str, top_k: usize) -> Vec<SearchResult> { self.search_domain(&Domain::Guidelines, query, top_k) }
	pub fn search_products(&self, query: &str, top_k: usize) -> Vec<SearchResult> { self.search_domain(&Domain::Products, query, top_k) }
	pub fn search_charts(&self, query: &str, top_k: usize) -> Vec<SearchResult> { self.search_domain(&Domain::Charts, query, top_k) }
	pub fn search_stack(&self, stack: &str, query: &str, top_k: usize) -> Vec<SearchResult> { self.search_domain(&Domain::Stack(stack.to_string()), query, top_k) }
}

impl DocumentRanker for RankingEngine {
	fn search_domain(&self, domain: &Domain, query: &str, top_k: usize) -> Vec<SearchResult> {
		self.search(&domain.collection(), query, Self::fields_for(domain), top_k)
	}

	fn is_empty(&self) -> bool { self.store.document_count() == 0 }
}
