use designdb_core::types::Document;

/// A named, ordered document list plus the statistics the scorer needs.
///
/// Append-only: `append` adds documents and rebuilds the statistics.
#[derive(Debug, Clone, Default)]
pub struct Collection {
	name: String,
	documents: Vec<Document>,
	lowered: Vec<Document>,
	lengths: Vec<usize>,
	avg_length: f64,
}

impl Collection {
	pub fn build(name: impl Into<String>, documents: Vec<Document>) -> Self {
		let mut collection = Self { name: name.into(), documents, ..Self::default() };
		collection.rebuild();
		collection
	}

	pub fn append(&mut self, documents: Vec<Document>) {
		self.documents.extend(documents);
		self.rebuild();
	}

	fn rebuild(&mut self) {
		self.lowered = self.documents.iter().map(|d| Document::new(d.fields().map(|(k, v)| (k, v.to_lowercase())))).collect();
		// length is the character count of all values joined by a single space
		self.lengths = self.documents.iter().map(|d| d.joined().chars().count()).collect();
		self.avg_length = if self.lengths.is_empty() { 0.0 } else { self.lengths.iter().sum::<usize>() as f64 / self.lengths.len() as f64 };
	}

	pub fn name(&self) -> &str { &self.name }
	pub fn documents(&self) -> &[Document] { &self.documents }
	pub fn len(&self) -> usize { self.documents.len() }
	pub fn is_empty(&self) -> bool { self.documents.is_empty() }
	pub fn length(&self, i: usize) -> usize { self.lengths.get(i).copied().unwrap_or(0) }
	pub fn avg_length(&self) -> f64 { self.avg_length }

	/// Lowercased copy of document `i`, used for case-insensitive matching.
	pub(crate) fn lowered(&self, i: usize) -> Option<&Document> { self.lowered.get(i) }

	/// Number of documents in which any field contains `term` (lowercased).
	pub fn document_frequency(&self, term: &str) -> usize {
		self.lowered.iter().filter(|d| d.fields().any(|(_, v)| v.contains(term))).count()
	}
}
