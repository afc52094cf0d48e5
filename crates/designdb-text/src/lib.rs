//! designdb-text
//!
//! Lexical ranking over flat document collections. See `index` for the
//! per-collection statistics, `search` for the BM25-style scorer and the
//! per-domain entry points, and `store` for loading collections.
pub mod builtin;
pub mod index;
pub mod search;
pub mod store;
pub mod tokenize;

pub use index::Collection;
pub use search::{search, RankingEngine, B, K1};
pub use store::DocumentStore;
