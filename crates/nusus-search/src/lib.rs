//! Query expansion, lexical reranking and the two-corpus search engine.

pub mod engine;
pub mod expand;
pub mod rerank;

pub use engine::{Corpora, EngineOptions, SearchEngine, SearchResults, VerseContext};
pub use expand::QueryExpander;
pub use rerank::{boosted_score, Reranker};
