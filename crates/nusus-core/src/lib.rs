//! Shared building blocks for the nusus retrieval engine: corpus types,
//! normalization of the raw scripture/narration files, citations,
//! ranking policy, configuration and the encoder seam.

pub mod citation;
pub mod config;
pub mod corpus;
pub mod error;
pub mod policy;
pub mod source;
pub mod traits;
pub mod types;
pub mod verse;

pub use citation::CitationStyle;
pub use corpus::{CorpusNormalizer, RawCorpus};
pub use error::{Error, Result};
pub use policy::{CorpusPolicy, RankingPolicy};
pub use traits::Embedder;
pub use types::{CorpusEntry, CorpusKind, CorpusSelector, Metadata, SearchResult};
pub use verse::{Verse, VerseContext, VerseTable};
