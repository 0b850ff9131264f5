//! In-memory dense index over one normalized corpus, plus brute-force
//! cosine retrieval with oversampling.
//!
//! The index is built once and never mutated, so it can be shared across
//! threads without locking.

pub mod index;
pub mod retrieve;

pub use index::{l2_normalize, IndexBuilder, VectorIndex};
pub use retrieve::{retrieve, Candidate};
