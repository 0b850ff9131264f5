//! Lexical boosting on top of semantic similarity.
//!
//! Two stages, each applying at most one multiplier: a hit on a term from the
//! user's query, then a hit on a term from the expanded query. A "hit" is a
//! literal substring match of a whitespace-separated term that is at least
//! `min_term_chars` characters long. Scores are capped at 1.0; there is no floor.

use nusus_core::{CitationStyle, CorpusPolicy, SearchResult};
use nusus_vector::Candidate;

fn has_term_hit(query: &str, text: &str, min_term_chars: usize) -> bool {
    query
        .split_whitespace()
        .any(|term| term.chars().count() >= min_term_chars && text.contains(term))
}

/// Apply both boost stages to one similarity.
///
/// Only positive scores are multiplied. Multiplying unconditionally would
/// push a negative score with a term hit further down, ranking it below the
/// same score without a hit; non-positive scores are therefore left as they
/// are, and a boost never lowers a score.
pub fn boosted_score(
    similarity: f32,
    text: &str,
    original_query: &str,
    expanded_query: &str,
    policy: &CorpusPolicy,
    min_term_chars: usize,
) -> f32 {
    let mut score = similarity;
    if score > 0.0 {
        if has_term_hit(original_query, text, min_term_chars) {
            score *= policy.original_term_boost;
        }
        if has_term_hit(expanded_query, text, min_term_chars) {
            score *= policy.expanded_term_boost;
        }
    }
    score.min(1.0)
}

/// Per-corpus reranking settings, borrowed from the engine.
#[derive(Debug, Clone, Copy)]
pub struct Reranker<'a> {
    pub policy: &'a CorpusPolicy,
    pub min_term_chars: usize,
    pub style: &'a CitationStyle,
}

impl<'a> Reranker<'a> {
    /// Boost, sort (stable, best first) and keep at most `top_k` results.
    pub fn rerank(
        &self,
        candidates: &[Candidate<'_>],
        original_query: &str,
        expanded_query: &str,
        top_k: usize,
    ) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = candidates
            .iter()
            .map(|c| {
                let score = boosted_score(
                    c.similarity,
                    &c.entry.text,
                    original_query,
                    expanded_query,
                    self.policy,
                    self.min_term_chars,
                );
                let mut metadata = c.entry.metadata.clone();
                if metadata.citation().is_none() {
                    let citation = self.style.format(&metadata);
                    metadata.set_citation(citation);
                }
                SearchResult { text: c.entry.text.clone(), score, metadata }
            })
            .collect();
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(top_k);
        results
    }
}
