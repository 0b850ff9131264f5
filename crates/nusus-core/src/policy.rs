//! Tunable knobs for candidate oversampling and lexical boosting.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::CorpusKind;

/// Oversampling and boost factors for one corpus.
///
/// Boosts are multiplicative and must be `>= 1.0`; at most one boost per
/// stage applies to a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorpusPolicy {
    /// Candidates fetched per requested result before reranking.
    pub oversample: usize,
    /// Applied when a term of the user's query occurs in the text.
    pub original_term_boost: f32,
    /// Applied when a term of the expanded query occurs in the text.
    pub expanded_term_boost: f32,
}

impl CorpusPolicy {
    pub const SCRIPTURE: Self = Self { oversample: 5, original_term_boost: 2.0, expanded_term_boost: 1.3 };
    pub const NARRATION: Self = Self { oversample: 3, original_term_boost: 1.8, expanded_term_boost: 1.2 };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingPolicy {
    pub scripture: CorpusPolicy,
    pub narration: CorpusPolicy,
    /// Query terms shorter than this (in characters) never trigger a boost.
    pub min_term_chars: usize,
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self { scripture: CorpusPolicy::SCRIPTURE, narration: CorpusPolicy::NARRATION, min_term_chars: 3 }
    }
}

impl RankingPolicy {
    pub fn for_kind(&self, kind: CorpusKind) -> &CorpusPolicy {
        match kind {
            CorpusKind::Scripture => &self.scripture,
            CorpusKind::Narration => &self.narration,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for kind in CorpusKind::ALL {
            let p = self.for_kind(kind);
            if p.oversample == 0 {
                return Err(Error::InvalidConfig(format!("ranking.{kind}.oversample must be at least 1")));
            }
            // NaN fails both comparisons, so it is rejected too.
            if !(p.original_term_boost >= 1.0 && p.expanded_term_boost >= 1.0) {
                return Err(Error::InvalidConfig(format!("ranking.{kind} boosts must be >= 1.0")));
            }
        }
        Ok(())
    }
}
