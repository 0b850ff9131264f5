//! Domain types used by the normalizer, the vector index and the engine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The two fixed corpora the engine searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorpusKind {
    Scripture,
    Narration,
}

impl CorpusKind {
    pub const ALL: [CorpusKind; 2] = [CorpusKind::Scripture, CorpusKind::Narration];

    pub fn as_str(self) -> &'static str {
        match self {
            CorpusKind::Scripture => "scripture",
            CorpusKind::Narration => "narration",
        }
    }
}

impl fmt::Display for CorpusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which corpora a search should cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorpusSelector {
    Scripture,
    Narration,
    #[default]
    Both,
}

impl CorpusSelector {
    pub fn includes(self, kind: CorpusKind) -> bool {
        matches!(
            (self, kind),
            (CorpusSelector::Both, _)
                | (CorpusSelector::Scripture, CorpusKind::Scripture)
                | (CorpusSelector::Narration, CorpusKind::Narration)
        )
    }

    pub fn kinds(self) -> impl Iterator<Item = CorpusKind> {
        CorpusKind::ALL.into_iter().filter(move |k| self.includes(*k))
    }
}

impl FromStr for CorpusSelector {
    type Err = Error;

    /// Accepts the corpus names plus the legacy `quran`/`hadith` aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scripture" | "quran" => Ok(CorpusSelector::Scripture),
            "narration" | "hadith" => Ok(CorpusSelector::Narration),
            "both" | "all" => Ok(CorpusSelector::Both),
            other => Err(Error::InvalidSelector(other.to_string())),
        }
    }
}

/// Location of a verse: surah position, optional surah name, ayah position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptureMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NarrationMeta {
    pub collection_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation: Option<String>,
}

/// Per-entry metadata; the shape depends on the corpus it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum Metadata {
    Scripture(ScriptureMeta),
    Narration(NarrationMeta),
    Other {
        #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
        reference: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        citation: Option<String>,
    },
}

impl Metadata {
    pub fn kind(&self) -> Option<CorpusKind> {
        match self {
            Metadata::Scripture(_) => Some(CorpusKind::Scripture),
            Metadata::Narration(_) => Some(CorpusKind::Narration),
            Metadata::Other { .. } => None,
        }
    }

    pub fn citation(&self) -> Option<&str> {
        let citation = match self {
            Metadata::Scripture(m) => m.citation.as_deref(),
            Metadata::Narration(m) => m.citation.as_deref(),
            Metadata::Other { citation, .. } => citation.as_deref(),
        };
        citation.filter(|c| !c.trim().is_empty())
    }

    pub fn set_citation(&mut self, value: String) {
        match self {
            Metadata::Scripture(m) => m.citation = Some(value),
            Metadata::Narration(m) => m.citation = Some(value),
            Metadata::Other { citation, .. } => *citation = Some(value),
        }
    }
}

/// One indexable unit of normalized text. Its position in the corpus is its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub text: String,
    pub metadata: Metadata,
}

/// A reranked hit. `score` is capped at 1.0; `metadata.citation` is always set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub text: String,
    pub score: f32,
    pub metadata: Metadata,
}

impl SearchResult {
    pub fn citation(&self) -> &str {
        self.metadata.citation().unwrap_or_default()
    }
}
