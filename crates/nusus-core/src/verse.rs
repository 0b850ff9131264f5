//! Positional verse lookup over the raw grouped scripture file.
//!
//! Unlike the search index, this view keeps every verse that has any text,
//! including single-word verses, so neighbours are the real adjacent verses.

use serde::Serialize;

use crate::citation::CitationStyle;
use crate::corpus::{collapse_whitespace, RawCorpus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verse {
    pub group_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    pub item_index: usize,
    pub text: String,
    pub citation: String,
}

/// A verse with its neighbours inside the same surah.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VerseContext<'a> {
    pub verse: &'a Verse,
    pub previous: Option<&'a Verse>,
    pub next: Option<&'a Verse>,
}

/// Verses addressed by 1-based (surah, ayah). Slots without readable text
/// stay empty. Flat or record-shaped scripture has no surah positions and
/// yields an empty table.
#[derive(Debug, Clone, Default)]
pub struct VerseTable {
    groups: Vec<Vec<Option<Verse>>>,
}

impl VerseTable {
    pub fn new(raw: &RawCorpus, style: &CitationStyle) -> Self {
        let RawCorpus::Grouped(groups) = raw else {
            return Self::default();
        };
        let groups: Vec<Vec<Option<Verse>>> = groups
            .iter()
            .enumerate()
            .map(|(g, group)| {
                let group_index = g + 1;
                let group_name = group.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
                group
                    .items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        let text = item.text().and_then(collapse_whitespace)?;
                        let item_index = i + 1;
                        Some(Verse {
                            group_index,
                            group_name: group_name.map(str::to_string),
                            item_index,
                            text,
                            citation: style.scripture(group_name, Some(group_index), Some(item_index)),
                        })
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        Self { groups }
    }

    pub fn get(&self, group_index: usize, item_index: usize) -> Option<&Verse> {
        let group = self.groups.get(group_index.checked_sub(1)?)?;
        group.get(item_index.checked_sub(1)?)?.as_ref()
    }

    pub fn context(&self, group_index: usize, item_index: usize) -> Option<VerseContext<'_>> {
        let verse = self.get(group_index, item_index)?;
        let previous = item_index.checked_sub(1).and_then(|i| self.get(group_index, i));
        let next = self.get(group_index, item_index + 1);
        Some(VerseContext { verse, previous, next })
    }

    /// Number of verses with text.
    pub fn len(&self) -> usize {
        self.groups.iter().flatten().filter(|v| v.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_positions_are_absent() {
        let raw: RawCorpus = serde_json::from_str(r#"[{"surahName": "X", "verses": ["الم"]}]"#).unwrap();
        let table = VerseTable::new(&raw, &CitationStyle::default());
        assert!(table.get(0, 1).is_none());
        assert!(table.get(1, 0).is_none());
        assert_eq!(table.get(1, 1).map(|v| v.citation.as_str()), Some("Qur'an X (1):1"));
    }
}
