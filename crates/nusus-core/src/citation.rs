//! Human-readable references for corpus entries.

use serde::{Deserialize, Serialize};

use crate::types::{Metadata, NarrationMeta, ScriptureMeta};

pub const DEFAULT_SCRIPTURE_LABEL: &str = "Qur'an";
pub const DEFAULT_NARRATION_COLLECTION: &str = "صحيح البخاري";
pub const GENERIC_REFERENCE: &str = "Reference";

/// Labels used when building citations. Built once, shared by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CitationStyle {
    pub scripture_label: String,
    pub narration_collection: String,
}

impl Default for CitationStyle {
    fn default() -> Self {
        Self {
            scripture_label: DEFAULT_SCRIPTURE_LABEL.to_string(),
            narration_collection: DEFAULT_NARRATION_COLLECTION.to_string(),
        }
    }
}

impl CitationStyle {
    /// Citation for any metadata. Never fails and never returns an empty string.
    pub fn format(&self, metadata: &Metadata) -> String {
        let citation = match metadata {
            Metadata::Scripture(m) => self.format_scripture(m),
            Metadata::Narration(m) => self.format_narration(m),
            Metadata::Other { reference, .. } => non_empty(reference.as_deref())
                .map(str::to_string)
                .unwrap_or_default(),
        };
        if citation.trim().is_empty() {
            GENERIC_REFERENCE.to_string()
        } else {
            citation
        }
    }

    pub fn format_scripture(&self, m: &ScriptureMeta) -> String {
        self.scripture(m.group_name.as_deref(), m.group_index, m.item_index)
    }

    pub fn format_narration(&self, m: &NarrationMeta) -> String {
        self.narration(m.book_title.as_deref())
    }

    pub fn scripture(&self, group_name: Option<&str>, group: Option<usize>, item: Option<usize>) -> String {
        let label = &self.scripture_label;
        match (non_empty(group_name), group, item) {
            (Some(name), Some(g), Some(i)) => format!("{label} {name} ({g}):{i}"),
            (_, Some(g), Some(i)) => format!("{label} {g}:{i}"),
            (_, None, Some(i)) => format!("{label} {i}"),
            (Some(name), _, None) => format!("{label} {name}"),
            (None, _, None) => label.clone(),
        }
    }

    pub fn narration(&self, book_title: Option<&str>) -> String {
        non_empty(book_title)
            .map(str::to_string)
            .unwrap_or_else(|| self.narration_collection.clone())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
