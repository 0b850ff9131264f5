//! Turns the raw scripture and narration files into uniform `CorpusEntry` rows.
//!
//! The raw files come in three shapes: a flat list of strings, a list of
//! named groups (surahs) holding verses, or a list of narration records.
//! The shape is resolved once at parse time into [`RawCorpus`].

use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::citation::CitationStyle;
use crate::types::{CorpusEntry, CorpusKind, Metadata, NarrationMeta, ScriptureMeta};

/// Entries with fewer whitespace-separated tokens are dropped as noise.
pub const MIN_TOKENS: usize = 2;

const RECORD_TEXT_FIELDS: &[&str] = &["original_text", "cleaned_arabic", "text", "arabic_text"];
const RECORD_TITLE_FIELDS: &[&str] = &["book_title_ar", "book_title"];
const RECORD_CHAPTER_FIELDS: &[&str] = &["chapter_title_ar", "chapter_title"];
const RECORD_ID_FIELDS: &[&str] = &["book_id"];
const GROUP_ITEM_FIELDS: &[&str] = &["verses", "items"];

/// The shape is chosen from the elements: any object carrying `verses` or
/// `items` makes the file grouped, any other object makes it a record list,
/// otherwise it is flat. Elements that do not fit the chosen shape become
/// empty placeholders, so they are skipped later but keep their position.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "Vec<Value>")]
pub enum RawCorpus {
    Flat(Vec<String>),
    Grouped(Vec<RawGroup>),
    Records(Vec<RawRecord>),
}

impl Default for RawCorpus {
    fn default() -> Self {
        RawCorpus::Flat(Vec::new())
    }
}

impl From<Vec<Value>> for RawCorpus {
    fn from(values: Vec<Value>) -> Self {
        let is_group = |v: &Value| v.as_object().is_some_and(|o| GROUP_ITEM_FIELDS.iter().any(|k| o.contains_key(*k)));

        if values.iter().any(is_group) {
            let groups = values
                .into_iter()
                .map(|v| {
                    serde_json::from_value::<RawGroup>(v).unwrap_or_else(|e| {
                        debug!(error = %e, "unreadable group kept as an empty placeholder");
                        RawGroup::default()
                    })
                })
                .collect();
            RawCorpus::Grouped(groups)
        } else if values.iter().any(Value::is_object) {
            let records = values
                .into_iter()
                .map(|v| match v {
                    Value::Object(fields) => RawRecord { fields },
                    _ => RawRecord::default(),
                })
                .collect();
            RawCorpus::Records(records)
        } else {
            let texts = values
                .into_iter()
                .map(|v| match v {
                    Value::String(s) => s,
                    _ => String::new(),
                })
                .collect();
            RawCorpus::Flat(texts)
        }
    }
}

impl RawCorpus {
    pub fn len(&self) -> usize {
        match self {
            RawCorpus::Flat(v) => v.len(),
            RawCorpus::Grouped(v) => v.len(),
            RawCorpus::Records(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named group of items, e.g. a surah and its verses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGroup {
    #[serde(default, alias = "surahName", alias = "group_name")]
    pub name: Option<String>,
    #[serde(default, alias = "verses")]
    pub items: Vec<RawItem>,
}

/// A verse is either bare text or an annotated object from the lemmatizer.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawItem {
    Text(String),
    Annotated {
        #[serde(default)]
        original: Option<String>,
        #[serde(default)]
        text: Option<String>,
    },
    /// Anything else (numbers, nulls, nested lists); yields no text.
    Other(IgnoredAny),
}

impl RawItem {
    pub fn text(&self) -> Option<&str> {
        match self {
            RawItem::Text(t) => Some(t.as_str()),
            RawItem::Annotated { original, text } => original.as_deref().or(text.as_deref()),
            RawItem::Other(_) => None,
        }
    }
}

/// A loosely-typed narration record; fields are looked up by priority lists.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RawRecord {
    pub fields: Map<String, Value>,
}

impl RawRecord {
    /// First non-empty string (or number) among `keys`, in order.
    pub fn first_field(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|k| match self.fields.get(*k)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn text(&self) -> Option<String> {
        self.first_field(RECORD_TEXT_FIELDS)
    }
}

/// Collapse whitespace runs and trim; `None` for blank input.
pub fn collapse_whitespace(raw: &str) -> Option<String> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }
    Some(tokens.join(" "))
}

/// Like [`collapse_whitespace`], but `None` below [`MIN_TOKENS`] tokens.
pub fn clean_text(raw: &str) -> Option<String> {
    collapse_whitespace(raw).filter(|t| t.split(' ').count() >= MIN_TOKENS)
}

pub struct CorpusNormalizer<'a> {
    style: &'a CitationStyle,
}

impl<'a> CorpusNormalizer<'a> {
    pub fn new(style: &'a CitationStyle) -> Self {
        Self { style }
    }

    /// Normalize one raw corpus. Input order is kept; short or textless
    /// entries are skipped.
    pub fn normalize(&self, raw: &RawCorpus, kind: CorpusKind) -> Vec<CorpusEntry> {
        let entries = self.normalize_shape(raw, kind);
        if entries.is_empty() && !raw.is_empty() {
            warn!(%kind, raw = raw.len(), "corpus has elements but none produced an entry");
        }
        entries
    }

    fn normalize_shape(&self, raw: &RawCorpus, kind: CorpusKind) -> Vec<CorpusEntry> {
        match (kind, raw) {
            (CorpusKind::Scripture, RawCorpus::Flat(texts)) => {
                self.scripture_positional(texts.iter().map(|t| Some(t.clone())))
            }
            (CorpusKind::Scripture, RawCorpus::Grouped(groups)) => self.scripture_grouped(groups),
            (CorpusKind::Scripture, RawCorpus::Records(records)) => {
                self.scripture_positional(records.iter().map(RawRecord::text))
            }
            (CorpusKind::Narration, RawCorpus::Flat(texts)) => texts
                .iter()
                .filter_map(|t| clean_text(t))
                .map(|text| self.narration_entry(text, None, None, None))
                .collect(),
            (CorpusKind::Narration, RawCorpus::Records(records)) => records
                .iter()
                .filter_map(|r| {
                    let text = clean_text(&r.text()?)?;
                    Some(self.narration_entry(
                        text,
                        r.first_field(RECORD_TITLE_FIELDS),
                        r.first_field(RECORD_ID_FIELDS),
                        r.first_field(RECORD_CHAPTER_FIELDS),
                    ))
                })
                .collect(),
            (CorpusKind::Narration, RawCorpus::Grouped(groups)) => groups
                .iter()
                .flat_map(|g| g.items.iter().map(move |item| (g, item)))
                .filter_map(|(g, item)| {
                    let text = clean_text(item.text()?)?;
                    let title = g.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
                    Some(self.narration_entry(text, title.map(str::to_string), None, None))
                })
                .collect(),
        }
    }

    fn scripture_positional(&self, texts: impl Iterator<Item = Option<String>>) -> Vec<CorpusEntry> {
        texts
            .enumerate()
            .filter_map(|(pos, text)| {
                let text = clean_text(&text?)?;
                let item_index = pos + 1;
                let meta = ScriptureMeta {
                    item_index: Some(item_index),
                    citation: Some(self.style.scripture(None, None, Some(item_index))),
                    ..ScriptureMeta::default()
                };
                Some(CorpusEntry { text, metadata: Metadata::Scripture(meta) })
            })
            .collect()
    }

    fn scripture_grouped(&self, groups: &[RawGroup]) -> Vec<CorpusEntry> {
        let mut entries = Vec::new();
        for (g, group) in groups.iter().enumerate() {
            let group_index = g + 1;
            let group_name = group.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
            for (i, item) in group.items.iter().enumerate() {
                let Some(text) = item.text().and_then(clean_text) else { continue };
                let item_index = i + 1;
                let citation = self.style.scripture(group_name, Some(group_index), Some(item_index));
                entries.push(CorpusEntry {
                    text,
                    metadata: Metadata::Scripture(ScriptureMeta {
                        group_index: Some(group_index),
                        group_name: group_name.map(str::to_string),
                        item_index: Some(item_index),
                        citation: Some(citation),
                    }),
                });
            }
        }
        entries
    }

    fn narration_entry(
        &self,
        text: String,
        book_title: Option<String>,
        book_id: Option<String>,
        chapter_title: Option<String>,
    ) -> CorpusEntry {
        let citation = self.style.narration(book_title.as_deref());
        CorpusEntry {
            text,
            metadata: Metadata::Narration(NarrationMeta {
                collection_name: self.style.narration_collection.clone(),
                book_title,
                book_id,
                chapter_title,
                citation: Some(citation),
            }),
        }
    }
}
