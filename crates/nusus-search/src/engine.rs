use std::collections::BTreeMap;

use tracing::{debug, info};

use nusus_core::config::Settings;
use nusus_core::error::{Error, Result};
use nusus_core::{
    CitationStyle, CorpusKind, CorpusNormalizer, CorpusSelector, Embedder, RankingPolicy, RawCorpus,
    VerseTable,
};
use nusus_vector::{l2_normalize, retrieve, IndexBuilder, VectorIndex};

use crate::expand::QueryExpander;
use crate::rerank::Reranker;

/// Results per requested corpus, best first. Only selected corpora appear.
pub type SearchResults = BTreeMap<CorpusKind, Vec<SearchResult>>;

pub use nusus_core::{SearchResult, Verse, VerseContext};

/// The two raw corpora, already parsed.
#[derive(Debug, Clone, Default)]
pub struct Corpora {
    pub scripture: RawCorpus,
    pub narration: RawCorpus,
}

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub batch_size: usize,
    pub show_progress: bool,
    pub ranking: RankingPolicy,
    pub citation: CitationStyle,
    pub expander: QueryExpander,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            batch_size: 32,
            show_progress: false,
            ranking: RankingPolicy::default(),
            citation: CitationStyle::default(),
            expander: QueryExpander::default(),
        }
    }
}

impl EngineOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            batch_size: settings.model.batch_size,
            ranking: settings.ranking.clone(),
            citation: settings.citation.clone(),
            ..Self::default()
        }
    }
}

/// Build-once, read-many search over the scripture and narration corpora.
pub struct SearchEngine {
    scripture: VectorIndex,
    narration: VectorIndex,
    verses: VerseTable,
    embedder: Box<dyn Embedder>,
    expander: QueryExpander,
    ranking: RankingPolicy,
    citation: CitationStyle,
}

impl SearchEngine {
    /// Normalize and embed both corpora. Fails if the encoder fails.
    pub fn new(corpora: &Corpora, embedder: Box<dyn Embedder>, options: EngineOptions) -> Result<Self> {
        options.ranking.validate()?;
        let normalizer = CorpusNormalizer::new(&options.citation);
        let builder = IndexBuilder::new(options.batch_size).show_progress(options.show_progress);

        let scripture_entries = normalizer.normalize(&corpora.scripture, CorpusKind::Scripture);
        let narration_entries = normalizer.normalize(&corpora.narration, CorpusKind::Narration);
        info!(
            "loaded {} scripture entries and {} narration entries",
            scripture_entries.len(),
            narration_entries.len()
        );

        let scripture = builder.build(scripture_entries, embedder.as_ref())?;
        let narration = builder.build(narration_entries, embedder.as_ref())?;

        Ok(Self {
            scripture,
            narration,
            verses: VerseTable::new(&corpora.scripture, &options.citation),
            embedder,
            expander: options.expander,
            ranking: options.ranking,
            citation: options.citation,
        })
    }

    pub fn index(&self, kind: CorpusKind) -> &VectorIndex {
        match kind {
            CorpusKind::Scripture => &self.scripture,
            CorpusKind::Narration => &self.narration,
        }
    }

    pub fn len(&self, kind: CorpusKind) -> usize {
        self.index(kind).len()
    }

    pub fn expander(&self) -> &QueryExpander {
        &self.expander
    }

    /// Expand, embed, retrieve, rerank. Each selected corpus gets at most
    /// `top_k` results; an empty corpus yields an empty list.
    pub fn search(&self, query: &str, selector: CorpusSelector, top_k: usize) -> Result<SearchResults> {
        let expanded = self.expander.expand(query);
        debug!(query, expanded = %expanded, "expanded query");

        let kinds: Vec<CorpusKind> = selector.kinds().collect();
        let mut results: SearchResults = kinds.iter().map(|k| (*k, Vec::new())).collect();
        if top_k == 0 || kinds.iter().all(|k| self.index(*k).is_empty()) {
            return Ok(results);
        }

        let mut query_vec = self
            .embedder
            .embed_batch(std::slice::from_ref(&expanded))
            .map_err(|e| Error::encoder(&e))?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Encoder("encoder returned no vector for the query".to_string()))?;
        l2_normalize(&mut query_vec);

        for kind in kinds {
            let policy = self.ranking.for_kind(kind);
            let candidates = retrieve(self.index(kind), &query_vec, policy.oversample, top_k)?;
            debug!(%kind, candidates = candidates.len(), "retrieved candidates");

            let reranker = Reranker {
                policy,
                min_term_chars: self.ranking.min_term_chars,
                style: &self.citation,
            };
            results.insert(kind, reranker.rerank(&candidates, query, &expanded, top_k));
        }
        Ok(results)
    }

    /// Look up a verse by 1-based surah and ayah position. Every verse with
    /// text is addressable, including ones too short to be indexed.
    pub fn verse_context(&self, group_index: usize, item_index: usize) -> Option<VerseContext<'_>> {
        self.verses.context(group_index, item_index)
    }
}
