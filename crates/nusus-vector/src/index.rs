use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use nusus_core::error::{Error, Result};
use nusus_core::{CorpusEntry, Embedder};

/// Denominator floor when normalizing; keeps zero vectors at zero.
pub const NORM_EPS: f32 = 1e-12;

/// Scale `v` to unit Euclidean length in place.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(NORM_EPS);
    for x in v.iter_mut() {
        *x /= norm;
    }
}

/// Entries and their unit vectors, index-aligned: `vectors[i]` embeds `entries[i]`.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    entries: Vec<CorpusEntry>,
    vectors: Vec<Vec<f32>>,
    dim: usize,
}

impl VectorIndex {
    pub fn empty(dim: usize) -> Self {
        Self { entries: Vec::new(), vectors: Vec::new(), dim }
    }

    /// Embed `entries` in batches of at most `batch_size`.
    pub fn build(entries: Vec<CorpusEntry>, embedder: &dyn Embedder, batch_size: usize) -> Result<Self> {
        IndexBuilder::new(batch_size).build(entries, embedder)
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn dim(&self) -> usize { self.dim }

    pub fn entries(&self) -> &[CorpusEntry] { &self.entries }

    pub fn vectors(&self) -> &[Vec<f32>] { &self.vectors }

    pub fn entry(&self, position: usize) -> Option<&CorpusEntry> { self.entries.get(position) }

    /// Rows as `(entry, vector)` pairs in corpus order.
    pub fn rows(&self) -> impl Iterator<Item = (&CorpusEntry, &[f32])> + '_ {
        self.entries.iter().zip(self.vectors.iter().map(Vec::as_slice))
    }
}

#[derive(Debug, Clone)]
pub struct IndexBuilder {
    batch_size: usize,
    show_progress: bool,
}

impl Default for IndexBuilder {
    fn default() -> Self {
        Self { batch_size: 32, show_progress: false }
    }
}

impl IndexBuilder {
    /// A batch size of 0 is treated as 1.
    pub fn new(batch_size: usize) -> Self {
        Self { batch_size: batch_size.max(1), ..Self::default() }
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn build(&self, entries: Vec<CorpusEntry>, embedder: &dyn Embedder) -> Result<VectorIndex> {
        if entries.is_empty() {
            debug!(dim = embedder.dim(), "empty corpus, skipping encoder");
            return Ok(VectorIndex::empty(embedder.dim()));
        }

        let pb = if self.show_progress { ProgressBar::new(entries.len() as u64) } else { ProgressBar::hidden() };
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} entries ({percent}%)")
        {
            pb.set_style(style.progress_chars("#>-"));
        }

        let texts: Vec<String> = entries.iter().map(|e| e.text.clone()).collect();
        let mut vectors = Vec::with_capacity(texts.len());
        let mut dim: Option<usize> = None;
        for batch in texts.chunks(self.batch_size) {
            let embeddings = embedder.embed_batch(batch).map_err(|e| Error::encoder(&e))?;
            if embeddings.len() != batch.len() {
                return Err(Error::Encoder(format!(
                    "encoder returned {} vectors for {} texts",
                    embeddings.len(),
                    batch.len()
                )));
            }
            for mut v in embeddings {
                let expected = *dim.get_or_insert(v.len());
                if expected == 0 {
                    return Err(Error::Encoder("encoder returned an empty vector".to_string()));
                }
                if v.len() != expected {
                    return Err(Error::DimensionMismatch { expected, actual: v.len() });
                }
                l2_normalize(&mut v);
                vectors.push(v);
            }
            pb.inc(batch.len() as u64);
        }
        pb.finish_and_clear();

        let dim = dim.unwrap_or_else(|| embedder.dim());
        info!(entries = entries.len(), dim, "vector index built");
        Ok(VectorIndex { entries, vectors, dim })
    }
}
