/// Text-to-vector capability consumed by the index and the engine.
///
/// Implementations must be order-preserving: `embed_batch(texts)[i]` is the
/// vector for `texts[i]`. Vectors need not be normalized; the index does that.
pub trait Embedder: Send + Sync {
    /// Declared dimensionality (D). Used for empty indexes before any call.
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}
