use nusus_core::error::{Error, Result};
use nusus_core::CorpusEntry;

use crate::index::VectorIndex;

/// A corpus row selected by similarity, before reranking.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub position: usize,
    /// Cosine similarity clipped to [-1, 1].
    pub similarity: f32,
    pub entry: &'a CorpusEntry,
}

/// Dot product of two unit vectors, clipped to [-1, 1]. NaN maps to -1.
pub fn similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    if dot.is_nan() { -1.0 } else { dot.clamp(-1.0, 1.0) }
}

/// Score every row against `query` (already unit-normalized) and keep the
/// best `top_k * oversample`, best first. Ties keep corpus order.
pub fn retrieve<'a>(
    index: &'a VectorIndex,
    query: &[f32],
    oversample: usize,
    top_k: usize,
) -> Result<Vec<Candidate<'a>>> {
    if index.is_empty() || top_k == 0 {
        return Ok(Vec::new());
    }
    if query.len() != index.dim() {
        return Err(Error::DimensionMismatch { expected: index.dim(), actual: query.len() });
    }

    let wanted = top_k.saturating_mul(oversample.max(1));
    let mut scored: Vec<Candidate<'a>> = index
        .rows()
        .enumerate()
        .map(|(position, (entry, vector))| Candidate { position, similarity: similarity(query, vector), entry })
        .collect();
    scored.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    scored.truncate(wanted);
    Ok(scored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn similarity_is_clipped() {
        let a = [1.0f32 + 1e-3, 0.0];
        assert_eq!(similarity(&a, &a), 1.0);
        let b = [-1.0f32 - 1e-3, 0.0];
        assert_eq!(similarity(&a, &b), -1.0);
        assert_eq!(similarity(&[f32::NAN], &[1.0]), -1.0);
    }
}
