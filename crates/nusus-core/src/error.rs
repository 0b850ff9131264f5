use std::path::PathBuf;

use thiserror::Error;

use crate::types::CorpusKind;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid corpus selector: {0} (expected scripture, narration or both)")]
    InvalidSelector(String),

    #[error("No {kind} data source found; tried: {}", join_paths(.attempted))]
    DataSourceNotFound { kind: CorpusKind, attempted: Vec<PathBuf> },

    #[error("Invalid corpus: {0}")]
    InvalidCorpus(String),

    #[error("Encoder failed: {0}")]
    Encoder(String),

    #[error("Dimension mismatch: index has {expected}, query has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap an encoder failure, keeping the whole context chain.
    pub fn encoder(err: &anyhow::Error) -> Self {
        Self::Encoder(format!("{err:#}"))
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "<no candidates configured>".to_string();
    }
    paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
}

pub type Result<T> = std::result::Result<T, Error>;
