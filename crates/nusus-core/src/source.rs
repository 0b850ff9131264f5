//! Locating and parsing the raw corpus files on disk.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::resolve_with_base;
use crate::corpus::RawCorpus;
use crate::error::{Error, Result};
use crate::types::CorpusKind;

/// Load the first candidate file that exists under `data_dir`.
///
/// Candidates are tried in order; absolute candidates ignore `data_dir`.
/// When none exists the error lists every path that was tried.
pub fn load_corpus(kind: CorpusKind, data_dir: &Path, candidates: &[String]) -> Result<RawCorpus> {
    let mut attempted = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let path = resolve_with_base(data_dir, candidate);
        debug!(%kind, path = %path.display(), "trying corpus file");
        if path.is_file() {
            let corpus = read_corpus(&path)?;
            info!(%kind, path = %path.display(), records = corpus.len(), "loaded corpus file");
            return Ok(corpus);
        }
        attempted.push(path);
    }

    let available = list_json_files(data_dir);
    warn!(%kind, dir = %data_dir.display(), ?available, "no corpus file found");
    Err(Error::DataSourceNotFound { kind, attempted })
}

pub fn read_corpus(path: &Path) -> Result<RawCorpus> {
    let reader = BufReader::new(File::open(path)?);
    serde_json::from_reader(reader)
        .map_err(|e| Error::InvalidCorpus(format!("{}: {}", path.display(), e)))
}

fn list_json_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    files.sort();
    files
}
