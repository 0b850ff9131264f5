//! Sentence encoders implementing [`nusus_core::Embedder`].
//!
//! `BertEmbedder` runs a local sentence-transformers style BERT model with
//! candle (masked mean pooling + L2). `HashEmbedder` is a deterministic,
//! model-free stand-in selected with `APP_USE_FAKE_EMBEDDINGS=1`.

use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use nusus_core::config::{expand_path, ModelSettings};
use nusus_core::Embedder;

mod device;
mod pool;
mod tokenize;

pub use device::select_device;
pub use pool::masked_mean_l2;
pub use tokenize::tokenize_batch;

/// Dimension of the hashing encoder; matches MiniLM-class models.
pub const FAKE_DIM: usize = 384;

pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dim: usize,
    max_len: usize,
    pad_id: u32,
}

impl BertEmbedder {
    pub fn from_dir(model_dir: &Path, max_len: usize) -> Result<Self> {
        let device = select_device();
        info!(dir = %model_dir.display(), "loading sentence encoder");

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;
        let pad_id = tokenizer.token_to_id("[PAD]").unwrap_or(0);

        let config_path = model_dir.join("config.json");
        let raw_config = std::fs::read_to_string(&config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        let config: BertConfig = serde_json::from_str(&raw_config)?;
        let dim = serde_json::from_str::<serde_json::Value>(&raw_config)?
            .get("hidden_size")
            .and_then(|v| v.as_u64())
            .ok_or_else(|| anyhow!("{} has no hidden_size", config_path.display()))? as usize;

        let safetensors = model_dir.join("model.safetensors");
        let vb = if safetensors.exists() {
            debug!(path = %safetensors.display(), "loading safetensors weights");
            // SAFETY: the weights file is not modified while mapped.
            unsafe { VarBuilder::from_mmaped_safetensors(&[safetensors], DTYPE, &device)? }
        } else {
            let weights_path = model_dir.join("pytorch_model.bin");
            debug!(path = %weights_path.display(), "loading pickle weights");
            let weights = candle_core::pickle::read_all(&weights_path)
                .with_context(|| format!("reading {}", weights_path.display()))?;
            let weights_map: HashMap<String, Tensor> = weights.into_iter().collect();
            VarBuilder::from_tensors(weights_map, DTYPE, &device)
        };
        let model = BertModel::load(vb, &config)?;
        info!(dim, max_len, "sentence encoder ready");
        Ok(Self { model, tokenizer, device, dim, max_len, pad_id })
    }
}

impl Embedder for BertEmbedder {
    fn dim(&self) -> usize { self.dim }

    fn max_len(&self) -> usize { self.max_len }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let start = Instant::now();
        let (input_ids, attention_mask) =
            tokenize_batch(&self.tokenizer, texts, self.max_len, self.pad_id, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &attention_mask)?;
        let vectors: Vec<Vec<f32>> = pooled.to_device(&Device::Cpu)?.to_vec2()?;
        if start.elapsed().as_millis() > 500 {
            warn!(batch = texts.len(), elapsed = ?start.elapsed(), "slow embedding batch");
        }
        Ok(vectors)
    }
}

/// Deterministic bag-of-tokens hashing encoder for tests and development.
///
/// Texts sharing tokens get correlated vectors, which keeps ranking tests
/// meaningful without a model on disk.
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;

        let mut v = vec![0f32; self.dim];
        for token in text.split_whitespace() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += 0.5 + val;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        v
    }
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize { self.dim }

    fn max_len(&self) -> usize { usize::MAX }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

fn fake_requested() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Build the encoder described by `settings`, or the hashing encoder when
/// `settings.fake` or `APP_USE_FAKE_EMBEDDINGS` asks for it.
pub fn get_default_embedder(settings: &ModelSettings) -> Result<Box<dyn Embedder>> {
    if settings.fake || fake_requested() {
        info!(dim = FAKE_DIM, "using HashEmbedder");
        return Ok(Box::new(HashEmbedder::new(FAKE_DIM)));
    }
    let dir = resolve_model_dir(settings)?;
    info!(model = %settings.name, "using BertEmbedder");
    Ok(Box::new(BertEmbedder::from_dir(&dir, settings.max_len)?))
}

/// Locate the model directory: `model.dir`, then `APP_MODEL_DIR`, `MODEL_DIR`,
/// then `models/<name>` and `../models/<name>` where `<name>` is the last
/// segment of the model identifier.
pub fn resolve_model_dir(settings: &ModelSettings) -> Result<PathBuf> {
    let short_name = settings.name.rsplit('/').next().unwrap_or(settings.name.as_str());
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(dir) = &settings.dir {
        candidates.push(expand_path(dir));
    }
    for var in ["APP_MODEL_DIR", "MODEL_DIR"] {
        if let Ok(dir) = std::env::var(var) {
            candidates.push(expand_path(dir));
        }
    }
    candidates.push(Path::new("models").join(short_name));
    candidates.push(Path::new("../models").join(short_name));

    if let Some(found) = candidates.iter().find(|p| p.join("config.json").exists()) {
        debug!(dir = %found.display(), "model directory resolved");
        return Ok(found.clone());
    }
    let tried = candidates.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ");
    Err(anyhow!("Could not locate model directory for {}. Checked: {}", settings.name, tried))
}
