//! Layered configuration loader and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (nested keys use `__`, e.g. `APP_MODEL__BATCH_SIZE=16`). Every section has
//! defaults, so a missing file still yields usable [`Settings`].

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::citation::CitationStyle;
use crate::error::{Error, Result};
use crate::policy::RankingPolicy;

pub struct Config {
    figment: Figment,
    env_name: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Load with config files looked up in `dir`.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        Ok(Self { figment, env_name })
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment, env_name: "test".to_string() }
    }

    pub fn env_name(&self) -> &str {
        &self.env_name
    }

    pub fn get<T>(&self, key: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| Error::InvalidConfig(format!("Failed to get '{}': {}", key, e)))
    }

    /// Extract and validate the typed settings.
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        self.validate_for_env(&settings)?;
        Ok(settings)
    }

    fn validate_for_env(&self, settings: &Settings) -> Result<()> {
        match self.env_name.as_str() {
            "prod" | "production" if settings.model.fake => Err(Error::InvalidConfig(
                "model.fake must be disabled in production".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub model: ModelSettings,
    pub data: DataSettings,
    pub search: SearchSettings,
    pub ranking: RankingPolicy,
    pub citation: CitationStyle,
    pub console: ConsoleSettings,
}

impl Settings {
    /// Resolve relative `data.dir` and `model.dir` against `base` instead of
    /// the working directory. Absolute paths are kept.
    pub fn relative_to(mut self, base: &Path) -> Self {
        let rebase = |p: &str| resolve_with_base(base, p).to_string_lossy().into_owned();
        self.data.dir = rebase(&self.data.dir);
        self.model.dir = self.model.dir.as_deref().map(rebase);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.batch_size == 0 {
            return Err(Error::InvalidConfig("model.batch_size must be at least 1".to_string()));
        }
        if self.search.max_top_k == 0 {
            return Err(Error::InvalidConfig("search.max_top_k must be at least 1".to_string()));
        }
        if self.search.default_top_k > self.search.max_top_k {
            return Err(Error::InvalidConfig(format!(
                "search.default_top_k ({}) exceeds search.max_top_k ({})",
                self.search.default_top_k, self.search.max_top_k
            )));
        }
        self.ranking.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Model identifier, used for logging and as the default directory name.
    pub name: String,
    /// Local directory holding `config.json`, `tokenizer.json` and weights.
    pub dir: Option<String>,
    pub batch_size: usize,
    pub max_len: usize,
    /// Use the deterministic hashing encoder instead of the model.
    pub fake: bool,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            name: "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2".to_string(),
            dir: None,
            batch_size: 32,
            max_len: 128,
            fake: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub dir: String,
    /// Candidate file names, tried in order.
    pub scripture: Vec<String>,
    pub narration: Vec<String>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            dir: "CleanedData".to_string(),
            scripture: vec![
                "quran_lemmatized_enhanced.json".to_string(),
                "quran_lemmatized.json".to_string(),
                "quran_cleaned_arabic.json".to_string(),
            ],
            narration: vec![
                "hadiths_lemmatized.json".to_string(),
                "bukhari_all_arabic_cleaned.json".to_string(),
            ],
        }
    }
}

impl DataSettings {
    pub fn dir_path(&self) -> PathBuf {
        expand_path(&self.dir)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub default_top_k: usize,
    pub max_top_k: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self { default_top_k: 5, max_top_k: 20 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSettings {
    /// Results below this score are hidden in console output.
    pub min_score: f32,
    pub max_text_len: usize,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self { min_score: 0.5, max_text_len: 200 }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
