//! Configuration loader and path helpers.
//!
//! Merges `config.toml` + `config.<env>.toml` + `APP_*` env vars through
//! Figment and extracts a typed [`Settings`] tree. Every field has a serde
//! default, so an empty config file (or none at all) still yields a working
//! development setup.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub chunking: ChunkingSettings,
    pub retrieval: RetrievalSettings,
    pub embedding: EmbeddingSettings,
    pub generation: GenerationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data: DataSettings::default(),
            chunking: ChunkingSettings::default(),
            retrieval: RetrievalSettings::default(),
            embedding: EmbeddingSettings::default(),
            generation: GenerationSettings::default(),
        }
    }
}

/// Where documents and index artifacts live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Source documents (.pdf / .txt / .md).
    pub raw_dir: String,
    /// Normalized plain-text cache written during the build phase.
    pub clean_dir: String,
    /// fragments.json / embeddings.json / manifest.json.
    pub index_dir: String,
    /// Where the request agent drops solicitud artifacts.
    pub requests_dir: String,
    /// JSONL interaction log.
    pub log_file: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            raw_dir: "data/raw".to_string(),
            clean_dir: "data/clean".to_string(),
            index_dir: "data/index".to_string(),
            requests_dir: "data/solicitudes".to_string(),
            log_file: "logs/interactions.jsonl".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Target maximum fragment length, in characters.
    pub chunk_size: usize,
    /// Characters of trailing context carried into the next fragment.
    pub chunk_overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Fragments retrieved per query.
    pub top_k: usize,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub model: String,
    pub dim: usize,
    /// Use the deterministic hashing embedder instead of the remote API.
    /// Handy offline and in tests; also reachable via
    /// `APP_EMBEDDING__USE_HASH=true`.
    pub use_hash: bool,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-004".to_string(),
            dim: 768,
            use_hash: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub model: String,
    /// Env vars consulted for the API credential, in order.
    pub api_key_env: Vec<String>,
    pub base_url: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash-lite".to_string(),
            api_key_env: vec!["GEMINI_API_KEY".to_string(), "GOOGLE_API_KEY".to_string()],
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

impl Settings {
    /// Load settings for the current `RUST_ENV` (dev by default).
    ///
    /// Merge order, later wins: `config.toml`, `config.<env>.toml`,
    /// `APP_*` environment variables (`APP_RETRIEVAL__TOP_K=8` etc.).
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let settings: Settings = figment
            .extract()
            .map_err(|e| anyhow::anyhow!("failed to load configuration: {e}"))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.chunking.chunk_size == 0 {
            anyhow::bail!("chunking.chunk_size must be positive");
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            anyhow::bail!(
                "chunking.chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunking.chunk_overlap,
                self.chunking.chunk_size
            );
        }
        if self.retrieval.top_k == 0 {
            anyhow::bail!("retrieval.top_k must be positive");
        }
        if self.embedding.dim == 0 {
            anyhow::bail!("embedding.dim must be positive");
        }
        Ok(())
    }

    /// First configured API-key env var that is set and non-empty.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.generation
            .api_key_env
            .iter()
            .filter_map(|name| env::var(name).ok())
            .find(|v| !v.is_empty())
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

/// Resolve a possibly relative path against a base directory after expansion.
/// Absolute paths are returned as-is.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() {
        p
    } else {
        base.join(p)
    }
}
