use thiserror::Error;

/// Error taxonomy shared across the whole engine.
///
/// Callers are expected to match on the variant: `Config` and
/// `IndexNotReady` map to different user-facing messages ("the service is
/// misconfigured" vs "nobody has built an index yet"), and `Generation`
/// marks a per-query model failure that must never take the process down.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("knowledge index is not ready; run a rebuild first")]
    IndexNotReady,

    #[error("index integrity violation: {0}")]
    IndexIntegrity(String),

    #[error("document extraction failed for '{path}': {reason}")]
    Extraction { path: String, reason: String },

    #[error("embedding request failed: {0}")]
    Embedding(String),

    #[error("language model call failed: {0}")]
    Generation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
