//! Embedding clients.
//!
//! Two [`Embedder`] implementations live here: [`GeminiEmbedder`] talks to
//! the `batchEmbedContents` endpoint, [`HashEmbedder`] is a deterministic
//! offline stand-in built on token hashing. Both honour the same contract:
//! one vector of `dim()` floats per input text, in input order, or an error
//! for the whole batch — never a silently short result.

mod hash;
mod remote;

pub use hash::HashEmbedder;
pub use remote::GeminiEmbedder;

use std::sync::Arc;
use tramita_core::config::Settings;
use tramita_core::error::{Error, Result};
use tramita_core::traits::Embedder;

/// Build the embedder the configuration asks for.
///
/// `embedding.use_hash = true` (or `APP_EMBEDDING__USE_HASH=true`) selects
/// the hashing embedder; otherwise the remote client is built, which needs
/// an API credential and fails with a configuration error without one.
pub fn embedder_from_settings(settings: &Settings) -> Result<Arc<dyn Embedder>> {
    if settings.embedding.use_hash {
        tracing::info!(dim = settings.embedding.dim, "using deterministic hash embedder");
        return Ok(Arc::new(HashEmbedder::new(settings.embedding.dim)));
    }
    let api_key = settings.resolve_api_key().ok_or_else(|| {
        Error::Config(format!(
            "no API key found in any of: {}",
            settings.generation.api_key_env.join(", ")
        ))
    })?;
    Ok(Arc::new(GeminiEmbedder::new(
        settings.generation.base_url.clone(),
        settings.embedding.model.clone(),
        settings.embedding.dim,
        api_key,
    )))
}
