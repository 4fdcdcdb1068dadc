//! Seams to the two remote model families the engine depends on.

use async_trait::async_trait;

/// Deterministic, stateless mapping from text to fixed-length vectors.
///
/// The same model must serve both the build phase and every query; the
/// index records `model_id()` in its manifest and refuses to load under a
/// different embedder. `embed_batch` returns exactly one vector of `dim()`
/// floats per input, in input order — implementations must fail the whole
/// batch rather than silently drop items.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn model_id(&self) -> &str;
    fn dim(&self) -> usize;
    async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Single-turn text generation. Stateless, reentrant; safe to share across
/// concurrent queries behind an `Arc`.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    fn model_id(&self) -> &str;
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
