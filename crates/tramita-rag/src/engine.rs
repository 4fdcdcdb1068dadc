//! The retrieval-augmented query engine.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};
use tramita_core::config::{resolve_with_base, Settings};
use tramita_core::error::{Error, Result};
use tramita_core::traits::{Embedder, GenerativeModel};
use tramita_core::types::{BuildReport, Fragment, GroundedAnswer, Readiness};
use tramita_index::{store, IndexSlot, VectorIndex};
use tramita_ingest::{load_documents, TextSplitter};

use crate::prompt;

/// Embedding requests are sent in batches this size during a rebuild.
const EMBED_BATCH: usize = 64;

/// The engine instance a host constructs once and shares across requests.
///
/// No global state: the embedder and the generative model are injected,
/// and the index lives in an [`IndexSlot`] that rebuilds replace with a
/// single atomic swap. A missing generative model is a tolerated degraded
/// state — the readiness probe reports it and every query attempt fails
/// with the distinguishable configuration error.
pub struct QueryEngine {
    settings: Settings,
    base_dir: PathBuf,
    embedder: Arc<dyn Embedder>,
    model: Option<Arc<dyn GenerativeModel>>,
    slot: IndexSlot,
}

impl QueryEngine {
    pub fn new(
        settings: Settings,
        base_dir: impl Into<PathBuf>,
        embedder: Arc<dyn Embedder>,
        model: Option<Arc<dyn GenerativeModel>>,
    ) -> Self {
        Self {
            settings,
            base_dir: base_dir.into(),
            embedder,
            model,
            slot: IndexSlot::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Directory holding the persisted index artifacts.
    pub fn index_dir(&self) -> PathBuf {
        resolve_with_base(&self.base_dir, &self.settings.data.index_dir)
    }

    /// Directory the request agent writes solicitud artifacts into.
    pub fn requests_dir(&self) -> PathBuf {
        resolve_with_base(&self.base_dir, &self.settings.data.requests_dir)
    }

    /// Snapshot of the current index, if any. Callers holding the `Arc`
    /// keep a consistent view across concurrent rebuilds.
    pub fn index_snapshot(&self) -> Option<Arc<VectorIndex>> {
        self.slot.snapshot()
    }

    /// Try to load previously persisted artifacts into the slot.
    ///
    /// Returns `Ok(false)` when no artifacts exist (cold start — not an
    /// error). Corrupt or inconsistent artifacts, or artifacts built by a
    /// different embedding model, are `IndexIntegrity` errors and leave
    /// the slot untouched.
    pub fn load_index(&self) -> Result<bool> {
        let dir = self.index_dir();
        if !store::artifacts_exist(&dir) {
            tracing::info!(dir = %dir.display(), "no index artifacts found, staying cold");
            return Ok(false);
        }
        let index = VectorIndex::load(&dir)?;
        self.verify_model(&index)?;
        tracing::info!(fragments = index.len(), "index loaded");
        self.slot.install(index);
        Ok(true)
    }

    fn verify_model(&self, index: &VectorIndex) -> Result<()> {
        if index.model_id() != self.embedder.model_id() {
            return Err(Error::IndexIntegrity(format!(
                "index was built with model '{}' but the configured embedder is '{}'",
                index.model_id(),
                self.embedder.model_id()
            )));
        }
        if index.dim() != self.embedder.dim() {
            return Err(Error::IndexIntegrity(format!(
                "index dimensionality {} does not match embedder output {}",
                index.dim(),
                self.embedder.dim()
            )));
        }
        Ok(())
    }

    /// Tri-state health signal for the hosting surface.
    pub fn readiness(&self) -> Readiness {
        if self.model.is_none() {
            Readiness::Misconfigured
        } else if !self.slot.is_ready() {
            Readiness::NotBuilt
        } else {
            Readiness::Ready
        }
    }

    /// Run the full build phase: normalize → chunk → embed → persist →
    /// swap. Idempotent; safe to call repeatedly. Queries in flight keep
    /// their snapshot of the previous index until they finish.
    pub async fn rebuild(&self) -> Result<BuildReport> {
        let raw_dir = resolve_with_base(&self.base_dir, &self.settings.data.raw_dir);
        let clean_dir = resolve_with_base(&self.base_dir, &self.settings.data.clean_dir);

        let documents = load_documents(&raw_dir).map_err(|e| Error::Extraction {
            path: raw_dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let splitter = TextSplitter::new(
            self.settings.chunking.chunk_size,
            self.settings.chunking.chunk_overlap,
        );

        let mut fragments: Vec<Fragment> = Vec::new();
        let mut skipped = Vec::new();
        let mut indexed_documents = 0usize;
        for doc in &documents {
            if doc.text.is_empty() {
                skipped.push(doc.source.clone());
                continue;
            }
            write_clean_copy(&clean_dir, &doc.source, &doc.text);
            let doc_fragments = splitter.fragment(&doc.text, &doc.source);
            tracing::debug!(source = %doc.source, fragments = doc_fragments.len(), "chunked");
            fragments.extend(doc_fragments);
            indexed_documents += 1;
        }
        if fragments.is_empty() {
            tracing::warn!(dir = %raw_dir.display(), "rebuild produced an empty index");
        }

        let vectors = self.embed_fragments(&fragments).await?;
        let index = VectorIndex::build(
            fragments,
            vectors,
            self.embedder.model_id(),
            self.embedder.dim(),
        )?;
        index.save(&self.index_dir())?;

        let report = BuildReport {
            documents: indexed_documents,
            fragments: index.len(),
            skipped,
        };
        // The swap is the last step: nothing observes the new index until
        // it is complete and persisted.
        self.slot.install(index);
        tracing::info!(
            documents = report.documents,
            fragments = report.fragments,
            "index rebuilt"
        );
        Ok(report)
    }

    async fn embed_fragments(&self, fragments: &[Fragment]) -> Result<Vec<Vec<f32>>> {
        let pb = ProgressBar::new(fragments.len() as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} fragments")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        let mut vectors = Vec::with_capacity(fragments.len());
        for batch in fragments.chunks(EMBED_BATCH) {
            let texts: Vec<String> = batch.iter().map(|f| f.text.clone()).collect();
            let batch_vectors = self
                .embedder
                .embed_batch(&texts)
                .await
                .map_err(|e| Error::Embedding(e.to_string()))?;
            vectors.extend(batch_vectors);
            pb.inc(batch.len() as u64);
        }
        pb.finish_and_clear();
        Ok(vectors)
    }

    /// Answer a question grounded on the indexed corpus.
    ///
    /// The two precondition failures are distinct variants so callers can
    /// tell "configure an API key" from "run a rebuild". Model failures
    /// come back as `Error::Generation`; nothing here panics or escapes
    /// untyped.
    pub async fn answer(&self, question: &str) -> Result<GroundedAnswer> {
        let model = self.model.as_ref().ok_or_else(|| {
            Error::Config("no generative model API key is configured".to_string())
        })?;
        let index = self.slot.snapshot().ok_or(Error::IndexNotReady)?;

        let question_vec = self
            .embedder
            .embed_batch(&[question.to_string()])
            .await
            .map_err(|e| Error::Embedding(e.to_string()))?
            .pop()
            .ok_or_else(|| Error::Embedding("embedder returned no vector".to_string()))?;

        let hits = index.search(&question_vec, self.settings.retrieval.top_k)?;
        let relevant: Vec<_> = hits.into_iter().filter(|h| h.score > 0.0).collect();
        if relevant.is_empty() {
            tracing::debug!(question, "no relevant fragments, declining without a model call");
            return Ok(GroundedAnswer {
                answer: prompt::NO_INFORMATION_ANSWER.to_string(),
                sources: vec![],
            });
        }

        let context =
            prompt::compose_context(relevant.iter().map(|h| index.fragment(h.index).text.as_str()));
        let full_prompt = prompt::build_prompt(question, &context);

        let answer = model
            .generate(&full_prompt)
            .await
            .map_err(|e| Error::Generation(e.to_string()))?;

        // Citations come from retrieval metadata, deduplicated in
        // relevance order. The model's own source list is display text.
        let mut sources: Vec<String> = Vec::new();
        for hit in &relevant {
            let source = &index.fragment(hit.index).metadata.source;
            if !sources.iter().any(|s| s == source) {
                sources.push(source.clone());
            }
        }

        Ok(GroundedAnswer { answer, sources })
    }
}

/// Best-effort cache of the normalized text; failures are logged, never
/// fatal to the build.
fn write_clean_copy(clean_dir: &Path, source: &str, text: &str) {
    if let Err(e) = std::fs::create_dir_all(clean_dir)
        .and_then(|()| std::fs::write(clean_dir.join(format!("{source}.txt")), text))
    {
        tracing::warn!(source, error = %e, "could not write normalized text cache");
    }
}
