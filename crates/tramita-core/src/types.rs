//! Domain types shared by the ingest, index and query crates.

use serde::{Deserialize, Serialize};

/// A bounded span of source-document text, the unit of retrieval.
///
/// The serde shape is exactly the persisted record
/// (`{"text": …, "metadata": {"source": …, "chunk_id": …}}`), so the
/// in-memory struct and the on-disk `fragments.json` rows are one and the
/// same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    pub metadata: FragmentMeta,
}

/// Provenance of a fragment.
///
/// - `source`: file stem of the originating document, used for citation
/// - `chunk_id`: zero-based position within the source document, kept for
///   traceability only (retrieval ranking never looks at it)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentMeta {
    pub source: String,
    pub chunk_id: usize,
}

impl Fragment {
    pub fn new(text: impl Into<String>, source: impl Into<String>, chunk_id: usize) -> Self {
        Self {
            text: text.into(),
            metadata: FragmentMeta {
                source: source.into(),
                chunk_id,
            },
        }
    }
}

/// One similarity-search result: the position of the fragment inside the
/// index plus its cosine score. Higher is always better.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub index: usize,
    pub score: f32,
}

/// The result of a successful grounded query.
///
/// `sources` is derived from retrieval metadata (deduplicated, in relevance
/// order), never parsed out of the model's free text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundedAnswer {
    pub answer: String,
    pub sources: Vec<String>,
}

/// Summary of one build-phase run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildReport {
    /// Documents that contributed at least one fragment.
    pub documents: usize,
    /// Total fragments in the freshly installed index.
    pub fragments: usize,
    /// Documents skipped because no text could be extracted.
    pub skipped: Vec<String>,
}

/// Tri-state health signal surfaced to whatever hosts the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Readiness {
    /// Index loaded and a generative model is configured.
    Ready,
    /// Configuration is fine but no index has been built yet.
    NotBuilt,
    /// No generative model credential; queries cannot be served.
    Misconfigured,
}
