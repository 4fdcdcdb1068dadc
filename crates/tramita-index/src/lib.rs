//! In-memory vector index: parallel fragment/vector arrays, cosine
//! linear-scan search, and an atomically swappable slot for the running
//! instance.

pub mod store;

use std::path::Path;
use std::sync::{Arc, RwLock};

use tramita_core::error::{Error, Result};
use tramita_core::types::{Fragment, SearchHit};

/// The ordered pairing of fragments and their embedding vectors, plus the
/// identity of the model that produced them.
///
/// Either the whole thing exists and is internally consistent, or it does
/// not exist at all — [`VectorIndex::build`] and [`store::load`] both
/// validate before handing an instance out, so holding a `VectorIndex`
/// means the invariants hold.
pub struct VectorIndex {
    fragments: Vec<Fragment>,
    vectors: Vec<Vec<f32>>,
    model: String,
    dim: usize,
}

impl VectorIndex {
    /// Pair up fragments and vectors, verifying the integrity invariants:
    /// equal counts and uniform dimensionality.
    pub fn build(
        fragments: Vec<Fragment>,
        vectors: Vec<Vec<f32>>,
        model: impl Into<String>,
        dim: usize,
    ) -> Result<Self> {
        if fragments.len() != vectors.len() {
            return Err(Error::IndexIntegrity(format!(
                "{} fragments but {} vectors",
                fragments.len(),
                vectors.len()
            )));
        }
        if let Some((i, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != dim) {
            return Err(Error::IndexIntegrity(format!(
                "vector {} has dimension {} (expected {})",
                i,
                v.len(),
                dim
            )));
        }
        Ok(Self {
            fragments,
            vectors,
            model: model.into(),
            dim,
        })
    }

    /// Load a persisted index from `dir`, refusing anything inconsistent.
    pub fn load(dir: &Path) -> Result<Self> {
        store::load(dir)
    }

    /// Persist the index under `dir` (fragments.json, embeddings.json,
    /// manifest.json).
    pub fn save(&self, dir: &Path) -> Result<()> {
        store::save(self, dir)
    }

    /// Top-`k` fragments by cosine similarity to `query`, descending.
    ///
    /// A full linear scan; ranking is a stable sort, so equal scores keep
    /// insertion order. Returns fewer than `k` hits only when the index
    /// holds fewer than `k` fragments.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if query.len() != self.dim {
            return Err(Error::IndexIntegrity(format!(
                "query vector has dimension {} (index expects {})",
                query.len(),
                self.dim
            )));
        }
        let mut hits: Vec<SearchHit> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(index, v)| SearchHit {
                index,
                score: cosine_similarity(query, v),
            })
            .collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);
        Ok(hits)
    }

    pub fn fragment(&self, index: usize) -> &Fragment {
        &self.fragments[index]
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub(crate) fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    pub fn model_id(&self) -> &str {
        &self.model
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Cosine similarity with a zero-norm guard (a zero vector scores 0.0
/// against everything rather than NaN).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a <= f32::EPSILON || norm_b <= f32::EPSILON {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Holder for the running index with swap-on-rebuild semantics.
///
/// Readers take an `Arc` snapshot once per query and never observe a
/// partially built index: `install` replaces the whole index in one write.
#[derive(Default)]
pub struct IndexSlot {
    inner: RwLock<Option<Arc<VectorIndex>>>,
}

impl IndexSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the current index, or `None` while cold.
    pub fn snapshot(&self) -> Option<Arc<VectorIndex>> {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Atomically replace the index. In-flight queries keep whatever
    /// snapshot they already hold.
    pub fn install(&self, index: VectorIndex) {
        let mut guard = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(Arc::new(index));
    }

    pub fn is_ready(&self) -> bool {
        self.snapshot().is_some()
    }
}
