//! On-disk persistence for the index.
//!
//! Three files under the index directory:
//! - `fragments.json` — ordered `{text, metadata: {source, chunk_id}}` records
//! - `embeddings.json` — dense float rows, row i belongs to fragment i
//! - `manifest.json`  — embedding model id, dimensionality, fragment count
//!
//! The positional correspondence between the first two files is the
//! on-disk invariant; [`load`] re-validates it (plus dimensionality and
//! the manifest count) and refuses to produce an index otherwise.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::VectorIndex;
use tramita_core::error::{Error, Result};
use tramita_core::types::Fragment;

pub const FRAGMENTS_FILE: &str = "fragments.json";
pub const EMBEDDINGS_FILE: &str = "embeddings.json";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub model: String,
    pub dim: usize,
    pub fragment_count: usize,
}

pub fn save(index: &VectorIndex, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    let manifest = Manifest {
        model: index.model_id().to_string(),
        dim: index.dim(),
        fragment_count: index.len(),
    };
    fs::write(
        dir.join(FRAGMENTS_FILE),
        serde_json::to_vec_pretty(index.fragments())?,
    )?;
    fs::write(
        dir.join(EMBEDDINGS_FILE),
        serde_json::to_vec(index.vectors())?,
    )?;
    fs::write(dir.join(MANIFEST_FILE), serde_json::to_vec_pretty(&manifest)?)?;
    tracing::info!(
        fragments = index.len(),
        dir = %dir.display(),
        "index persisted"
    );
    Ok(())
}

/// True when all three artifact files are present.
pub fn artifacts_exist(dir: &Path) -> bool {
    dir.join(FRAGMENTS_FILE).is_file()
        && dir.join(EMBEDDINGS_FILE).is_file()
        && dir.join(MANIFEST_FILE).is_file()
}

pub fn load(dir: &Path) -> Result<VectorIndex> {
    let manifest: Manifest = read_json(&dir.join(MANIFEST_FILE))?;
    let fragments: Vec<Fragment> = read_json(&dir.join(FRAGMENTS_FILE))?;
    let vectors: Vec<Vec<f32>> = read_json(&dir.join(EMBEDDINGS_FILE))?;

    if fragments.len() != manifest.fragment_count {
        return Err(Error::IndexIntegrity(format!(
            "manifest declares {} fragments, file holds {}",
            manifest.fragment_count,
            fragments.len()
        )));
    }
    VectorIndex::build(fragments, vectors, manifest.model, manifest.dim)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}
