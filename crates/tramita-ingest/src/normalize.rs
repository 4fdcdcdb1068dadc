//! Per-document text extraction and cleanup.
//!
//! Every document fails in isolation: an unreadable PDF produces an empty
//! string and a warning, never an aborted batch. Callers filter out empty
//! results before chunking.

use std::fs;
use std::path::{Path, PathBuf};

/// One source document with its normalized text.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// File stem, the identifier fragments cite.
    pub source: String,
    pub text: String,
}

/// Collapse every run of whitespace (newlines included) into a single
/// space and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Walk `raw_dir` and extract normalized text from every supported file,
/// in sorted path order so rebuilds are reproducible.
///
/// Documents with no extractable text come back with an empty `text`; the
/// caller is expected to skip them (and report them in the build summary).
pub fn load_documents(raw_dir: &Path) -> anyhow::Result<Vec<SourceDocument>> {
    let files = list_document_files(raw_dir);
    if files.is_empty() {
        tracing::warn!(dir = %raw_dir.display(), "no documents found to ingest");
        return Ok(vec![]);
    }

    let mut documents = Vec::with_capacity(files.len());
    for path in files {
        let source = doc_id(&path);
        let text = match extract_text(&path) {
            Ok(text) => normalize_whitespace(&text),
            Err(e) => {
                tracing::warn!(source = %source, error = %e, "extraction failed, skipping document");
                String::new()
            }
        };
        if text.is_empty() {
            tracing::warn!(source = %source, "document yielded no text");
        }
        documents.push(SourceDocument { source, text });
    }
    Ok(documents)
}

/// Extract raw (un-normalized) text from one file.
fn extract_text(path: &Path) -> anyhow::Result<String> {
    match extension(path).as_deref() {
        Some("pdf") => {
            // pdf-extract may grumble about ligature glyphs on stderr;
            // that output is informational only.
            pdf_extract::extract_text(path)
                .map_err(|e| anyhow::anyhow!("pdf extraction failed: {e}"))
        }
        Some("txt") | Some("md") => read_text_lossy(path),
        other => anyhow::bail!("unsupported extension: {:?}", other),
    }
}

/// Read as UTF-8, falling back to a lossy decode for stray encodings.
fn read_text_lossy(path: &Path) -> anyhow::Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(_) => Ok(String::from_utf8_lossy(&fs::read(path)?).to_string()),
    }
}

fn doc_id(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
}

fn list_document_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().to_path_buf())
        .filter(|p| {
            matches!(
                extension(p).as_deref(),
                Some("pdf") | Some("txt") | Some("md")
            )
        })
        .collect();
    files.sort();
    files
}
