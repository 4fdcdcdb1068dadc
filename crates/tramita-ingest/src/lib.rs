//! Document ingestion: normalization and chunking.
//!
//! [`normalize`] turns raw documents (.pdf / .txt / .md) into cleaned plain
//! text, one string per document. [`chunker`] splits that text into
//! overlapping fragments ready for embedding.

pub mod chunker;
pub mod normalize;

pub use chunker::TextSplitter;
pub use normalize::{load_documents, normalize_whitespace, SourceDocument};
