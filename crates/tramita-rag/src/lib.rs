//! Retrieval-augmented query engine for administrative documents.
//!
//! [`QueryEngine`] owns the pipeline: rebuild (normalize → chunk → embed →
//! persist → swap), query-time retrieval, prompt grounding and the single
//! model call. [`agent`] layers the instruction classifier and solicitud
//! artifacts on top; [`log`] appends one JSONL record per interaction.

pub mod agent;
mod engine;
pub mod log;
mod model;
pub mod prompt;

pub use engine::QueryEngine;
pub use model::GeminiClient;
