//! JSONL interaction log.
//!
//! One appended record per query or agent run. Logging must never break
//! the interaction it records: every failure here is a warning, not an
//! error.

use chrono::Utc;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Inputs and outputs are clipped to this many characters in the log.
const FIELD_LIMIT: usize = 500;

#[derive(Debug, Serialize)]
pub struct InteractionRecord<'a> {
    pub timestamp: String,
    pub operation: &'a str,
    pub user_id: &'a str,
    pub input: String,
    pub output: String,
    pub latency_ms: u128,
    pub sources: &'a [String],
    pub action: Option<&'a str>,
}

pub struct InteractionLogger {
    path: PathBuf,
}

impl InteractionLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one record. Truncates free text on char boundaries so a
    /// multi-byte character at the cut point cannot corrupt the line.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &self,
        operation: &str,
        user_id: &str,
        input: &str,
        output: &str,
        latency_ms: u128,
        sources: &[String],
        action: Option<&str>,
    ) {
        let record = InteractionRecord {
            timestamp: Utc::now().to_rfc3339(),
            operation,
            user_id,
            input: clip(input),
            output: clip(output),
            latency_ms,
            sources,
            action,
        };
        if let Err(e) = self.append(&record) {
            tracing::warn!(error = %e, "failed to append interaction record");
        }
    }

    fn append(&self, record: &InteractionRecord<'_>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let line = serde_json::to_string(record)?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

fn clip(text: &str) -> String {
    text.chars().take(FIELD_LIMIT).collect()
}
