//! Instruction classification and the request agent.
//!
//! The agent answers an instruction through the query engine and, when the
//! instruction asks for it, drops a solicitud artifact (a JSON file with
//! the instruction, the grounded answer and its sources) into the requests
//! directory. Whether to create the artifact is decided by an
//! [`InstructionClassifier`], a seam that keeps the decision testable and
//! replaceable independently of the agent.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tramita_core::error::Result;
use tramita_core::types::GroundedAnswer;

use crate::engine::QueryEngine;

/// What an instruction asks the agent to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Plain question; answer and stop.
    AnswerOnly,
    /// The user wants a request document drafted from the answer.
    CreateArtifact,
}

pub trait InstructionClassifier: Send + Sync {
    fn classify(&self, instruction: &str) -> TaskKind;
}

/// Default classifier: a creation verb and an artifact noun must both
/// appear. "¿Cuál es el plazo?" answers only; "crea una solicitud de
/// ejemplo" creates the artifact.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordClassifier;

const CREATION_VERBS: [&str; 4] = ["crear", "crea", "generar", "genera"];
const ARTIFACT_NOUNS: [&str; 2] = ["solicitud", "documento"];

impl InstructionClassifier for KeywordClassifier {
    fn classify(&self, instruction: &str) -> TaskKind {
        let lowered = instruction.to_lowercase();
        let wants_creation = CREATION_VERBS.iter().any(|v| contains_word(&lowered, v));
        let names_artifact = ARTIFACT_NOUNS.iter().any(|n| contains_word(&lowered, n));
        if wants_creation && names_artifact {
            TaskKind::CreateArtifact
        } else {
            TaskKind::AnswerOnly
        }
    }
}

/// Whole-word match so "creatividad" does not trigger "crea".
fn contains_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .any(|token| token == word)
}

/// The solicitud artifact written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestRecord {
    pub user_id: String,
    pub instruction: String,
    pub answer: String,
    pub sources: Vec<String>,
    pub created_at: String,
}

/// What the agent did with an instruction.
#[derive(Debug, Clone)]
pub enum AgentAction {
    Answered(GroundedAnswer),
    ArtifactCreated {
        path: PathBuf,
        record: RequestRecord,
    },
}

impl AgentAction {
    /// Short tag for the interaction log.
    pub fn tag(&self) -> &'static str {
        match self {
            AgentAction::Answered(_) => "answer_only",
            AgentAction::ArtifactCreated { .. } => "created_solicitud",
        }
    }
}

pub struct RequestAgent {
    engine: Arc<QueryEngine>,
    classifier: Box<dyn InstructionClassifier>,
}

impl RequestAgent {
    pub fn new(engine: Arc<QueryEngine>) -> Self {
        Self::with_classifier(engine, Box::new(KeywordClassifier))
    }

    pub fn with_classifier(
        engine: Arc<QueryEngine>,
        classifier: Box<dyn InstructionClassifier>,
    ) -> Self {
        Self { engine, classifier }
    }

    /// Answer the instruction and, if classified as artifact-worthy, write
    /// the solicitud file. Engine errors propagate typed; only a
    /// successfully answered instruction can produce an artifact.
    pub async fn perform(&self, instruction: &str, user_id: &str) -> Result<AgentAction> {
        let kind = self.classifier.classify(instruction);
        let answer = self.engine.answer(instruction).await?;

        match kind {
            TaskKind::AnswerOnly => Ok(AgentAction::Answered(answer)),
            TaskKind::CreateArtifact => {
                let record = RequestRecord {
                    user_id: user_id.to_string(),
                    instruction: instruction.to_string(),
                    answer: answer.answer,
                    sources: answer.sources,
                    created_at: Utc::now().format("%Y%m%dT%H%M%SZ").to_string(),
                };
                let dir = self.engine.requests_dir();
                fs::create_dir_all(&dir)?;
                let path = dir.join(format!("solicitud_{}_{}.json", user_id, record.created_at));
                fs::write(&path, serde_json::to_vec_pretty(&record)?)?;
                tracing::info!(path = %path.display(), "solicitud artifact created");
                Ok(AgentAction::ArtifactCreated { path, record })
            }
        }
    }
}
