//! Gemini `batchEmbedContents` client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tramita_core::traits::Embedder;

pub struct GeminiEmbedder {
    base_url: String,
    model: String,
    dim: usize,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiEmbedder {
    pub fn new(base_url: String, model: String, dim: usize, api_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            dim,
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedRequest>,
}

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    content: Content,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn dim(&self) -> usize {
        self.dim
    }

    async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        let url = format!(
            "{}/models/{}:batchEmbedContents?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedRequest {
                    model: format!("models/{}", self.model),
                    content: Content {
                        parts: vec![Part { text: text.clone() }],
                    },
                })
                .collect(),
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("embedding API returned {status}: {detail}");
        }
        let parsed: BatchEmbedResponse = response.json().await?;

        // The index invariant rests on exactly one vector per input, each
        // of the configured dimensionality. Fail the batch on any drift.
        if parsed.embeddings.len() != texts.len() {
            anyhow::bail!(
                "embedding count mismatch: sent {} texts, got {} vectors",
                texts.len(),
                parsed.embeddings.len()
            );
        }
        let mut vectors = Vec::with_capacity(parsed.embeddings.len());
        for (i, e) in parsed.embeddings.into_iter().enumerate() {
            if e.values.len() != self.dim {
                anyhow::bail!(
                    "embedding {} has dimension {} (expected {})",
                    i,
                    e.values.len(),
                    self.dim
                );
            }
            vectors.push(e.values);
        }
        Ok(vectors)
    }
}
