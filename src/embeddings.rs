use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    fn dimensions(&self) -> usize;
}

// OpenAI API implementation
pub struct OpenAIEmbedder {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dims: usize,
}

#[derive(Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct OpenAIResponseData {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    data: Vec<OpenAIResponseData>,
}

impl OpenAIEmbedder {
    pub fn new(api_key: String, model: String, dims: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(20))
            .build()
            .context("Failed to build reqwest client with timeout")?;

        Ok(Self {
            client,
            api_key,
            model,
            dims,
        })
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(
            "Generating OpenAI embedding (model={}, chars={})",
            self.model,
            text.len()
        );

        let body = OpenAIRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/embeddings")
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to OpenAI API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI API error {}: {}", status, error_text);
        }

        let result: OpenAIResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;

        result
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .context("No embedding returned from OpenAI")
    }

    fn dimensions(&self) -> usize {
        self.dims
    }
}

// Deterministic, local FakeEmbedder for testing/dev (no network)
pub struct FakeEmbedder {
    dims: usize,
}

impl FakeEmbedder {
    pub fn new(dims: usize) -> Self {
        Self { dims: dims.max(1) }
    }

    // Stable stream of pseudo-random f32 values derived from hash(text || i),
    // normalized to unit length to emulate real embeddings
    fn generate(&self, text: &str) -> Vec<f32> {
        use sha2::{Digest, Sha256};
        let mut out = Vec::with_capacity(self.dims);
        let mut i: u32 = 0;
        while out.len() < self.dims {
            let mut hasher = Sha256::new();
            hasher.update(text.as_bytes());
            hasher.update(i.to_le_bytes());
            let digest = hasher.finalize();
            for chunk in digest.chunks(4) {
                if out.len() >= self.dims {
                    break;
                }
                let mut bytes = [0u8; 4];
                bytes.copy_from_slice(chunk);
                let val_u32 = u32::from_le_bytes(bytes);
                // Map to [0,1) then to [-1,1)
                let v01 = (val_u32 as f32) / (u32::MAX as f32 + 1.0);
                out.push(v01 * 2.0 - 1.0);
            }
            i = i.wrapping_add(1);
        }

        let norm: f32 = out.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut out {
                *v /= norm;
            }
        }
        out
    }
}

#[async_trait]
impl Embedder for FakeEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.generate(text))
    }

    fn dimensions(&self) -> usize {
        self.dims
    }
}

/// Build the configured embedder. Returns None when no usable provider is
/// available; the caller then runs without the semantic similarity layer.
pub fn create_embedder(config: &Config) -> Option<Arc<dyn Embedder>> {
    let is_placeholder = |s: &str| {
        let t = s.trim();
        t.is_empty()
            || t.contains("${")
            || t.eq_ignore_ascii_case("your-api-key-here")
            || t.eq_ignore_ascii_case("changeme")
    };

    match config.system.embedding_provider.as_str() {
        "openai" => {
            let key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
            if is_placeholder(&key) {
                warn!("Embedding provider 'openai' configured but OPENAI_API_KEY is not set");
                return None;
            }
            let model = config.system.embedding_model.clone();
            let dims = config.system.embedding_dimensions;
            match OpenAIEmbedder::new(key, model.clone(), dims) {
                Ok(embedder) => {
                    info!("Using OpenAI embeddings (model={}, dim={})", model, dims);
                    Some(Arc::new(embedder))
                }
                Err(e) => {
                    warn!("Failed to construct OpenAI embedder: {}", e);
                    None
                }
            }
        }
        "fake" => {
            let fake = FakeEmbedder::new(config.system.embedding_dimensions);
            info!(
                "Using FakeEmbedder (deterministic) with {} dimensions",
                fake.dimensions()
            );
            Some(Arc::new(fake))
        }
        "none" | "" => None,
        other => {
            warn!("Unknown embedding provider '{}'", other);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fake_embedder_is_deterministic() {
        let fe = FakeEmbedder::new(128);
        let a1 = fe.embed("hello world").await.unwrap();
        let a2 = fe.embed("hello world").await.unwrap();
        assert_eq!(a1.len(), 128);
        assert_eq!(a2.len(), 128);
        assert!(a1.iter().zip(&a2).all(|(x, y)| (x - y).abs() < 1e-8));
    }

    #[tokio::test]
    async fn fake_embedder_varies_with_input() {
        let fe = FakeEmbedder::new(384);
        let a = fe.embed("foo").await.unwrap();
        let b = fe.embed("bar").await.unwrap();
        assert!(a.iter().zip(&b).any(|(x, y)| (x - y).abs() > 1e-6));
    }

    #[tokio::test]
    async fn fake_embedder_output_is_unit_length() {
        let fe = FakeEmbedder::new(64);
        let v = fe.embed("some survey answer").await.unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }
}
