//! Topic-model provider: wraps a pretrained topic model served over HTTP,
//! with a deterministic stub for development and tests.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Probability output of the topic model. Pretrained artifacts emit either a
/// per-document scalar or a per-class vector depending on how they were
/// trained; both shapes must be accepted.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TopicProbability {
    Scalar(f32),
    PerClass(Vec<f32>),
}

impl TopicProbability {
    /// Collapse to a single confidence value: vectors contribute their
    /// maximum, scalars pass through. An empty vector carries no signal.
    pub fn confidence(&self) -> Option<f32> {
        match self {
            TopicProbability::Scalar(p) => Some(*p),
            TopicProbability::PerClass(probs) => {
                probs.iter().copied().reduce(f32::max)
            }
        }
    }
}

/// One transform result: an opaque cluster id plus optional probability.
#[derive(Debug, Clone)]
pub struct TopicPrediction {
    pub topic: i64,
    pub probability: Option<TopicProbability>,
}

#[async_trait]
pub trait TopicModel: Send + Sync {
    async fn transform(&self, text: &str) -> Result<TopicPrediction>;
}

// Remote inference service implementation
pub struct RemoteTopicModel {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Serialize)]
struct TransformRequest<'a> {
    documents: Vec<&'a str>,
}

#[derive(Deserialize)]
struct TransformResponse {
    topics: Vec<i64>,
    #[serde(default)]
    probabilities: Option<Vec<TopicProbability>>,
}

impl RemoteTopicModel {
    pub fn new(endpoint: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to build reqwest client with timeout")?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl TopicModel for RemoteTopicModel {
    async fn transform(&self, text: &str) -> Result<TopicPrediction> {
        debug!("Requesting topic transform ({} chars)", text.len());

        let request = TransformRequest {
            documents: vec![text],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to topic model endpoint")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Topic model error {}: {}", status, error_text);
        }

        let result: TransformResponse = response
            .json()
            .await
            .context("Failed to parse topic model response")?;

        let topic = result
            .topics
            .into_iter()
            .next()
            .context("No topic returned from topic model")?;
        let probability = result.probabilities.and_then(|p| p.into_iter().next());

        Ok(TopicPrediction { topic, probability })
    }
}

// Fixed-output stub for development and tests (no network)
pub struct StubTopicModel {
    topic: i64,
    probability: Option<TopicProbability>,
}

impl StubTopicModel {
    pub fn new(topic: i64, probability: Option<TopicProbability>) -> Self {
        Self { topic, probability }
    }

    /// A stub that always predicts the outlier cluster, which maps to no
    /// category and therefore always abstains.
    pub fn outlier() -> Self {
        Self::new(-1, None)
    }
}

#[async_trait]
impl TopicModel for StubTopicModel {
    async fn transform(&self, _text: &str) -> Result<TopicPrediction> {
        Ok(TopicPrediction {
            topic: self.topic,
            probability: self.probability.clone(),
        })
    }
}

/// Build the configured topic model. Returns None when the provider is
/// disabled or misconfigured; the caller then runs without the topic layer.
pub fn create_topic_model(config: &Config) -> Option<Arc<dyn TopicModel>> {
    match config.system.topic_provider.as_str() {
        "remote" => {
            let endpoint = config.system.topic_endpoint.trim();
            if endpoint.is_empty() {
                warn!("Topic provider 'remote' configured but topic_endpoint is empty");
                return None;
            }
            match RemoteTopicModel::new(endpoint.to_string()) {
                Ok(model) => {
                    info!("Using remote topic model at {}", endpoint);
                    Some(Arc::new(model))
                }
                Err(e) => {
                    warn!("Failed to construct remote topic model: {}", e);
                    None
                }
            }
        }
        "stub" => {
            info!("Using stub topic model (outlier cluster)");
            Some(Arc::new(StubTopicModel::outlier()))
        }
        "none" | "" => None,
        other => {
            warn!("Unknown topic provider '{}'", other);
            None
        }
    }
}
