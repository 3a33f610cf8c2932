//! Hybrid classification engine: an ordered stack of classifier layers
//! tried in priority order, short-circuiting on the first confident match.

use crate::config::Config;
use crate::embeddings::create_embedder;
use crate::taxonomy::Category;
use crate::topics::create_topic_model;
use async_trait::async_trait;
use serde::{Serialize, Serializer};
use tracing::{debug, info, warn};

pub mod keyword;
pub mod semantic;
pub mod topic;

pub use keyword::KeywordLayer;
pub use semantic::{AnchorSet, SemanticLayer};
pub use topic::TopicLayer;

/// Inputs shorter than this (after trimming) carry no classifiable signal.
pub const MIN_TEXT_CHARS: usize = 5;

/// How a classification was produced. Serialized as the human-readable
/// label shown in reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Method {
    KeywordMatch,
    TopicCluster(i64),
    SemanticSimilarity,
    SystemDefault,
    InsufficientData,
}

impl Method {
    pub fn label(&self) -> String {
        match self {
            Method::KeywordMatch => "Manual Keyword Match".to_string(),
            Method::TopicCluster(id) => format!("AI Cluster {}", id),
            Method::SemanticSimilarity => "AI Semantic Similarity".to_string(),
            Method::SystemDefault => "System Default".to_string(),
            Method::InsufficientData => "Insufficient Data".to_string(),
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for Method {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

/// One classification outcome. Confidence is clamped into [0,1] at
/// construction so provider quirks can't violate the invariant.
#[derive(Debug, Clone, Serialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub method: Method,
    pub confidence: f32,
}

impl ClassificationResult {
    pub fn new(category: Category, method: Method, confidence: f32) -> Self {
        Self {
            category,
            method,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

/// A single layer in the classification stack. Layers abstain with None;
/// internal failures are logged and treated as abstention.
#[async_trait]
pub trait ClassifierLayer: Send + Sync {
    fn name(&self) -> &'static str;
    async fn try_classify(&self, text: &str) -> Option<ClassificationResult>;
}

/// The hybrid engine: guard, then layers in order, then system default.
pub struct HybridClassifier {
    layers: Vec<Box<dyn ClassifierLayer>>,
}

impl HybridClassifier {
    pub fn new(layers: Vec<Box<dyn ClassifierLayer>>) -> Self {
        Self { layers }
    }

    /// Assemble the layer stack from the configured providers. A provider
    /// that failed to load means its layer is not installed; that is a
    /// degraded mode, never an error.
    pub async fn from_config(config: &Config) -> Self {
        let mut layers: Vec<Box<dyn ClassifierLayer>> = vec![Box::new(KeywordLayer)];

        match create_topic_model(config) {
            Some(model) => layers.push(Box::new(TopicLayer::new(model))),
            None => info!("Topic model unavailable, topic layer skipped"),
        }

        match create_embedder(config) {
            Some(embedder) => match AnchorSet::build(embedder.as_ref()).await {
                Ok(anchors) => {
                    layers.push(Box::new(SemanticLayer::new(
                        embedder,
                        anchors,
                        config.scoring.similarity_threshold,
                    )));
                }
                Err(e) => {
                    warn!("Failed to embed anchor phrases, semantic layer skipped: {}", e);
                }
            },
            None => info!("Embedding model unavailable, semantic layer skipped"),
        }

        info!(
            "Classifier layers: {}",
            layers
                .iter()
                .map(|l| l.name())
                .collect::<Vec<_>>()
                .join(" -> ")
        );
        Self::new(layers)
    }

    pub async fn classify(&self, text: &str) -> ClassificationResult {
        if text.trim().chars().count() < MIN_TEXT_CHARS {
            return ClassificationResult::new(
                Category::HealthyLowRisk,
                Method::InsufficientData,
                0.0,
            );
        }

        for layer in &self.layers {
            if let Some(result) = layer.try_classify(text).await {
                debug!(
                    "Layer '{}' classified as {} (confidence {:.3})",
                    layer.name(),
                    result.category,
                    result.confidence
                );
                return result;
            }
        }

        ClassificationResult::new(Category::HealthyLowRisk, Method::SystemDefault, 0.0)
    }
}
