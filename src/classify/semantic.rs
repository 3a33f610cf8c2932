//! Third layer: semantic similarity against precomputed anchor embeddings.

use super::{ClassificationResult, ClassifierLayer, Method};
use crate::embeddings::Embedder;
use crate::taxonomy::{ANCHOR_PHRASES, Category};
use crate::utils::math::cosine_similarity;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// Anchor embeddings per category, built once at startup and read-only for
/// the process lifetime.
pub struct AnchorSet {
    anchors: Vec<(Category, Vec<f32>)>,
}

impl AnchorSet {
    /// Embed every anchor phrase with the given embedder. A failure here
    /// means the semantic layer cannot be installed.
    pub async fn build(embedder: &dyn Embedder) -> anyhow::Result<Self> {
        let mut anchors = Vec::new();
        for (category, phrases) in ANCHOR_PHRASES {
            for phrase in *phrases {
                let embedding = embedder.embed(phrase).await?;
                anchors.push((*category, embedding));
            }
        }
        debug!("Built anchor set with {} embeddings", anchors.len());
        Ok(Self { anchors })
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

/// Embeds the input and tracks the globally best-scoring anchor. Scores at
/// or below the threshold abstain so the engine's default applies.
pub struct SemanticLayer {
    embedder: Arc<dyn Embedder>,
    anchors: AnchorSet,
    threshold: f32,
}

impl SemanticLayer {
    pub fn new(embedder: Arc<dyn Embedder>, anchors: AnchorSet, threshold: f32) -> Self {
        Self {
            embedder,
            anchors,
            threshold,
        }
    }
}

#[async_trait]
impl ClassifierLayer for SemanticLayer {
    fn name(&self) -> &'static str {
        "semantic"
    }

    async fn try_classify(&self, text: &str) -> Option<ClassificationResult> {
        let embedding = match self.embedder.embed(text).await {
            Ok(e) => e,
            Err(e) => {
                warn!("Embedding failed, abstaining: {}", e);
                return None;
            }
        };

        let mut best_category = Category::NeutralUnclassified;
        let mut best_score = 0.0f32;
        for (category, anchor) in &self.anchors.anchors {
            let score = cosine_similarity(&embedding, anchor);
            if score > best_score {
                best_score = score;
                best_category = *category;
            }
        }

        if best_score > self.threshold {
            Some(ClassificationResult::new(
                best_category,
                Method::SemanticSimilarity,
                best_score,
            ))
        } else {
            debug!(
                "Best anchor similarity {:.3} below threshold {:.2}, abstaining",
                best_score, self.threshold
            );
            None
        }
    }
}
