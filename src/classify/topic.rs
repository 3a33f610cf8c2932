//! Second layer: pretrained topic-model lookup.

use super::{ClassificationResult, ClassifierLayer, Method};
use crate::taxonomy::topic_category;
use crate::topics::TopicModel;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Maps the model's opaque cluster id to a category through the fixed
/// lookup table. Unmapped ids and transport failures abstain.
pub struct TopicLayer {
    model: Arc<dyn TopicModel>,
}

impl TopicLayer {
    pub fn new(model: Arc<dyn TopicModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl ClassifierLayer for TopicLayer {
    fn name(&self) -> &'static str {
        "topic"
    }

    async fn try_classify(&self, text: &str) -> Option<ClassificationResult> {
        let prediction = match self.model.transform(text).await {
            Ok(p) => p,
            Err(e) => {
                warn!("Topic model transform failed, abstaining: {}", e);
                return None;
            }
        };

        let category = topic_category(prediction.topic)?;

        // Probability fallback chain: per-class vector -> max, scalar -> as
        // is, absent (or empty vector) -> 0.5.
        let confidence = prediction
            .probability
            .as_ref()
            .and_then(|p| p.confidence())
            .unwrap_or(0.5);

        Some(ClassificationResult::new(
            category,
            Method::TopicCluster(prediction.topic),
            confidence,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Category;
    use crate::topics::{StubTopicModel, TopicProbability};

    fn layer(topic: i64, probability: Option<TopicProbability>) -> TopicLayer {
        TopicLayer::new(Arc::new(StubTopicModel::new(topic, probability)))
    }

    #[tokio::test]
    async fn mapped_cluster_with_scalar_probability() {
        let result = layer(2, Some(TopicProbability::Scalar(0.8)))
            .try_classify("some text here")
            .await
            .unwrap();
        assert_eq!(result.category, Category::ControlManipulation);
        assert_eq!(result.method, Method::TopicCluster(2));
        assert!((result.confidence - 0.8).abs() < 1e-6);
    }

    #[tokio::test]
    async fn vector_probability_takes_maximum() {
        let result = layer(8, Some(TopicProbability::PerClass(vec![0.2, 0.9, 0.4])))
            .try_classify("some text here")
            .await
            .unwrap();
        assert_eq!(result.category, Category::VerbalEmotionalAbuse);
        assert!((result.confidence - 0.9).abs() < 1e-6);
        assert_eq!(result.method.label(), "AI Cluster 8");
    }

    #[tokio::test]
    async fn absent_probability_defaults_to_half() {
        let result = layer(4, None).try_classify("some text here").await.unwrap();
        assert_eq!(result.category, Category::NeglectEmotionalWithdrawal);
        assert!((result.confidence - 0.5).abs() < 1e-6);
    }

    #[tokio::test]
    async fn empty_probability_vector_defaults_to_half() {
        let result = layer(6, Some(TopicProbability::PerClass(vec![])))
            .try_classify("some text here")
            .await
            .unwrap();
        assert!((result.confidence - 0.5).abs() < 1e-6);
    }

    #[tokio::test]
    async fn unmapped_cluster_abstains() {
        assert!(layer(7, Some(TopicProbability::Scalar(0.99)))
            .try_classify("some text here")
            .await
            .is_none());
        assert!(layer(-1, None).try_classify("some text here").await.is_none());
    }

    #[tokio::test]
    async fn out_of_range_probability_is_clamped() {
        let result = layer(3, Some(TopicProbability::Scalar(1.7)))
            .try_classify("some text here")
            .await
            .unwrap();
        assert_eq!(result.confidence, 1.0);
    }
}
