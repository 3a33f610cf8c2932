//! First layer: exact-substring trigger matching.

use super::{ClassificationResult, ClassifierLayer, Method};
use crate::taxonomy::KEYWORD_TRIGGERS;
use async_trait::async_trait;

/// Scans the fixed trigger table in declaration order against the
/// lowercased input. A hit is always fully confident.
pub struct KeywordLayer;

#[async_trait]
impl ClassifierLayer for KeywordLayer {
    fn name(&self) -> &'static str {
        "keyword"
    }

    async fn try_classify(&self, text: &str) -> Option<ClassificationResult> {
        let lowered = text.to_lowercase();
        for (trigger, category) in KEYWORD_TRIGGERS {
            if lowered.contains(trigger) {
                return Some(ClassificationResult::new(
                    *category,
                    Method::KeywordMatch,
                    1.0,
                ));
            }
        }
        None
    }
}
