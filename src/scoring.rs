//! Risk scoring and aggregation: turns per-item weights and category
//! signals into risk levels, colors, and advice, per section and overall.

use crate::classify::HybridClassifier;
use crate::taxonomy::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Weight thresholds for the per-section policy.
pub const SECTION_HIGH: f64 = 6.0;
pub const SECTION_MODERATE: f64 = 2.0;
/// Weight thresholds for the overall policy.
pub const OVERALL_HIGH: f64 = 10.0;
pub const OVERALL_MODERATE: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Severe,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::Severe => "Severe",
        }
    }

    /// UI color code paired with each level.
    pub fn color(&self) -> &'static str {
        match self {
            RiskLevel::Low => "green",
            RiskLevel::Moderate => "yellow",
            RiskLevel::High => "orange",
            RiskLevel::Severe => "red",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-section policy, strict priority order: Physical Abuse is Severe no
/// matter the weight sum, then the weight thresholds.
pub fn section_risk(category: Category, score: f64) -> RiskLevel {
    if category == Category::PhysicalAbuse {
        RiskLevel::Severe
    } else if score >= SECTION_HIGH {
        RiskLevel::High
    } else if score >= SECTION_MODERATE {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}

/// Overall policy: same shape as the per-section policy with wider
/// thresholds over the summed total.
pub fn overall_risk(category: Category, total: f64) -> RiskLevel {
    if category == Category::PhysicalAbuse {
        RiskLevel::Severe
    } else if total >= OVERALL_HIGH {
        RiskLevel::High
    } else if total >= OVERALL_MODERATE {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}

/// Render a [0,1] confidence as a percent string with one decimal.
pub fn confidence_percent(confidence: f32) -> String {
    format!("{:.1}%", confidence * 100.0)
}

/// One free-text answer with its question weight.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerItem {
    pub text: String,
    pub weight: f64,
}

/// Survey answers grouped by section name. Sorted map so the overall
/// concatenation is deterministic for identical payloads.
pub type GroupedAnswers = BTreeMap<String, Vec<AnswerItem>>;

#[derive(Debug, Clone, Serialize)]
pub struct SectionOutcome {
    pub category: Category,
    pub risk: RiskLevel,
    pub color: &'static str,
    pub confidence: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OverallOutcome {
    pub category: Category,
    pub risk: RiskLevel,
    pub color: &'static str,
    pub advice: &'static str,
    pub method: crate::classify::Method,
    pub confidence: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub general: OverallOutcome,
    pub breakdown: BTreeMap<String, SectionOutcome>,
}

/// Ties the classification engine to the aggregation policy.
pub struct RiskAssessor {
    classifier: HybridClassifier,
}

impl RiskAssessor {
    pub fn new(classifier: HybridClassifier) -> Self {
        Self { classifier }
    }

    /// Analyze grouped survey answers: classify each section's concatenated
    /// text, then re-classify the full concatenation independently for the
    /// overall outcome. Total score is the sum of all section scores.
    pub async fn analyze(&self, grouped: &GroupedAnswers) -> AnalysisReport {
        let mut breakdown = BTreeMap::new();
        let mut section_texts: Vec<String> = Vec::new();
        let mut total_score = 0.0f64;

        for (name, items) in grouped {
            if items.is_empty() {
                continue;
            }

            let section_text = items
                .iter()
                .map(|item| item.text.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            let section_score: f64 = items.iter().map(|item| item.weight).sum();

            let result = self.classifier.classify(&section_text).await;
            let risk = section_risk(result.category, section_score);

            breakdown.insert(
                name.clone(),
                SectionOutcome {
                    category: result.category,
                    risk,
                    color: risk.color(),
                    confidence: confidence_percent(result.confidence),
                },
            );

            section_texts.push(section_text);
            total_score += section_score;
        }

        let full_text = section_texts.join(" ");
        let general = self.classifier.classify(&full_text).await;
        let risk = overall_risk(general.category, total_score);

        AnalysisReport {
            general: OverallOutcome {
                category: general.category,
                risk,
                color: risk.color(),
                advice: general.category.advice(),
                method: general.method,
                confidence: confidence_percent(general.confidence),
            },
            breakdown,
        }
    }
}
