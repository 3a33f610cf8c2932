//! Abuse-risk category taxonomy and its fixed configuration data:
//! advice strings, keyword triggers, topic-cluster lookup, anchor phrases.

use serde::{Deserialize, Serialize};

/// Closed set of classification labels. Every classification terminates in
/// exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Physical Abuse")]
    PhysicalAbuse,
    #[serde(rename = "Control & Manipulation")]
    ControlManipulation,
    #[serde(rename = "Verbal & Emotional Abuse")]
    VerbalEmotionalAbuse,
    #[serde(rename = "Neglect & Emotional Withdrawal")]
    NeglectEmotionalWithdrawal,
    #[serde(rename = "Healthy/Low Risk")]
    HealthyLowRisk,
    #[serde(rename = "Neutral / Unclassified")]
    NeutralUnclassified,
}

/// Fallback advice when a category somehow carries none. The per-category
/// mapping below is total, so this only surfaces through external lookups.
pub const DEFAULT_ADVICE: &str = "No advice available.";

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::PhysicalAbuse => "Physical Abuse",
            Category::ControlManipulation => "Control & Manipulation",
            Category::VerbalEmotionalAbuse => "Verbal & Emotional Abuse",
            Category::NeglectEmotionalWithdrawal => "Neglect & Emotional Withdrawal",
            Category::HealthyLowRisk => "Healthy/Low Risk",
            Category::NeutralUnclassified => "Neutral / Unclassified",
        }
    }

    /// Safety advice shown alongside the overall outcome. Total over the enum.
    pub fn advice(&self) -> &'static str {
        match self {
            Category::PhysicalAbuse => "Go to a safe place immediately. Call 911.",
            Category::ControlManipulation => {
                "Document incidents. Do not share your location if unsafe."
            }
            Category::VerbalEmotionalAbuse => {
                "Prioritize your mental health. Do not engage in escalating arguments."
            }
            Category::NeglectEmotionalWithdrawal => {
                "Seek counseling or support from trusted friends."
            }
            Category::HealthyLowRisk => "Maintain open communication.",
            Category::NeutralUnclassified => "No specific pattern detected.",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trigger substring -> category, scanned in declaration order against the
/// lowercased input. First containment wins.
pub const KEYWORD_TRIGGERS: &[(&str, Category)] = &[
    ("hit", Category::PhysicalAbuse),
    ("slap", Category::PhysicalAbuse),
    ("punch", Category::PhysicalAbuse),
    ("kick", Category::PhysicalAbuse),
    ("weapon", Category::PhysicalAbuse),
    ("kill", Category::PhysicalAbuse),
    ("threat", Category::ControlManipulation),
];

/// Opaque topic-cluster id -> category. Deliberately partial: ids outside
/// this table carry no confident signal and fall through to the next layer.
pub const TOPIC_CLUSTERS: &[(i64, Category)] = &[
    (1, Category::NeglectEmotionalWithdrawal),
    (2, Category::ControlManipulation),
    (3, Category::ControlManipulation),
    (4, Category::NeglectEmotionalWithdrawal),
    (5, Category::VerbalEmotionalAbuse),
    (6, Category::ControlManipulation),
    (8, Category::VerbalEmotionalAbuse),
];

/// Look up the category mapped to a topic cluster id, if any.
pub fn topic_category(topic: i64) -> Option<Category> {
    TOPIC_CLUSTERS
        .iter()
        .find(|(id, _)| *id == topic)
        .map(|(_, cat)| *cat)
}

/// Exemplar sentences per category, embedded once at startup to form the
/// anchor set for the semantic similarity layer.
pub const ANCHOR_PHRASES: &[(Category, &[&str])] = &[
    (
        Category::ControlManipulation,
        &[
            "He controls who I see.",
            "He demands passwords.",
            "He tracks my location.",
        ],
    ),
    (
        Category::VerbalEmotionalAbuse,
        &[
            "He calls me names.",
            "He yells and screams.",
            "He blames me for everything.",
        ],
    ),
    (
        Category::PhysicalAbuse,
        &[
            "He hurts me physically.",
            "He pushes and shoves.",
            "He throws things.",
        ],
    ),
    (
        Category::NeglectEmotionalWithdrawal,
        &[
            "He ignores me for days.",
            "He isolates me from family.",
            "He gives me the silent treatment for days.",
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advice_is_total_and_nonempty() {
        let all = [
            Category::PhysicalAbuse,
            Category::ControlManipulation,
            Category::VerbalEmotionalAbuse,
            Category::NeglectEmotionalWithdrawal,
            Category::HealthyLowRisk,
            Category::NeutralUnclassified,
        ];
        for cat in all {
            assert!(!cat.advice().is_empty(), "no advice for {}", cat);
        }
    }

    #[test]
    fn physical_triggers_precede_control() {
        // "kill" and "threat" can co-occur; declaration order must keep the
        // physical-abuse mapping first.
        let kill_idx = KEYWORD_TRIGGERS
            .iter()
            .position(|(k, _)| *k == "kill")
            .unwrap();
        let threat_idx = KEYWORD_TRIGGERS
            .iter()
            .position(|(k, _)| *k == "threat")
            .unwrap();
        assert!(kill_idx < threat_idx);
    }

    #[test]
    fn topic_lookup_is_partial() {
        assert_eq!(topic_category(2), Some(Category::ControlManipulation));
        assert_eq!(topic_category(5), Some(Category::VerbalEmotionalAbuse));
        assert_eq!(topic_category(0), None);
        assert_eq!(topic_category(7), None);
        assert_eq!(topic_category(-1), None);
    }

    #[test]
    fn serialized_labels_match_display() {
        let v = serde_json::to_value(Category::NeglectEmotionalWithdrawal).unwrap();
        assert_eq!(v, "Neglect & Emotional Withdrawal");
        let v = serde_json::to_value(Category::HealthyLowRisk).unwrap();
        assert_eq!(v, Category::HealthyLowRisk.as_str());
    }

    #[test]
    fn anchors_cover_signal_categories() {
        assert_eq!(ANCHOR_PHRASES.len(), 4);
        for (cat, phrases) in ANCHOR_PHRASES {
            assert_eq!(phrases.len(), 3, "anchor count for {}", cat);
        }
    }
}
