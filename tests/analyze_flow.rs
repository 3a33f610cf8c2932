//! End-to-end aggregation scenarios through RiskAssessor, with the model
//! layers unavailable so outcomes are fully deterministic.

use safeline::classify::{HybridClassifier, KeywordLayer};
use safeline::scoring::{AnswerItem, GroupedAnswers, RiskAssessor, RiskLevel};
use safeline::taxonomy::Category;

fn assessor() -> RiskAssessor {
    RiskAssessor::new(HybridClassifier::new(vec![Box::new(KeywordLayer)]))
}

fn item(text: &str, weight: f64) -> AnswerItem {
    AnswerItem {
        text: text.to_string(),
        weight,
    }
}

#[tokio::test]
async fn physical_abuse_section_is_severe_at_any_weight() {
    let mut grouped = GroupedAnswers::new();
    grouped.insert("Section A".to_string(), vec![item("he hit me", 5.0)]);

    let report = assessor().analyze(&grouped).await;

    let section = &report.breakdown["Section A"];
    assert_eq!(section.category, Category::PhysicalAbuse);
    assert_eq!(section.risk, RiskLevel::Severe);
    assert_eq!(section.color, "red");
    assert_eq!(section.confidence, "100.0%");

    assert_eq!(report.general.risk, RiskLevel::Severe);
    assert_eq!(report.general.color, "red");
    assert_eq!(report.general.category, Category::PhysicalAbuse);
    assert_eq!(report.general.method.label(), "Manual Keyword Match");
    assert_eq!(
        report.general.advice,
        "Go to a safe place immediately. Call 911."
    );
}

#[tokio::test]
async fn unremarkable_answers_stay_low() {
    let mut grouped = GroupedAnswers::new();
    grouped.insert("S1".to_string(), vec![item("normal day", 1.0)]);

    let report = assessor().analyze(&grouped).await;

    let section = &report.breakdown["S1"];
    assert_eq!(section.category, Category::HealthyLowRisk);
    assert_eq!(section.risk, RiskLevel::Low);
    assert_eq!(section.color, "green");
    assert_eq!(section.confidence, "0.0%");

    assert_eq!(report.general.risk, RiskLevel::Low);
    assert_eq!(report.general.method.label(), "System Default");
    assert_eq!(report.general.confidence, "0.0%");
}

#[tokio::test]
async fn moderate_sections_sum_to_a_moderate_total() {
    // Two sections each scoring 3: Moderate per section, and the summed
    // total of 6 crosses the overall Moderate threshold but not High.
    let mut grouped = GroupedAnswers::new();
    grouped.insert(
        "Home".to_string(),
        vec![item("quiet evening at home", 2.0), item("calm morning", 1.0)],
    );
    grouped.insert(
        "Work".to_string(),
        vec![item("long shift today", 1.5), item("tired afterwards", 1.5)],
    );

    let report = assessor().analyze(&grouped).await;

    for name in ["Home", "Work"] {
        let section = &report.breakdown[name];
        assert_eq!(section.risk, RiskLevel::Moderate, "section {}", name);
        assert_eq!(section.color, "yellow");
    }
    assert_eq!(report.general.risk, RiskLevel::Moderate);
    assert_eq!(report.general.color, "yellow");
}

#[tokio::test]
async fn overall_category_comes_from_the_full_concatenation() {
    // One risky section, one benign: the benign section stays Low while
    // the overall outcome is re-classified from the combined text and
    // picks up the keyword signal.
    let mut grouped = GroupedAnswers::new();
    grouped.insert(
        "Conflict".to_string(),
        vec![item("he threatened to slap me", 1.0)],
    );
    grouped.insert("Daily".to_string(), vec![item("we cook dinner", 1.0)]);

    let report = assessor().analyze(&grouped).await;

    assert_eq!(
        report.breakdown["Conflict"].category,
        Category::PhysicalAbuse
    );
    assert_eq!(report.breakdown["Daily"].category, Category::HealthyLowRisk);
    assert_eq!(report.breakdown["Daily"].risk, RiskLevel::Low);

    // Concatenation contains "slap"; the overall outcome is Severe even
    // though the summed total (2.0) is below every weight threshold.
    assert_eq!(report.general.category, Category::PhysicalAbuse);
    assert_eq!(report.general.risk, RiskLevel::Severe);
}

#[tokio::test]
async fn empty_sections_are_skipped() {
    let mut grouped = GroupedAnswers::new();
    grouped.insert("Empty".to_string(), vec![]);
    grouped.insert("S1".to_string(), vec![item("pleasant weekend trip", 1.0)]);

    let report = assessor().analyze(&grouped).await;

    assert!(!report.breakdown.contains_key("Empty"));
    assert!(report.breakdown.contains_key("S1"));
}

#[tokio::test]
async fn no_sections_at_all_is_low_risk() {
    let grouped = GroupedAnswers::new();
    let report = assessor().analyze(&grouped).await;

    assert_eq!(report.general.category, Category::HealthyLowRisk);
    assert_eq!(report.general.risk, RiskLevel::Low);
    assert_eq!(report.general.method.label(), "Insufficient Data");
    assert!(report.breakdown.is_empty());
}

#[tokio::test]
async fn high_weight_sections_escalate_without_a_category_signal() {
    let mut grouped = GroupedAnswers::new();
    grouped.insert(
        "S1".to_string(),
        vec![item("uneasy about the argument", 6.0)],
    );
    grouped.insert("S2".to_string(), vec![item("worried about tomorrow", 4.0)]);

    let report = assessor().analyze(&grouped).await;

    assert_eq!(report.breakdown["S1"].risk, RiskLevel::High);
    assert_eq!(report.breakdown["S1"].color, "orange");
    assert_eq!(report.breakdown["S2"].risk, RiskLevel::Moderate);

    // Total 10 reaches the overall High threshold.
    assert_eq!(report.general.risk, RiskLevel::High);
    assert_eq!(report.general.color, "orange");
}

#[tokio::test]
async fn report_serializes_with_reference_labels() {
    let mut grouped = GroupedAnswers::new();
    grouped.insert("Section A".to_string(), vec![item("he hit me", 5.0)]);

    let report = assessor().analyze(&grouped).await;
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["general"]["category"], "Physical Abuse");
    assert_eq!(value["general"]["risk"], "Severe");
    assert_eq!(value["general"]["method"], "Manual Keyword Match");
    assert_eq!(value["breakdown"]["Section A"]["color"], "red");
    assert_eq!(value["breakdown"]["Section A"]["confidence"], "100.0%");
}
