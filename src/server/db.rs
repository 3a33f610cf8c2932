//! SurrealDB persistence adapter for assessment records.

use crate::config::Config;
use crate::error::Result;
use crate::scoring::{AnalysisReport, RiskLevel};
use crate::taxonomy::Category;
use anyhow::Context;
use chrono::{DateTime, Utc};
use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

// SurrealDB Ws engine expects host:port, no scheme
fn normalize_ws_url(s: &str) -> String {
    s.strip_prefix("ws://")
        .or_else(|| s.strip_prefix("wss://"))
        .or_else(|| s.strip_prefix("http://"))
        .or_else(|| s.strip_prefix("https://"))
        .unwrap_or(s)
        .to_string()
}

/// Connect, authenticate, select namespace/database, and ensure the schema
/// exists. One attempt; the caller treats failure as "run without
/// persistence".
pub async fn connect(config: &Config) -> Result<Surreal<Client>> {
    let url = normalize_ws_url(&config.system.database_url);

    let db = Surreal::new::<Ws>(url)
        .await
        .with_context(|| format!("Failed to connect to SurrealDB at {}", config.system.database_url))?;

    db.signin(Root {
        username: config.runtime.database_user.as_str(),
        password: config.runtime.database_pass.as_str(),
    })
    .await
    .with_context(|| {
        format!(
            "Failed to authenticate with SurrealDB as user '{}'",
            config.runtime.database_user
        )
    })?;

    db.use_ns(&config.system.database_ns)
        .use_db(&config.system.database_db)
        .await
        .with_context(|| {
            format!(
                "Failed to select namespace '{}' / database '{}'",
                config.system.database_ns, config.system.database_db
            )
        })?;

    initialize_schema(&db).await?;

    Ok(db)
}

/// Define the assessments table. Idempotent; runs once at startup.
pub async fn initialize_schema(db: &Surreal<Client>) -> Result<()> {
    info!("Initializing assessments schema");

    let schema_sql = r#"
        DEFINE TABLE assessments SCHEMAFULL;
        DEFINE FIELD created_at ON TABLE assessments TYPE datetime;
        DEFINE FIELD risk_level ON TABLE assessments TYPE string;
        DEFINE FIELD category ON TABLE assessments TYPE string;
        DEFINE FIELD confidence ON TABLE assessments TYPE string;
        DEFINE FIELD report ON TABLE assessments FLEXIBLE TYPE object;
        DEFINE INDEX idx_assessments_created ON TABLE assessments FIELDS created_at;
    "#;

    db.query(schema_sql).await?;
    Ok(())
}

/// Insert one assessment row. Rows are insert-only; nothing here mutates
/// or deletes existing records.
pub async fn insert_assessment(
    db: &Surreal<Client>,
    recorded_at: DateTime<Utc>,
    risk: RiskLevel,
    category: Category,
    confidence: &str,
    report: &AnalysisReport,
) -> Result<()> {
    let report_json = serde_json::to_value(report)?;

    db.query(
        "CREATE assessments SET \
            created_at = type::datetime($ts), \
            risk_level = $risk, \
            category = $category, \
            confidence = $confidence, \
            report = $report \
        RETURN NONE",
    )
    .bind(("ts", recorded_at.to_rfc3339()))
    .bind(("risk", risk.as_str()))
    .bind(("category", category.as_str()))
    .bind(("confidence", confidence.to_string()))
    .bind(("report", report_json))
    .await?;

    Ok(())
}

/// Most recent assessment rows for the admin view, newest first.
pub async fn recent_assessments(
    db: &Surreal<Client>,
    limit: usize,
) -> Result<Vec<serde_json::Value>> {
    let sql = format!(
        "SELECT meta::id(id) AS id, created_at, risk_level, category, confidence, report \
         FROM assessments ORDER BY created_at DESC LIMIT {}",
        limit
    );
    let rows: Vec<serde_json::Value> = db.query(sql).await?.take(0)?;
    Ok(rows)
}
