//! Server module: process-wide state shared by the HTTP boundary.

use crate::classify::HybridClassifier;
use crate::config::Config;
use crate::scoring::{AnalysisReport, RiskAssessor};
use chrono::Utc;
use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::remote::ws::Client;
use tracing::{debug, info, warn};

pub mod db;

/// Immutable process-wide state: configuration, the classification engine
/// behind the risk assessor, and an optional store connection. Everything
/// here is read-only after startup, so handlers can run concurrently.
#[derive(Clone)]
pub struct SafelineServer {
    pub config: Arc<Config>,
    pub assessor: Arc<RiskAssessor>,
    pub db: Option<Arc<Surreal<Client>>>,
}

impl SafelineServer {
    /// Build the server: assemble the classifier from configured providers
    /// and connect to the store. A missing store degrades persistence to a
    /// no-op; it never prevents startup.
    pub async fn new(config: Config) -> Self {
        let classifier = HybridClassifier::from_config(&config).await;
        let assessor = Arc::new(RiskAssessor::new(classifier));

        let db = match db::connect(&config).await {
            Ok(db) => {
                info!(
                    "Connected to SurrealDB at {} ({}:{})",
                    config.system.database_url, config.system.database_ns, config.system.database_db
                );
                Some(Arc::new(db))
            }
            Err(e) => {
                warn!(
                    "Database unavailable, assessments will not be persisted: {}",
                    e
                );
                None
            }
        };

        Self {
            config: Arc::new(config),
            assessor,
            db,
        }
    }

    /// Best-effort persistence of a finished analysis. Failures are logged
    /// and swallowed; the computed report is returned to the caller either
    /// way.
    pub async fn persist_assessment(&self, report: &AnalysisReport) {
        let Some(db) = &self.db else {
            debug!("No database connection, skipping assessment persistence");
            return;
        };

        match db::insert_assessment(
            db,
            Utc::now(),
            report.general.risk,
            report.general.category,
            &report.general.confidence,
            report,
        )
        .await
        {
            Ok(()) => info!("Assessment persisted (risk={})", report.general.risk),
            Err(e) => warn!("Failed to persist assessment: {}", e),
        }
    }
}
