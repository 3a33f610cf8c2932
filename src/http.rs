//! HTTP boundary for the assessment service
//!
//! Axum router exposing the analysis endpoint, the admin listing, and a
//! health probe, with permissive CORS for the survey front-end. All
//! decision logic lives below the boundary; handlers only translate JSON.

use crate::error::Result;
use crate::scoring::GroupedAnswers;
use crate::server::{SafelineServer, db};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub grouped_answers: GroupedAnswers,
}

/// Health check endpoint
pub async fn health_handler() -> impl IntoResponse {
    "ok"
}

/// Run the full analysis and persist the outcome best-effort. The computed
/// report is returned even when persistence fails.
pub async fn analyze_handler(
    State(server): State<SafelineServer>,
    Json(request): Json<AnalyzeRequest>,
) -> impl IntoResponse {
    let report = server.assessor.analyze(&request.grouped_answers).await;
    server.persist_assessment(&report).await;

    Json(json!({ "status": "success", "result": report }))
}

/// Stored assessments, newest first.
pub async fn admin_data_handler(State(server): State<SafelineServer>) -> impl IntoResponse {
    let Some(db) = &server.db else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "status": "error", "message": "database unavailable" })),
        )
            .into_response();
    };

    match db::recent_assessments(db, 100).await {
        Ok(rows) => Json(rows).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "status": "error", "message": e.to_string() })),
        )
            .into_response(),
    }
}

/// Start the HTTP server
pub async fn start_http_server(server: SafelineServer) -> Result<()> {
    let bind = server.config.runtime.http_bind;

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/analyze", post(analyze_handler))
        .route("/admin/data", get(admin_data_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(server);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP listener: {}", e))?;

    tracing::info!("Starting HTTP server on {}", bind);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    Ok(())
}
