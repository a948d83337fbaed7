//! Health and connectivity probes.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::AppState;

use super::ApiResult;

/// Create the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/db-test", get(db_check))
}

/// Liveness response.
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
    timestamp: String,
}

/// Basic liveness probe.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "easel API is running",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// Database connectivity response.
#[derive(Debug, Serialize)]
struct DbCheckResponse {
    status: &'static str,
    message: &'static str,
}

/// Round-trip database probe.
async fn db_check(State(state): State<AppState>) -> ApiResult<Json<DbCheckResponse>> {
    state.db.ping().await?;
    Ok(Json(DbCheckResponse {
        status: "ok",
        message: "Database connection successful",
    }))
}
