//! AI report endpoints.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::database::ReportRepository;
use crate::domain::{AiReport, UserContext};
use crate::report;
use crate::AppState;

use super::{ApiError, ApiResponse, ApiResult};

/// Create the AI report router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/api/ai/report",
        post(create_report).get(latest_report),
    )
}

/// Report payload returned to clients.
#[derive(Debug, Serialize)]
struct ReportResponse {
    id: i64,
    report: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<AiReport> for ReportResponse {
    fn from(report: AiReport) -> Self {
        Self {
            id: report.id,
            report: report.overall_assessment,
            created_at: report.created_at,
            updated_at: report.updated_at,
        }
    }
}

/// Generate and persist a fresh report.
async fn create_report(
    State(state): State<AppState>,
    user: UserContext,
) -> ApiResult<Json<ApiResponse<ReportResponse>>> {
    let report = report::generate_and_store_report(state.llm.as_ref(), &state.db, user).await?;
    Ok(Json(ApiResponse::with_message(
        ReportResponse::from(report),
        "report generated",
    )))
}

/// Fetch the latest persisted report.
async fn latest_report(
    State(state): State<AppState>,
    user: UserContext,
) -> ApiResult<Json<ApiResponse<ReportResponse>>> {
    let report = state
        .db
        .get_report(user.user_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found("no report has been generated yet; record some practice first")
        })?;
    Ok(Json(ApiResponse::success(ReportResponse::from(report))))
}
