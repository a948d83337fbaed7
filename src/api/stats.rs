//! Statistics endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::domain::{UserContext, UserStatistics};
use crate::stats;
use crate::AppState;

use super::{ApiResponse, ApiResult};

/// Create the stats router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/stats", get(get_statistics))
}

/// Aggregated statistics for the user.
async fn get_statistics(
    State(state): State<AppState>,
    user: UserContext,
) -> ApiResult<Json<ApiResponse<UserStatistics>>> {
    let statistics = stats::user_statistics(&state.db, user).await?;
    Ok(Json(ApiResponse::success(statistics)))
}
