//! HTTP API endpoints.
//!
//! Thin bindings from REST routes to the aggregation, recommendation, and
//! report modules. All routes live under `/api`.

pub mod error;
pub mod health;
pub mod practice;
pub mod report;
pub mod stats;
pub mod topics;

pub use error::{ApiError, ApiResponse, ApiResult};

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::Router;
use std::convert::Infallible;

use crate::domain::UserContext;
use crate::AppState;

/// Create the API router.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(topics::router())
        .merge(practice::router())
        .merge(stats::router())
        .merge(report::router())
}

/// Header carrying an explicit user id, pending a real auth layer.
const USER_ID_HEADER: &str = "x-user-id";

impl<S> FromRequestParts<S> for UserContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<i64>().ok())
            .unwrap_or(UserContext::DEMO_USER_ID);
        Ok(UserContext::new(user_id))
    }
}
