//! Topic generation endpoints.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::database::TopicRepository;
use crate::domain::{Topic, UserContext};
use crate::topics;
use crate::AppState;

use super::{ApiResponse, ApiResult};

/// Create the topics router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/topics/random", get(random_topic))
        .route("/api/topics/recommended", get(recommended_topics))
}

/// Generate and persist one random topic.
async fn random_topic(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Topic>>> {
    let generated = topics::generate_random_topic(state.llm.as_ref()).await?;
    let topic = state
        .db
        .create_topic(&generated.description, generated.difficulty)
        .await?;
    Ok(Json(ApiResponse::success(topic)))
}

/// Generate and persist three recommended topics.
async fn recommended_topics(
    State(state): State<AppState>,
    user: UserContext,
) -> ApiResult<Json<ApiResponse<Vec<Topic>>>> {
    let generated =
        topics::generate_recommended_topics(state.llm.as_ref(), &state.db, user).await?;

    let mut saved = Vec::with_capacity(generated.len());
    for topic in generated {
        saved.push(
            state
                .db
                .create_topic(&topic.description, topic.difficulty)
                .await?,
        );
    }
    Ok(Json(ApiResponse::success(saved)))
}
