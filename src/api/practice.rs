//! Practice session endpoints.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use bytes::Bytes;

use crate::database::PracticeRepository;
use crate::domain::{
    Difficulty, NewPracticeSession, PracticeSession, ReflectionUpdate, UserContext,
};
use crate::report;
use crate::storage;
use crate::AppState;

use super::{ApiError, ApiResponse, ApiResult};

/// Create the practice router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/practice", post(create_session).get(list_sessions))
        .route("/api/practice/{id}", get(get_session))
        .route("/api/practice/{id}/reflection", patch(update_reflection))
}

/// Multipart fields collected from a session submission.
#[derive(Debug, Default)]
struct SessionForm {
    image: Option<(String, Bytes)>,
    topic_description: Option<String>,
    topic_difficulty: Option<String>,
    duration_seconds: Option<String>,
    reflection_good: Option<String>,
    reflection_struggled: Option<String>,
    reflection_learned: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> ApiResult<SessionForm> {
    let mut form = SessionForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };
        match name.as_str() {
            "image" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("failed to read image: {e}")))?;
                form.image = Some((filename, data));
            }
            other => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(format!("failed to read field: {e}")))?;
                match other {
                    "topic_description" => form.topic_description = Some(value),
                    "topic_difficulty" => form.topic_difficulty = Some(value),
                    "duration_seconds" => form.duration_seconds = Some(value),
                    "reflection_good" => form.reflection_good = Some(value),
                    "reflection_struggled" => form.reflection_struggled = Some(value),
                    "reflection_learned" => form.reflection_learned = Some(value),
                    _ => {}
                }
            }
        }
    }

    Ok(form)
}

/// Create a practice session from an image upload plus form fields.
///
/// Report regeneration is fired as a detached task after the row is
/// persisted; its outcome never reaches this response.
async fn create_session(
    State(state): State<AppState>,
    user: UserContext,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ApiResponse<PracticeSession>>)> {
    let form = read_form(multipart).await?;

    let (filename, image_data) = form
        .image
        .ok_or_else(|| ApiError::validation("an image file is required"))?;
    let description = form
        .topic_description
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::validation("topic description, difficulty, and duration are required"))?;
    let difficulty: Difficulty = form
        .topic_difficulty
        .as_deref()
        .ok_or_else(|| ApiError::validation("topic description, difficulty, and duration are required"))?
        .parse()
        .map_err(|_| {
            ApiError::validation("difficulty must be one of beginner, intermediate, advanced")
        })?;
    let duration_seconds: i32 = form
        .duration_seconds
        .as_deref()
        .ok_or_else(|| ApiError::validation("topic description, difficulty, and duration are required"))?
        .parse()
        .map_err(|_| ApiError::validation("duration must be a whole number of seconds"))?;
    if duration_seconds <= 0 {
        return Err(ApiError::validation("duration must be positive"));
    }

    let extension = storage::file_extension(&filename)
        .filter(|ext| storage::is_allowed_extension(ext))
        .ok_or_else(|| ApiError::validation("only JPEG and PNG images can be uploaded"))?
        .to_string();

    let image_path = state.images.store(&extension, image_data).await?;

    let session = state
        .db
        .create_session(&NewPracticeSession {
            user_id: user.user_id,
            topic_description: description,
            topic_difficulty: difficulty,
            image_path,
            duration_seconds,
            reflection_good: form.reflection_good.filter(|s| !s.is_empty()),
            reflection_struggled: form.reflection_struggled.filter(|s| !s.is_empty()),
            reflection_learned: form.reflection_learned.filter(|s| !s.is_empty()),
        })
        .await?;

    spawn_report_regeneration(&state, user);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            session,
            "practice session recorded",
        )),
    ))
}

/// Regenerate the user's report in the background; failure is logged only.
fn spawn_report_regeneration(state: &AppState, user: UserContext) {
    let db = state.db.clone();
    let llm = state.llm.clone();
    tokio::spawn(async move {
        match report::generate_and_store_report(llm.as_ref(), &db, user).await {
            Ok(_) => {
                tracing::info!(user_id = user.user_id, "Report regenerated after practice session");
            }
            Err(error) => {
                tracing::warn!(user_id = user.user_id, error = %error, "Background report regeneration failed");
            }
        }
    });
}

/// List all sessions for the user, newest first.
async fn list_sessions(
    State(state): State<AppState>,
    user: UserContext,
) -> ApiResult<Json<ApiResponse<Vec<PracticeSession>>>> {
    let sessions = state.db.list_sessions(user.user_id).await?;
    Ok(Json(ApiResponse::success(sessions)))
}

/// Fetch a single session.
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ApiResponse<PracticeSession>>> {
    let session = state
        .db
        .get_session(id)
        .await?
        .ok_or_else(|| ApiError::not_found("practice session not found"))?;
    Ok(Json(ApiResponse::success(session)))
}

/// Partially update the reflection fields.
async fn update_reflection(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<ReflectionUpdate>,
) -> ApiResult<Json<ApiResponse<PracticeSession>>> {
    if update.is_empty() {
        return Err(ApiError::validation(
            "at least one reflection field is required",
        ));
    }

    let session = state
        .db
        .update_reflection(id, &update)
        .await?
        .ok_or_else(|| ApiError::not_found("practice session not found"))?;

    Ok(Json(ApiResponse::with_message(
        session,
        "reflection updated",
    )))
}
