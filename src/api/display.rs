//! Display text endpoints for the webview client
//!
//! In per-session scope these operate on the requester's slot (and require
//! identity); in the default global scope identity is ignored.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};

use super::auth::OptionalUserId;
use super::{ApiError, ApiState};
use crate::display_text::DisplayTextScope;

/// Build display text router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/display-text", get(get_display_text).post(set_display_text))
        .route("/get_hint", get(get_hint))
        .with_state(state)
}

/// Resolve the effective user id for the store's scope
///
/// Global scope never needs one; per-session scope rejects anonymous
/// requests.
fn scoped_user(state: &ApiState, user_id: Option<String>) -> Result<Option<String>, ApiError> {
    match state.display_text.scope() {
        DisplayTextScope::Global => Ok(None),
        DisplayTextScope::PerSession => match user_id {
            Some(id) => Ok(Some(id)),
            None => Err(ApiError::NotAuthenticated),
        },
    }
}

/// Current display text
#[derive(Debug, Serialize)]
struct DisplayTextResponse {
    text: String,
    timestamp: i64,
}

/// Get the current display text
async fn get_display_text(
    State(state): State<Arc<ApiState>>,
    OptionalUserId(user_id): OptionalUserId,
) -> Result<Json<DisplayTextResponse>, ApiError> {
    let user_id = scoped_user(&state, user_id)?;
    let entry = state
        .display_text
        .get(user_id.as_deref())
        .await
        .ok_or(ApiError::NotFound("No text available"))?;

    Ok(Json(DisplayTextResponse {
        text: entry.text,
        timestamp: entry.updated_at.timestamp_millis(),
    }))
}

/// Body for setting display text
#[derive(Debug, Deserialize)]
struct SetDisplayTextRequest {
    text: Option<serde_json::Value>,
}

/// Acknowledgement of a display text update
#[derive(Debug, Serialize)]
struct SetDisplayTextResponse {
    success: bool,
    text: String,
}

/// Set the display text
async fn set_display_text(
    State(state): State<Arc<ApiState>>,
    OptionalUserId(user_id): OptionalUserId,
    Json(body): Json<SetDisplayTextRequest>,
) -> Result<Json<SetDisplayTextResponse>, ApiError> {
    let text = match body.text {
        Some(serde_json::Value::String(text)) if !text.is_empty() => text,
        _ => return Err(ApiError::BadRequest("Text is required and must be a string")),
    };

    let user_id = scoped_user(&state, user_id)?;
    let entry = state.display_text.set(user_id.as_deref(), text).await;

    Ok(Json(SetDisplayTextResponse {
        success: true,
        text: entry.text,
    }))
}

/// Hint view of the display text
#[derive(Debug, Serialize)]
struct HintResponse {
    success: bool,
    hint: String,
    timestamp: String,
}

/// Body returned when no hint is available
#[derive(Debug, Serialize)]
struct HintUnavailableResponse {
    success: bool,
    error: &'static str,
    timestamp: String,
}

/// Get the current display text presented as a hint
async fn get_hint(
    State(state): State<Arc<ApiState>>,
    OptionalUserId(user_id): OptionalUserId,
) -> Result<Json<HintResponse>, (StatusCode, Json<HintUnavailableResponse>)> {
    let user_id = match scoped_user(&state, user_id) {
        Ok(user_id) => user_id,
        Err(_) => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(HintUnavailableResponse {
                    success: false,
                    error: "Not authenticated",
                    timestamp: chrono::Utc::now().to_rfc3339(),
                }),
            ));
        }
    };

    match state.display_text.get(user_id.as_deref()).await {
        Some(entry) => Ok(Json(HintResponse {
            success: true,
            hint: entry.text,
            timestamp: entry.updated_at.to_rfc3339(),
        })),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(HintUnavailableResponse {
                success: false,
                error: "No hint available at this time",
                timestamp: chrono::Utc::now().to_rfc3339(),
            }),
        )),
    }
}
