//! Photo endpoints for the webview client

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;

use super::{ApiError, ApiState, UserId};

/// Build photo router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/latest-photo", get(latest_photo))
        .route("/photo/{request_id}", get(photo_data))
        .with_state(state)
}

/// Metadata for the authenticated user's current photo
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LatestPhotoResponse {
    request_id: String,
    timestamp: i64,
    has_photo: bool,
}

/// Get metadata for the latest cached photo
async fn latest_photo(
    State(state): State<Arc<ApiState>>,
    UserId(user_id): UserId,
) -> Result<Json<LatestPhotoResponse>, ApiError> {
    let photo = state
        .photos
        .get(&user_id)
        .await
        .ok_or(ApiError::NotFound("No photo available"))?;

    Ok(Json(LatestPhotoResponse {
        request_id: photo.request_id.clone(),
        timestamp: photo.timestamp.timestamp_millis(),
        has_photo: true,
    }))
}

/// Get the image bytes for a specific capture request
///
/// The request id must match the user's current photo; a stale id gets 404
/// even when a newer photo exists.
async fn photo_data(
    State(state): State<Arc<ApiState>>,
    UserId(user_id): UserId,
    Path(request_id): Path<String>,
) -> Result<Response, ApiError> {
    let photo = state
        .photos
        .get(&user_id)
        .await
        .filter(|photo| photo.request_id == request_id)
        .ok_or(ApiError::NotFound("Photo not found"))?;

    Ok((
        [
            (header::CONTENT_TYPE, photo.mime_type.clone()),
            (header::CACHE_CONTROL, "no-cache".to_string()),
        ],
        photo.bytes.clone(),
    )
        .into_response())
}
