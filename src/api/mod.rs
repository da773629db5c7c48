//! HTTP API server for the webview client

mod auth;
pub mod display;
pub mod health;
pub mod photos;

pub use auth::{OptionalUserId, USER_ID_HEADER, UserId};

use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::Result;
use crate::display_text::DisplayTextStore;
use crate::photos::PhotoCache;

/// Shared state for API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Per-user photo cache
    pub photos: PhotoCache,

    /// Webview display text store
    pub display_text: Arc<DisplayTextStore>,

    /// API key for `/api` routes; `None` allows all requests
    pub api_key: Option<String>,
}

/// Build the full gateway router
#[must_use]
pub fn router(state: Arc<ApiState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .merge(photos::router(state.clone()))
        .merge(display::router(state.clone()))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .nest("/api", api)
        .merge(health::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Serve the API until the shutdown future resolves
///
/// # Errors
///
/// Returns error if the listener cannot bind or the server fails
pub async fn serve<F>(state: Arc<ApiState>, port: u16, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!(port, "webview API listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

/// API errors with their HTTP mapping
#[derive(Debug)]
pub enum ApiError {
    /// Request carries no user identity
    NotAuthenticated,
    /// Requested resource does not exist
    NotFound(&'static str),
    /// Malformed request body
    BadRequest(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: &'static str,
        }

        let (status, message) = match self {
            Self::NotAuthenticated => (StatusCode::UNAUTHORIZED, "Not authenticated"),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
