//! HTTP client for the external hint/OCR analysis service

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::photos::StoredPhoto;
use crate::{Error, Result};

/// Fallback hint when the backend responds without one
const DEFAULT_HINT: &str = "Here's a hint to help you with your problem!";

/// Response from the hint endpoint
#[derive(serde::Deserialize)]
struct HintResponse {
    hint: Option<String>,
}

/// Request body for the hint endpoint
#[derive(serde::Serialize)]
struct HintRequest<'a> {
    learned: &'a str,
    question: &'a str,
}

/// Request body for the photo analysis endpoint
#[derive(serde::Serialize)]
struct AnalyzeRequest {
    image_base64: String,
}

/// Response from the photo analysis endpoint
#[derive(serde::Deserialize)]
struct AnalyzeResponse {
    full_text: String,
}

/// Client for the hint/OCR backend
///
/// `give_hint` is awaited by the voice command path; `spawn_analyze` is
/// fire-and-forget — its outcome is only ever logged.
#[derive(Debug, Clone)]
pub struct BackendGateway {
    client: reqwest::Client,
    base_url: String,
}

impl BackendGateway {
    /// Create a gateway for the backend at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Request a hint for the given context
    ///
    /// A 2xx response with no `hint` field still succeeds, with a canned
    /// fallback hint.
    ///
    /// # Errors
    ///
    /// Returns error on non-success HTTP status or transport failure
    pub async fn give_hint(&self, learned: &str, question: &str) -> Result<String> {
        let url = format!("{}/give-hint", self.base_url);
        tracing::debug!(%url, "requesting hint");

        let response = self
            .client
            .post(&url)
            .json(&HintRequest { learned, question })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "hint request failed");
                e
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "hint service error");
            return Err(Error::Backend(format!("hint service error {status}")));
        }

        let result: HintResponse = response.json().await?;
        let hint = result.hint.unwrap_or_else(|| DEFAULT_HINT.to_string());
        tracing::info!(hint = %hint, "hint received");

        Ok(hint)
    }

    /// Submit a photo for OCR analysis and wait for the extracted text
    ///
    /// # Errors
    ///
    /// Returns error on non-success HTTP status or transport failure
    pub async fn analyze_photo(&self, photo: &StoredPhoto) -> Result<String> {
        let url = format!("{}/analyze-photo", self.base_url);
        tracing::debug!(%url, bytes = photo.size, "submitting photo for analysis");

        let request = AnalyzeRequest {
            image_base64: BASE64.encode(&photo.bytes),
        };

        let response = self.client.post(&url).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Backend(format!("analysis service error {status}")));
        }

        let result: AnalyzeResponse = response.json().await?;
        Ok(result.full_text)
    }

    /// Fire-and-forget photo analysis
    ///
    /// Spawns a detached task; success and failure are logged and never
    /// reach the caller, so a slow or down backend cannot stall capture.
    pub fn spawn_analyze(&self, photo: Arc<StoredPhoto>) {
        let gateway = self.clone();
        tokio::spawn(async move {
            match gateway.analyze_photo(&photo).await {
                Ok(full_text) => {
                    tracing::info!(
                        user_id = %photo.user_id,
                        full_text = %full_text,
                        "photo analysis completed"
                    );
                }
                Err(e) => {
                    tracing::error!(user_id = %photo.user_id, error = %e, "photo analysis failed");
                }
            }
        });
    }

    /// The backend base URL this gateway talks to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
