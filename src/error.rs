//! Error types for the lens gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the lens gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Photo capture error from the device camera
    #[error("capture error: {0}")]
    Capture(String),

    /// Speech synthesis / playback error
    #[error("speech error: {0}")]
    Speech(String),

    /// Device display error
    #[error("display error: {0}")]
    Display(String),

    /// Backend (hint/OCR) service error
    #[error("backend error: {0}")]
    Backend(String),

    /// Webview API server error
    #[error("server error: {0}")]
    Server(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}
