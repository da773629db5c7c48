//! TOML configuration file loading
//!
//! Supports `~/.config/lens/gateway/config.toml` as a persistent config
//! source. All fields are optional — the file is a partial overlay on top
//! of defaults.

use serde::Deserialize;

use crate::display_text::DisplayTextScope;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct GatewayConfigFile {
    /// HTTP API server configuration
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Hint/OCR backend configuration
    #[serde(default)]
    pub backend: BackendFileConfig,

    /// Webview display text configuration
    #[serde(default)]
    pub display: DisplayFileConfig,

    /// Capture/debounce timing overrides
    #[serde(default)]
    pub timing: TimingFileConfig,
}

/// Server/runtime configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// Port for the webview API
    pub port: Option<u16>,

    /// API key required on `/api` routes (unset = open, development mode)
    pub api_key: Option<String>,
}

/// Backend service configuration
#[derive(Debug, Default, Deserialize)]
pub struct BackendFileConfig {
    /// Base URL of the hint/OCR service
    pub url: Option<String>,
}

/// Display text configuration
#[derive(Debug, Default, Deserialize)]
pub struct DisplayFileConfig {
    /// "global" (one shared slot) or "per-session"
    pub text_scope: Option<DisplayTextScope>,
}

/// Timing overrides, all in milliseconds
///
/// Production values rarely change; these exist mainly to make timing
/// behavior testable with short windows.
#[derive(Debug, Default, Deserialize)]
pub struct TimingFileConfig {
    /// Capture decision interval
    pub capture_tick_ms: Option<u64>,

    /// Throttle reserved per capture attempt / retry backoff
    pub capture_backoff_ms: Option<u64>,

    /// Voice command debounce cooldown
    pub command_cooldown_ms: Option<u64>,
}

impl GatewayConfigFile {
    /// Parse a TOML string into a config file overlay
    ///
    /// # Errors
    ///
    /// Returns error if the TOML is malformed
    pub fn parse(contents: &str) -> crate::Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}
