//! Configuration management for the lens gateway
//!
//! Layering, lowest precedence first: built-in defaults, the TOML config
//! file, environment variables. CLI flags override on top of the loaded
//! config in `main`.

pub mod file;

use std::path::PathBuf;
use std::time::Duration;

use crate::display_text::DisplayTextScope;
use crate::session::SchedulerConfig;
use crate::{Error, Result};

use file::GatewayConfigFile;

/// Default webview API port
const DEFAULT_PORT: u16 = 3000;

/// Default hint/OCR backend
const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Default voice command debounce cooldown
const DEFAULT_COMMAND_COOLDOWN: Duration = Duration::from_millis(2000);

/// Gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the webview API listens on
    pub port: u16,

    /// Base URL of the hint/OCR backend
    pub backend_url: String,

    /// API key required on `/api` routes; `None` allows all requests
    pub api_key: Option<String>,

    /// Scope of the webview display text slot
    pub display_text_scope: DisplayTextScope,

    /// Capture scheduler timing
    pub scheduler: SchedulerConfig,

    /// Voice command debounce cooldown
    pub command_cooldown: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            api_key: None,
            display_text_scope: DisplayTextScope::default(),
            scheduler: SchedulerConfig::default(),
            command_cooldown: DEFAULT_COMMAND_COOLDOWN,
        }
    }
}

impl Config {
    /// Load configuration from the config file and environment
    ///
    /// `path_override` (usually from `--config` / `LENS_CONFIG`) replaces
    /// the default file location; a missing default file is fine, a missing
    /// override is an error.
    ///
    /// # Errors
    ///
    /// Returns error if the config file is unreadable or malformed
    pub fn load(path_override: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = path_override {
            let contents = std::fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("cannot read config file {}: {e}", path.display()))
            })?;
            config.apply_file(&GatewayConfigFile::parse(&contents)?);
        } else if let Some(path) = default_config_path()
            && path.exists()
        {
            let contents = std::fs::read_to_string(&path)?;
            config.apply_file(&GatewayConfigFile::parse(&contents)?);
            tracing::debug!(path = %path.display(), "config file loaded");
        }

        config.apply_env();
        Ok(config)
    }

    /// Overlay values from a parsed config file
    fn apply_file(&mut self, file: &GatewayConfigFile) {
        if let Some(port) = file.server.port {
            self.port = port;
        }
        if let Some(ref api_key) = file.server.api_key {
            self.api_key = Some(api_key.clone());
        }
        if let Some(ref url) = file.backend.url {
            self.backend_url = url.clone();
        }
        if let Some(scope) = file.display.text_scope {
            self.display_text_scope = scope;
        }
        if let Some(ms) = file.timing.capture_tick_ms {
            self.scheduler.tick = Duration::from_millis(ms);
        }
        if let Some(ms) = file.timing.capture_backoff_ms {
            self.scheduler.backoff = Duration::from_millis(ms);
        }
        if let Some(ms) = file.timing.command_cooldown_ms {
            self.command_cooldown = Duration::from_millis(ms);
        }
    }

    /// Overlay values from environment variables
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("LENS_BACKEND_URL")
            && !url.is_empty()
        {
            self.backend_url = url;
        }
        if let Ok(key) = std::env::var("LENS_API_KEY")
            && !key.is_empty()
        {
            self.api_key = Some(key);
        }
    }
}

/// Default config file path: `~/.config/lens/gateway/config.toml`
fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "lens", "gateway")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
