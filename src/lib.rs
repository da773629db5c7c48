//! Lens Gateway - session gateway for a voice-controlled wearable camera
//!
//! This library provides the core functionality for the lens gateway:
//! - Per-user session state (streaming mode, capture throttle, command debounce)
//! - Voice command dispatch with debounce
//! - Periodic photo capture scheduling
//! - Single-slot photo cache with fire-and-forget backend analysis
//! - Webview HTTP API for the companion browser client
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                 Device Runtime                       │
//! │   Transcriptions  │  Buttons  │  Camera  │  Speaker │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Lens Gateway                         │
//! │   Sessions  │  Dispatcher  │  Scheduler  │  Cache   │
//! └──────────┬──────────────────────────┬───────────────┘
//!            │                          │
//! ┌──────────▼───────────┐   ┌──────────▼───────────────┐
//! │  Hint/OCR Backend    │   │  Webview API (browser)   │
//! └──────────────────────┘   └──────────────────────────┘
//! ```

pub mod api;
pub mod backend;
pub mod config;
pub mod daemon;
pub mod device;
pub mod display_text;
pub mod error;
pub mod photos;
pub mod session;
pub mod voice;

pub use backend::BackendGateway;
pub use config::Config;
pub use daemon::Daemon;
pub use device::{
    ButtonEvent, Camera, CapturedPhoto, DeviceEvent, DeviceHandle, Display, PressType, Speaker,
    TranscriptionEvent,
};
pub use display_text::{DisplayText, DisplayTextScope, DisplayTextStore};
pub use error::{Error, Result};
pub use photos::{PhotoCache, StoredPhoto};
pub use session::{SchedulerConfig, Session, SessionRegistry};
pub use voice::{CommandDispatcher, VoiceCommand};
