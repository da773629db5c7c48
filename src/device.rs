//! Device boundary: collaborator traits and event types
//!
//! The wearable runtime (camera, speaker, display) and its event stream sit
//! outside this crate. Each collaborator implements one of the traits below,
//! and the runtime feeds [`DeviceEvent`]s into the daemon over an mpsc
//! channel.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::Result;

/// A photo returned by the device camera
#[derive(Debug, Clone)]
pub struct CapturedPhoto {
    /// Capture request identifier assigned by the device
    pub request_id: String,

    /// Raw image bytes
    pub bytes: Vec<u8>,

    /// Capture time
    pub timestamp: DateTime<Utc>,

    /// MIME type of the image (e.g. "image/jpeg")
    pub mime_type: String,

    /// Filename reported by the device
    pub filename: String,

    /// Size of the image in bytes
    pub size: usize,
}

impl CapturedPhoto {
    /// Create a photo with a fresh request id and the current timestamp
    #[must_use]
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>, filename: impl Into<String>) -> Self {
        let size = bytes.len();
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            bytes,
            timestamp: Utc::now(),
            mime_type: mime_type.into(),
            filename: filename.into(),
            size,
        }
    }
}

/// Requests photo captures from the device camera
#[async_trait]
pub trait Camera: Send + Sync {
    /// Capture a single photo
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot service the capture
    async fn request_photo(&self) -> Result<CapturedPhoto>;
}

/// Speaks text through the device audio output
#[async_trait]
pub trait Speaker: Send + Sync {
    /// Synthesize and play the given text
    ///
    /// # Errors
    ///
    /// Returns error if synthesis or playback fails
    async fn speak(&self, text: &str) -> Result<()>;
}

/// Shows transient text on the device display
#[async_trait]
pub trait Display: Send + Sync {
    /// Show a text wall for the given duration
    ///
    /// # Errors
    ///
    /// Returns error if the display rejects the layout
    async fn show_text_wall(&self, text: &str, duration: Duration) -> Result<()>;
}

/// Handles to one connected device's collaborators
///
/// Delivered with [`DeviceEvent::SessionStarted`] and held by the daemon for
/// the lifetime of the session.
#[derive(Clone)]
pub struct DeviceHandle {
    pub camera: Arc<dyn Camera>,
    pub speaker: Arc<dyn Speaker>,
    pub display: Arc<dyn Display>,
}

impl std::fmt::Debug for DeviceHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceHandle").finish_non_exhaustive()
    }
}

/// A transcription fragment from the device's speech recognizer
#[derive(Debug, Clone)]
pub struct TranscriptionEvent {
    /// Transcribed text (possibly partial)
    pub text: String,

    /// Whether the recognizer has finalized this utterance
    pub is_final: bool,
}

/// How the hardware button was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressType {
    Short,
    Long,
}

/// A hardware button event
#[derive(Debug, Clone)]
pub struct ButtonEvent {
    /// Which button was pressed
    pub button_id: String,

    /// Short tap or long hold
    pub press_type: PressType,
}

/// Events delivered by the device runtime, one stream for all users
#[derive(Debug)]
pub enum DeviceEvent {
    /// A user launched the app on their device
    SessionStarted {
        user_id: String,
        device: DeviceHandle,
    },

    /// The user's session ended
    SessionStopped { user_id: String, reason: String },

    /// A transcription fragment for an active session
    Transcription {
        user_id: String,
        event: TranscriptionEvent,
    },

    /// A button press for an active session
    ButtonPress {
        user_id: String,
        event: ButtonEvent,
    },
}
