//! Voice command dispatch
//!
//! Applies the filtering contract to transcription events, takes the
//! per-session debounce lock, and drives the session, device, and backend
//! for the resolved command. Collaborator failures are logged or converted
//! into a spoken apology; nothing propagates to the event loop.

use std::sync::Arc;
use std::time::Duration;

use crate::backend::BackendGateway;
use crate::device::{DeviceHandle, TranscriptionEvent};
use crate::session::{Session, SessionRegistry};
use crate::voice::commands::{self, VoiceCommand};

/// How long transient status text stays on the device display
const STATUS_DURATION: Duration = Duration::from_secs(3);

/// Spoken confirmations and apologies
const SPEAK_STREAMING_ON: &str = "Streaming mode activated. Photos will be taken automatically.";
const SPEAK_STREAMING_OFF: &str = "Streaming mode deactivated.";
const SPEAK_HINT_FAILED: &str = "Sorry, I couldn't generate a hint right now.";
const SPEAK_HINT_ERROR: &str = "Sorry, there was an error getting your hint.";

/// Converts transcription events into command actions
#[derive(Clone)]
pub struct CommandDispatcher {
    registry: SessionRegistry,
    backend: Arc<BackendGateway>,
    cooldown: Duration,
}

impl CommandDispatcher {
    /// Create a dispatcher with the given debounce cooldown
    #[must_use]
    pub fn new(registry: SessionRegistry, backend: Arc<BackendGateway>, cooldown: Duration) -> Self {
        Self {
            registry,
            backend,
            cooldown,
        }
    }

    /// Handle one transcription event for `user_id`
    ///
    /// Non-final fragments, noise, unrecognized utterances, and anything
    /// arriving while the debounce lock is held are dropped silently.
    pub async fn handle_transcription(
        &self,
        user_id: &str,
        event: &TranscriptionEvent,
        device: &DeviceHandle,
    ) {
        if !event.is_final {
            return;
        }

        let Some((command, normalized)) = commands::classify(&event.text) else {
            tracing::debug!(user_id, text = %event.text, "ignoring non-command speech");
            return;
        };

        // Handlers can race session stop; a vanished session is a no-op.
        let Some(session) = self.registry.get(user_id).await else {
            tracing::debug!(user_id, "transcription for inactive session dropped");
            return;
        };

        if !session.try_acquire_command_lock() {
            tracing::debug!(user_id, command = %normalized, "command dropped, another in flight");
            return;
        }

        tracing::info!(user_id, command = %normalized, "voice command received");

        self.run_command(&session, command, &normalized, device)
            .await;

        // Time-based release: the cooldown starts after handling completes,
        // so a slow hint call extends the debounce window rather than
        // overlapping it.
        session.release_command_lock_after(self.cooldown);
    }

    async fn run_command(
        &self,
        session: &Arc<Session>,
        command: VoiceCommand,
        normalized: &str,
        device: &DeviceHandle,
    ) {
        let user_id = session.user_id();

        match command {
            VoiceCommand::StartStreaming => {
                session.set_streaming(true);
                tracing::info!(user_id, "streaming mode started via voice");
                show_status(device, "Streaming mode activated").await;
                speak(device, user_id, SPEAK_STREAMING_ON).await;
            }
            VoiceCommand::StopStreaming => {
                session.set_streaming(false);
                tracing::info!(user_id, "streaming mode stopped via voice");
                show_status(device, "Streaming mode deactivated").await;
                speak(device, user_id, SPEAK_STREAMING_OFF).await;
            }
            VoiceCommand::Hint => {
                show_status(device, "Voice command: Giving hint...").await;
                self.give_hint(session, normalized, device).await;
            }
        }
    }

    /// Fetch a hint and speak it
    ///
    /// The debounce lock stays held across the backend call, so a slow
    /// backend delays the next accepted command. That trade favors
    /// loop-prevention over responsiveness.
    async fn give_hint(&self, session: &Arc<Session>, command_text: &str, device: &DeviceHandle) {
        let user_id = session.user_id();

        match self.backend.give_hint(command_text, command_text).await {
            Ok(hint) => {
                let speech = commands::sanitize_for_speech(&hint);
                speak(device, user_id, &speech).await;
            }
            Err(crate::Error::Http(e)) => {
                tracing::error!(user_id, error = %e, "error getting hint");
                speak(device, user_id, SPEAK_HINT_ERROR).await;
            }
            Err(e) => {
                tracing::error!(user_id, error = %e, "hint request rejected");
                speak(device, user_id, SPEAK_HINT_FAILED).await;
            }
        }
    }
}

async fn show_status(device: &DeviceHandle, text: &str) {
    if let Err(e) = device.display.show_text_wall(text, STATUS_DURATION).await {
        tracing::warn!(error = %e, "status display failed");
    }
}

async fn speak(device: &DeviceHandle, user_id: &str, text: &str) {
    if let Err(e) = device.speaker.speak(text).await {
        tracing::error!(user_id, error = %e, "speech failed");
    }
}
