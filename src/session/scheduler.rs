//! Per-session photo capture scheduling
//!
//! One cancellable tokio task per session decides once per tick whether to
//! capture, based on the session's streaming flag and throttle. Button
//! presses share the same state but bypass the throttle entirely.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::device::{ButtonEvent, DeviceHandle, PressType};
use crate::photos::PhotoCache;
use crate::session::{Session, now_ms};

/// Timing knobs for the capture loop
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// How often the capture decision runs
    pub tick: Duration,

    /// Throttle reserved before each attempt; becomes the retry backoff
    /// when the capture fails or hangs
    pub backoff: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(1000),
            backoff: Duration::from_millis(30_000),
        }
    }
}

/// Spawn the capture tick task for one session
///
/// The task runs until aborted; the daemon aborts it when the session
/// stops, so no timer outlives its session.
pub fn spawn_capture_task(
    session: Arc<Session>,
    device: DeviceHandle,
    photos: PhotoCache,
    config: SchedulerConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(config.tick);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            if !session.streaming() {
                continue;
            }
            if now_ms() < session.next_capture_at() {
                continue;
            }

            tick_capture(&session, &device, &photos, config.backoff).await;
        }
    })
}

/// One scheduled capture attempt, serialized against button captures
async fn tick_capture(
    session: &Arc<Session>,
    device: &DeviceHandle,
    photos: &PhotoCache,
    backoff: Duration,
) {
    let _guard = session.lock_capture().await;

    // Re-check under the guard: a concurrent attempt may have moved the
    // throttle while we waited.
    if now_ms() < session.next_capture_at() {
        return;
    }

    // Reserve the backoff up front: if the capture hangs or fails silently,
    // at most one attempt happens per backoff window.
    session.set_next_capture_at(now_ms() + duration_ms(backoff));

    match device.camera.request_photo().await {
        Ok(photo) => {
            // Capture worked, so the device can service another one on the
            // very next tick.
            session.set_next_capture_at(now_ms());
            tracing::info!(
                user_id = %session.user_id(),
                request_id = %photo.request_id,
                "scheduled photo captured"
            );
            photos.store(session.user_id(), photo).await;
        }
        Err(e) => {
            tracing::error!(user_id = %session.user_id(), error = %e, "error auto-taking photo");
        }
    }
}

/// Take a single user-initiated photo, ignoring streaming mode and the
/// capture throttle
///
/// Still serialized through the session's capture guard so it cannot
/// interleave with a scheduled attempt's reserve/commit sequence.
pub async fn capture_once(session: &Arc<Session>, device: &DeviceHandle, photos: &PhotoCache) {
    let _guard = session.lock_capture().await;

    match device.camera.request_photo().await {
        Ok(photo) => {
            tracing::info!(
                user_id = %session.user_id(),
                request_id = %photo.request_id,
                timestamp = %photo.timestamp,
                "photo taken"
            );
            photos.store(session.user_id(), photo).await;
        }
        Err(e) => {
            tracing::error!(user_id = %session.user_id(), error = %e, "error taking photo");
        }
    }
}

/// Handle a hardware button event for one session
///
/// Long press toggles streaming mode and never captures; short press always
/// captures, regardless of mode or throttle. Neither touches the voice
/// command debounce lock.
pub async fn handle_button_press(
    session: &Arc<Session>,
    device: &DeviceHandle,
    photos: &PhotoCache,
    event: &ButtonEvent,
) {
    tracing::info!(
        user_id = %session.user_id(),
        button_id = %event.button_id,
        press_type = ?event.press_type,
        "button pressed"
    );

    match event.press_type {
        PressType::Long => {
            let streaming = session.toggle_streaming();
            tracing::info!(user_id = %session.user_id(), streaming, "streaming toggled via button");
        }
        PressType::Short => {
            if let Err(e) = device
                .display
                .show_text_wall("Button pressed, about to take photo", Duration::from_secs(4))
                .await
            {
                tracing::warn!(error = %e, "status display failed");
            }
            capture_once(session, device, photos).await;
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn duration_ms(d: Duration) -> u64 {
    d.as_millis() as u64
}
