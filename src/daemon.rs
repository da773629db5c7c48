//! Daemon - the main gateway service
//!
//! Wires the session registry, capture scheduler, voice command dispatcher,
//! photo cache, and webview API together, and owns session lifecycle: a
//! session's tick task is spawned on start and aborted on stop.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::api::{self, ApiState};
use crate::backend::BackendGateway;
use crate::config::Config;
use crate::device::{DeviceEvent, DeviceHandle};
use crate::display_text::DisplayTextStore;
use crate::photos::PhotoCache;
use crate::session::{self, Session, SessionRegistry};
use crate::voice::CommandDispatcher;
use crate::{Error, Result};

/// Spoken once when a session starts
const WELCOME_PROMPT: &str =
    "Say 'start streaming' to begin, 'stop streaming' to end, or 'help' for hints.";

/// A live session with its device handles and tick task
struct ActiveSession {
    session: Arc<Session>,
    device: DeviceHandle,
    tick_task: JoinHandle<()>,
}

/// The lens gateway daemon
pub struct Daemon {
    config: Config,
    registry: SessionRegistry,
    photos: PhotoCache,
    display_text: Arc<DisplayTextStore>,
    dispatcher: CommandDispatcher,
}

impl Daemon {
    /// Create a daemon from configuration
    #[must_use]
    pub fn new(config: Config) -> Self {
        let backend = Arc::new(BackendGateway::new(config.backend_url.clone()));
        let registry = SessionRegistry::new();
        let photos = PhotoCache::new(Arc::clone(&backend));
        let display_text = DisplayTextStore::new(config.display_text_scope);
        let dispatcher = CommandDispatcher::new(
            registry.clone(),
            backend,
            config.command_cooldown,
        );

        Self {
            config,
            registry,
            photos,
            display_text,
            dispatcher,
        }
    }

    /// Registry of live sessions
    #[must_use]
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Build the shared state for the webview API
    #[must_use]
    pub fn api_state(&self) -> Arc<ApiState> {
        Arc::new(ApiState {
            photos: self.photos.clone(),
            display_text: Arc::clone(&self.display_text),
            api_key: self.config.api_key.clone(),
        })
    }

    /// Run the daemon until the device event stream closes or the process
    /// is interrupted
    ///
    /// # Errors
    ///
    /// Returns error if the webview API server fails
    pub async fn run(self, mut events: mpsc::Receiver<DeviceEvent>) -> Result<()> {
        tracing::info!(
            port = self.config.port,
            backend = %self.config.backend_url,
            "daemon running"
        );

        // Set up shutdown signal
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = shutdown_tx.send(()).await;
            }
        });

        // Webview API server
        let (api_stop_tx, api_stop_rx) = oneshot::channel::<()>();
        let api_task = tokio::spawn(api::serve(self.api_state(), self.config.port, async move {
            let _ = api_stop_rx.await;
        }));

        let mut active: HashMap<String, ActiveSession> = HashMap::new();

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("shutdown requested");
                    break;
                }
                event = events.recv() => {
                    let Some(event) = event else {
                        tracing::info!("device event stream closed");
                        break;
                    };
                    self.handle_event(&mut active, event).await;
                }
            }
        }

        // Tear down sessions deterministically so no tick task outlives
        // the daemon.
        for (user_id, entry) in active.drain() {
            entry.tick_task.abort();
            self.registry.remove(&user_id).await;
        }

        let _ = api_stop_tx.send(());
        match api_task.await {
            Ok(result) => result,
            Err(e) => Err(Error::Server(format!("api server task failed: {e}"))),
        }
    }

    /// Route one device event
    async fn handle_event(&self, active: &mut HashMap<String, ActiveSession>, event: DeviceEvent) {
        match event {
            DeviceEvent::SessionStarted { user_id, device } => {
                self.start_session(active, user_id, device).await;
            }
            DeviceEvent::SessionStopped { user_id, reason } => {
                self.stop_session(active, &user_id, &reason).await;
            }
            DeviceEvent::Transcription { user_id, event } => {
                let Some(entry) = active.get(&user_id) else {
                    tracing::debug!(%user_id, "transcription for unknown session dropped");
                    return;
                };

                // Handled off the event loop so a slow hint call never
                // stalls other users' events.
                let dispatcher = self.dispatcher.clone();
                let device = entry.device.clone();
                tokio::spawn(async move {
                    dispatcher.handle_transcription(&user_id, &event, &device).await;
                });
            }
            DeviceEvent::ButtonPress { user_id, event } => {
                let Some(entry) = active.get(&user_id) else {
                    tracing::debug!(%user_id, "button press for unknown session dropped");
                    return;
                };

                let session = Arc::clone(&entry.session);
                let device = entry.device.clone();
                let photos = self.photos.clone();
                tokio::spawn(async move {
                    session::handle_button_press(&session, &device, &photos, &event).await;
                });
            }
        }
    }

    /// Start a session: register state, spawn the tick task, speak the
    /// welcome prompt
    async fn start_session(
        &self,
        active: &mut HashMap<String, ActiveSession>,
        user_id: String,
        device: DeviceHandle,
    ) {
        if let Some(previous) = active.remove(&user_id) {
            tracing::warn!(%user_id, "session started while already active; replacing");
            previous.tick_task.abort();
        }

        let session = self.registry.insert(&user_id).await;
        tracing::info!(%user_id, "session started");

        let tick_task = session::spawn_capture_task(
            Arc::clone(&session),
            device.clone(),
            self.photos.clone(),
            self.config.scheduler,
        );

        let welcome_device = device.clone();
        let welcome_user = user_id.clone();
        tokio::spawn(async move {
            if let Err(e) = welcome_device.speaker.speak(WELCOME_PROMPT).await {
                tracing::warn!(user_id = %welcome_user, error = %e, "welcome prompt failed");
            }
        });

        active.insert(
            user_id,
            ActiveSession {
                session,
                device,
                tick_task,
            },
        );
    }

    /// Stop a session: abort its tick task and drop its state
    async fn stop_session(
        &self,
        active: &mut HashMap<String, ActiveSession>,
        user_id: &str,
        reason: &str,
    ) {
        if let Some(entry) = active.remove(user_id) {
            entry.tick_task.abort();
        }
        self.registry.remove(user_id).await;
        tracing::info!(user_id, reason, "session stopped");
    }
}
