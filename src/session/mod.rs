//! Per-user session state
//!
//! A [`Session`] is the single source of truth for one user's streaming
//! flag, capture throttle, and voice-command debounce. The [`SessionRegistry`]
//! maps user ids to live sessions; registry membership is what handlers
//! check to tolerate a session that vanished mid-flight.

mod scheduler;

pub use scheduler::{SchedulerConfig, capture_once, handle_button_press, spawn_capture_task};

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};

/// Current wall-clock time in epoch milliseconds
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis() as u64
}

/// Per-user session state
///
/// Field access is lock-free (atomics); only capture attempts take the
/// async `capture_guard` so the reserve/attempt/commit sequence in the
/// scheduler cannot interleave with a button-press capture for the same
/// user.
#[derive(Debug)]
pub struct Session {
    user_id: String,
    streaming: AtomicBool,
    next_capture_at: AtomicU64,
    // Shared with the detached cooldown task that clears it
    command_lock: Arc<AtomicBool>,
    capture_guard: Mutex<()>,
}

impl Session {
    /// Create a session with default state: not streaming, capture
    /// eligible immediately, no command in flight
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            streaming: AtomicBool::new(false),
            next_capture_at: AtomicU64::new(now_ms()),
            command_lock: Arc::new(AtomicBool::new(false)),
            capture_guard: Mutex::new(()),
        }
    }

    /// The user this session belongs to
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Whether streaming mode is on
    #[must_use]
    pub fn streaming(&self) -> bool {
        self.streaming.load(Ordering::SeqCst)
    }

    /// Turn streaming mode on or off
    pub fn set_streaming(&self, value: bool) {
        self.streaming.store(value, Ordering::SeqCst);
    }

    /// Flip streaming mode, returning the new value
    ///
    /// Used by the long-press handler; a load-then-store toggle could lose
    /// a concurrent voice-command update.
    pub fn toggle_streaming(&self) -> bool {
        !self.streaming.fetch_xor(true, Ordering::SeqCst)
    }

    /// Epoch-millis time before which no scheduled capture may run
    #[must_use]
    pub fn next_capture_at(&self) -> u64 {
        self.next_capture_at.load(Ordering::SeqCst)
    }

    /// Move the capture eligibility time
    pub fn set_next_capture_at(&self, at_ms: u64) {
        self.next_capture_at.store(at_ms, Ordering::SeqCst);
    }

    /// Try to take the voice-command debounce lock
    ///
    /// Compare-and-set: returns `false` if another command is already being
    /// processed (or is still inside its cooldown window).
    pub fn try_acquire_command_lock(&self) -> bool {
        self.command_lock
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Release the debounce lock after `delay`
    ///
    /// The release is time-based rather than completion-based: holding the
    /// lock through the cooldown stops an utterance from re-triggering
    /// itself off its own spoken confirmation.
    pub fn release_command_lock_after(&self, delay: Duration) {
        let lock = Arc::clone(&self.command_lock);
        let user_id = self.user_id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            lock.store(false, Ordering::SeqCst);
            tracing::trace!(%user_id, "command lock released");
        });
    }

    /// Whether the debounce lock is currently held
    #[must_use]
    pub fn command_lock_held(&self) -> bool {
        self.command_lock.load(Ordering::SeqCst)
    }

    /// Serialize a capture attempt for this session
    pub async fn lock_capture(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.capture_guard.lock().await
    }
}

/// Registry of live sessions, one per concurrently active user
///
/// Insert on session start, remove on stop. The map lock is held only for
/// lookups and membership changes, never across an await point; per-session
/// mutation goes through the [`Session`] itself.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<String, Arc<Session>>>>,
}

impl SessionRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a session for `user_id`, returning it
    ///
    /// Starting a user who is already active replaces the old record; the
    /// caller is expected not to do that.
    pub async fn insert(&self, user_id: &str) -> Arc<Session> {
        let session = Arc::new(Session::new(user_id));
        self.inner
            .write()
            .await
            .insert(user_id.to_string(), Arc::clone(&session));
        session
    }

    /// Remove the session for `user_id`, returning whether one existed
    pub async fn remove(&self, user_id: &str) -> bool {
        self.inner.write().await.remove(user_id).is_some()
    }

    /// Look up the live session for `user_id`
    pub async fn get(&self, user_id: &str) -> Option<Arc<Session>> {
        self.inner.read().await.get(user_id).cloned()
    }

    /// Whether `user_id` currently has a live session
    pub async fn contains(&self, user_id: &str) -> bool {
        self.inner.read().await.contains_key(user_id)
    }

    /// Number of live sessions
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether no sessions are live
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults() {
        let session = Session::new("user-1");
        assert_eq!(session.user_id(), "user-1");
        assert!(!session.streaming());
        assert!(!session.command_lock_held());
        assert!(session.next_capture_at() <= now_ms());
    }

    #[test]
    fn test_toggle_streaming() {
        let session = Session::new("user-1");
        assert!(session.toggle_streaming());
        assert!(session.streaming());
        assert!(!session.toggle_streaming());
        assert!(!session.streaming());
    }

    #[test]
    fn test_command_lock_is_compare_and_set() {
        let session = Session::new("user-1");
        assert!(session.try_acquire_command_lock());
        assert!(!session.try_acquire_command_lock());
        assert!(session.command_lock_held());
    }

    #[tokio::test]
    async fn test_command_lock_releases_after_delay() {
        let session = Arc::new(Session::new("user-1"));
        assert!(session.try_acquire_command_lock());

        session.release_command_lock_after(Duration::from_millis(20));
        assert!(session.command_lock_held());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(!session.command_lock_held());
        assert!(session.try_acquire_command_lock());
    }

    #[tokio::test]
    async fn test_registry_insert_get_remove() {
        let registry = SessionRegistry::new();
        assert!(registry.is_empty().await);

        let session = registry.insert("user-1").await;
        assert_eq!(registry.len().await, 1);
        assert!(registry.contains("user-1").await);

        let looked_up = registry.get("user-1").await.unwrap();
        assert!(Arc::ptr_eq(&session, &looked_up));

        assert!(registry.remove("user-1").await);
        assert!(!registry.remove("user-1").await);
        assert!(registry.get("user-1").await.is_none());
    }
}
