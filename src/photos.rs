//! Single-slot photo cache
//!
//! Holds the most recent photo per user. Every store overwrites the slot
//! and hands the new photo to the backend for analysis as a detached task.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::backend::BackendGateway;
use crate::device::CapturedPhoto;

/// A cached photo with its capture metadata
#[derive(Debug, Clone)]
pub struct StoredPhoto {
    pub request_id: String,
    pub user_id: String,
    pub bytes: Vec<u8>,
    pub timestamp: DateTime<Utc>,
    pub mime_type: String,
    pub filename: String,
    pub size: usize,
}

impl StoredPhoto {
    /// Tag a captured photo with the user it belongs to
    #[must_use]
    pub fn from_capture(photo: CapturedPhoto, user_id: impl Into<String>) -> Self {
        Self {
            request_id: photo.request_id,
            user_id: user_id.into(),
            bytes: photo.bytes,
            timestamp: photo.timestamp,
            mime_type: photo.mime_type,
            filename: photo.filename,
            size: photo.size,
        }
    }
}

/// Most-recent-photo cache, one slot per user
///
/// `store` is the only mutator; readers get the current entry or nothing.
/// No history is kept and nothing is persisted.
#[derive(Debug, Clone)]
pub struct PhotoCache {
    slots: Arc<RwLock<HashMap<String, Arc<StoredPhoto>>>>,
    backend: Arc<BackendGateway>,
}

impl PhotoCache {
    /// Create an empty cache that reports stored photos to `backend`
    #[must_use]
    pub fn new(backend: Arc<BackendGateway>) -> Self {
        Self {
            slots: Arc::new(RwLock::new(HashMap::new())),
            backend,
        }
    }

    /// Cache a photo for `user_id`, overwriting any previous entry, and
    /// kick off fire-and-forget backend analysis
    pub async fn store(&self, user_id: &str, photo: CapturedPhoto) -> Arc<StoredPhoto> {
        let stored = Arc::new(StoredPhoto::from_capture(photo, user_id));

        self.slots
            .write()
            .await
            .insert(user_id.to_string(), Arc::clone(&stored));

        tracing::info!(
            user_id,
            request_id = %stored.request_id,
            timestamp = %stored.timestamp,
            "photo cached"
        );

        self.backend.spawn_analyze(Arc::clone(&stored));
        stored
    }

    /// The current photo for `user_id`, if any
    pub async fn get(&self, user_id: &str) -> Option<Arc<StoredPhoto>> {
        self.slots.read().await.get(user_id).cloned()
    }

    /// Drop the slot for `user_id`
    pub async fn remove(&self, user_id: &str) {
        self.slots.write().await.remove(user_id);
    }
}
