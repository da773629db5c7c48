//! Display text store
//!
//! A settable piece of text the webview polls for. Defaults to a single
//! process-wide slot shared by every user; `per-session` scope keeps one
//! slot per user instead.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

/// Whether display text is shared across all users or kept per session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayTextScope {
    /// One shared slot for the whole process
    #[default]
    Global,
    /// One slot per user
    PerSession,
}

/// A piece of display text and when it was set
#[derive(Debug, Clone)]
pub struct DisplayText {
    pub text: String,
    pub updated_at: DateTime<Utc>,
}

/// Store for webview display text
#[derive(Debug)]
pub struct DisplayTextStore {
    scope: DisplayTextScope,
    global: RwLock<Option<DisplayText>>,
    per_user: RwLock<HashMap<String, DisplayText>>,
}

impl DisplayTextStore {
    /// Create an empty store with the given scope
    #[must_use]
    pub fn new(scope: DisplayTextScope) -> Arc<Self> {
        Arc::new(Self {
            scope,
            global: RwLock::new(None),
            per_user: RwLock::new(HashMap::new()),
        })
    }

    /// The configured scope
    #[must_use]
    pub const fn scope(&self) -> DisplayTextScope {
        self.scope
    }

    /// Set the text, for `user_id` when scoped per session
    ///
    /// In global scope the user id is ignored.
    pub async fn set(&self, user_id: Option<&str>, text: impl Into<String>) -> DisplayText {
        let entry = DisplayText {
            text: text.into(),
            updated_at: Utc::now(),
        };

        match (self.scope, user_id) {
            (DisplayTextScope::Global, _) => {
                *self.global.write().await = Some(entry.clone());
            }
            (DisplayTextScope::PerSession, Some(user_id)) => {
                self.per_user
                    .write()
                    .await
                    .insert(user_id.to_string(), entry.clone());
            }
            (DisplayTextScope::PerSession, None) => {
                tracing::warn!("display text set without user id in per-session scope; dropped");
            }
        }

        entry
    }

    /// Read the current text, for `user_id` when scoped per session
    pub async fn get(&self, user_id: Option<&str>) -> Option<DisplayText> {
        match (self.scope, user_id) {
            (DisplayTextScope::Global, _) => self.global.read().await.clone(),
            (DisplayTextScope::PerSession, Some(user_id)) => {
                self.per_user.read().await.get(user_id).cloned()
            }
            (DisplayTextScope::PerSession, None) => None,
        }
    }
}
