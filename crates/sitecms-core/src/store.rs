//! The configuration store
//!
//! [`ConfigStore`] is the single source of truth shared by every view: it
//! reads the persisted document (deep-merged over the built-in defaults),
//! writes it back, resets it, and announces every write on a process-wide
//! [`ChangeNotifier`].
//!
//! ```text
//! ┌─────────────┐  save()   ┌────────────────┐  set_item   ┌────────────────┐
//! │ View (edit) │─────────▶ │  ConfigStore   │───────────▶ │ StorageBackend │
//! └─────────────┘           └────────────────┘             └────────────────┘
//!        ▲                          │ notify
//!        │ reload + render          ▼
//! ┌─────────────┐           ┌────────────────┐
//! │ View (any)  │◀──────────│ ChangeNotifier │
//! └─────────────┘           └────────────────┘
//! ```
//!
//! Clones share the backend and the notifier.

use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::{Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::config::{CmsConfig, validate_storage_key};
use crate::document::Document;
use crate::error::Result;
use crate::sync::{ChangeNotification, ChangeNotifier, DEFAULT_NOTIFICATION_CAPACITY};
use crate::traits::StorageBackend;

/// Fixed key the document is persisted under
pub const STORAGE_KEY: &str = "ac_suite_cms_v1";

/// Handle to the persisted configuration document
#[derive(Clone)]
pub struct ConfigStore {
    backend: Arc<dyn StorageBackend>,
    key: Arc<str>,
    notifier: ChangeNotifier,
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("backend", &self.backend.backend_name())
            .field("key", &self.key)
            .field("listeners", &self.notifier.receiver_count())
            .finish()
    }
}

impl ConfigStore {
    /// Create a store over `backend` using the default [`STORAGE_KEY`]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            key: Arc::from(STORAGE_KEY),
            notifier: ChangeNotifier::new(DEFAULT_NOTIFICATION_CAPACITY),
        }
    }

    /// Create a store persisting under a custom key
    pub fn with_key(backend: Arc<dyn StorageBackend>, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        validate_storage_key(&key)?;
        Ok(Self {
            backend,
            key: Arc::from(key),
            notifier: ChangeNotifier::new(DEFAULT_NOTIFICATION_CAPACITY),
        })
    }

    /// Create a store from a validated configuration
    pub fn from_config(backend: Arc<dyn StorageBackend>, config: &CmsConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            backend,
            key: Arc::from(config.storage_key.as_str()),
            notifier: ChangeNotifier::new(config.sync.notification_capacity),
        })
    }

    /// Key the document is persisted under
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Underlying storage backend
    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    /// Notifier shared by every clone of this store
    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    /// The persisted payload exactly as stored
    pub async fn raw(&self) -> Result<Option<String>> {
        self.backend.get_item(&self.key).await
    }

    /// Every key held by the backend, not only this store's
    pub async fn stored_keys(&self) -> Result<Vec<String>> {
        self.backend.keys().await
    }

    /// Load the current document
    ///
    /// The persisted document is deep-merged over the defaults so fields
    /// introduced after it was written are present. A missing, unreadable or
    /// ill-typed payload yields a fresh copy of the defaults. Never fails.
    pub async fn load(&self) -> Document {
        let raw = match self.raw().await {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => {
                debug!("No persisted document under '{}', using defaults", self.key);
                return Document::defaults();
            }
            Err(e) => {
                warn!(
                    "Failed to read persisted document '{}': {}. Using defaults.",
                    self.key, e
                );
                return Document::defaults();
            }
        };

        match Document::from_persisted(&raw) {
            Ok(document) => {
                debug!("Loaded document '{}' ({} bytes)", self.key, raw.len());
                document
            }
            Err(e) => {
                warn!("{} (key '{}'). Using defaults.", e, self.key);
                Document::defaults()
            }
        }
    }

    /// Persist the full document, then announce the change
    ///
    /// Every subscriber receives the notification, including the writer's
    /// own view.
    pub async fn save(&self, document: &Document) -> Result<()> {
        let payload = document.to_persisted()?;
        self.backend.set_item(&self.key, &payload).await?;
        debug!("Saved document '{}' ({} bytes)", self.key, payload.len());

        self.notifier
            .notify(ChangeNotification::local(self.key(), Some(payload)));
        Ok(())
    }

    /// Delete the persisted document and return fresh defaults
    ///
    /// Listeners are notified with no new value, the way a removed
    /// local-storage key is reported.
    pub async fn reset(&self) -> Result<Document> {
        self.backend.remove_item(&self.key).await?;
        info!("Reset document '{}' to defaults", self.key);

        self.notifier.notify(ChangeNotification::local(self.key(), None));
        Ok(Document::defaults())
    }

    /// Subscribe to every change notification on this store's notifier
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeNotification> {
        self.notifier.subscribe()
    }

    /// Stream of change notifications for this store's key
    ///
    /// Notifications missed by a lagging subscriber are skipped with a
    /// warning.
    pub fn changes(&self) -> Pin<Box<dyn Stream<Item = ChangeNotification> + Send + 'static>> {
        let key = Arc::clone(&self.key);
        let stream =
            BroadcastStream::new(self.notifier.subscribe()).filter_map(move |item| match item {
                Ok(notification) if notification.key == *key => Some(notification),
                Ok(_) => None,
                Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                    warn!("Change stream lagged, skipped {} notification(s)", skipped);
                    None
                }
            });
        Box::pin(stream)
    }
}
