//! Cross-view change notification
//!
//! Every persist is announced on a process-wide broadcast channel. Views
//! filter notifications by storage key, reload, and re-render. There is no
//! versioning or merging: the last persisted document wins.
//!
//! Views in other processes never see the in-process channel. The
//! [`ExternalChangeWatcher`] closes that gap by polling the backend and
//! announcing values it did not hear about locally.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, oneshot};
use tokio_stream::StreamExt;
use tracing::{debug, error, info, trace, warn};

use crate::error::Result;
use crate::store::ConfigStore;

/// Default capacity of the notification channel
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 64;

/// Where a notification came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A `save` or `reset` in this process
    Local,
    /// A change detected in storage written by someone else
    External,
}

/// Signal emitted whenever the persisted document changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotification {
    /// Storage key that changed
    pub key: String,
    /// New persisted value; `None` when the key was removed
    pub new_value: Option<String>,
    pub origin: Origin,
    pub emitted_at: DateTime<Utc>,
}

impl ChangeNotification {
    pub fn local(key: impl Into<String>, new_value: Option<String>) -> Self {
        Self::new(key, new_value, Origin::Local)
    }

    pub fn external(key: impl Into<String>, new_value: Option<String>) -> Self {
        Self::new(key, new_value, Origin::External)
    }

    fn new(key: impl Into<String>, new_value: Option<String>, origin: Origin) -> Self {
        Self {
            key: key.into(),
            new_value,
            origin,
            emitted_at: Utc::now(),
        }
    }
}

/// Process-wide broadcast of [`ChangeNotification`]s
///
/// Cheap to clone; clones share one channel.
#[derive(Debug, Clone)]
pub struct ChangeNotifier {
    tx: broadcast::Sender<ChangeNotification>,
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Broadcast a notification; returns how many subscribers received it
    pub fn notify(&self, notification: ChangeNotification) -> usize {
        let key = notification.key.clone();
        match self.tx.send(notification) {
            Ok(receivers) => {
                trace!("Notified {} listener(s) of change to '{}'", receivers, key);
                receivers
            }
            Err(_) => {
                trace!("No listeners for change to '{}'", key);
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeNotification> {
        self.tx.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_CAPACITY)
    }
}

/// Resolves when the test channel fires (or is dropped), or on Ctrl-C when
/// no channel is given.
pub(crate) async fn shutdown_signal(shutdown_rx: Option<oneshot::Receiver<()>>) {
    match shutdown_rx {
        Some(rx) => {
            let _ = rx.await;
        }
        None => {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Polls storage for changes written outside this process
///
/// Local saves are observed through the store's change stream and only
/// update the last value seen, so they are not announced twice. A poll that
/// races a local save may still announce it once more; reloading twice is
/// harmless.
pub struct ExternalChangeWatcher {
    store: ConfigStore,
    interval: Duration,
}

impl ExternalChangeWatcher {
    pub fn new(store: ConfigStore, interval: Duration) -> Self {
        Self {
            store,
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    /// Compare storage with `last_seen`; announce and remember a difference
    ///
    /// Returns whether a notification was sent.
    pub async fn check(&self, last_seen: &mut Option<String>) -> Result<bool> {
        let current = self.store.raw().await?;
        if current == *last_seen {
            return Ok(false);
        }

        debug!(
            "External change detected for '{}' ({})",
            self.store.key(),
            if current.is_some() { "written" } else { "removed" }
        );
        *last_seen = current.clone();
        self.store
            .notifier()
            .notify(ChangeNotification::external(self.store.key(), current));
        Ok(true)
    }

    /// Poll until shutdown
    ///
    /// With `None`, runs until Ctrl-C.
    pub async fn run_with_shutdown(
        &self,
        shutdown_rx: Option<oneshot::Receiver<()>>,
    ) -> Result<()> {
        let mut last_seen = self.store.raw().await?;
        let mut local = self.store.changes();

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let shutdown = shutdown_signal(shutdown_rx);
        tokio::pin!(shutdown);

        info!(
            "Watching '{}' for external changes every {:?}",
            self.store.key(),
            self.interval
        );

        loop {
            tokio::select! {
                Some(notification) = local.next() => {
                    last_seen = notification.new_value;
                }

                _ = ticker.tick() => {
                    if let Err(e) = self.check(&mut last_seen).await {
                        warn!("Failed to poll storage for changes: {}", e);
                    }
                }

                _ = &mut shutdown => {
                    info!("External change watcher stopped");
                    break;
                }
            }
        }

        Ok(())
    }
}
