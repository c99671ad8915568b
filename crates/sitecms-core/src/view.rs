//! Views
//!
//! A [`View`] owns one in-memory copy of the document and one renderer. It
//! follows a small state machine:
//!
//! ```text
//! Uninitialized ─▶ Loaded ─▶ (edit ─▶ Persisted ─▶ Rendered)*
//!                     └────▶ Notified ─▶ Reloaded ─▶ Rendered   (any time)
//! ```
//!
//! Every mutation persists the whole document before re-rendering, and every
//! change notification for the store's key makes the view reload from
//! storage. Last writer wins.

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, trace, warn};

use crate::config::CmsConfig;
use crate::document::Document;
use crate::edit::Edit;
use crate::error::Result;
use crate::render::{RenderEnv, Renderer};
use crate::store::ConfigStore;
use crate::sync::{ChangeNotification, Origin, shutdown_signal};

/// Default capacity of a view's event channel
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Lifecycle state of a view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Uninitialized,
    Loaded,
    Persisted,
    Rendered,
    Notified,
    Reloaded,
}

/// Events emitted by a view for monitoring and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// Initial document loaded from storage
    Loaded,

    /// The in-memory document was written to storage
    Persisted,

    /// Output regenerated
    Rendered {
        renderer: &'static str,
        bytes: usize,
        at: DateTime<Utc>,
    },

    /// Document reloaded after a change notification
    Reloaded { origin: Origin },

    /// An import payload was refused; nothing changed
    ImportRejected { reason: String },

    /// The listen loop ended
    Stopped { reason: String },
}

/// One rendering context over a shared [`ConfigStore`]
pub struct View<R: Renderer> {
    store: ConfigStore,
    renderer: R,
    env: RenderEnv,
    state: ViewState,
    document: Document,
    output: String,
    notifications: broadcast::Receiver<ChangeNotification>,
    event_tx: mpsc::Sender<ViewEvent>,
}

impl<R: Renderer> std::fmt::Debug for View<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("renderer", &self.renderer.name())
            .field("key", &self.store.key())
            .field("state", &self.state)
            .field("env", &self.env)
            .finish()
    }
}

impl<R: Renderer> View<R> {
    /// Create a view with the default event capacity
    ///
    /// The view subscribes to change notifications here, so changes made
    /// between construction and [`load`](Self::load) are not lost.
    ///
    /// # Returns
    ///
    /// A tuple of (view, event_receiver)
    pub fn new(
        store: ConfigStore,
        renderer: R,
        env: RenderEnv,
    ) -> (Self, mpsc::Receiver<ViewEvent>) {
        Self::with_event_capacity(store, renderer, env, DEFAULT_EVENT_CAPACITY)
    }

    /// Create a view taking the environment and channel size from `config`
    pub fn from_config(
        store: ConfigStore,
        renderer: R,
        config: &CmsConfig,
    ) -> (Self, mpsc::Receiver<ViewEvent>) {
        Self::with_event_capacity(
            store,
            renderer,
            RenderEnv::from(&config.display),
            config.sync.event_channel_capacity,
        )
    }

    pub fn with_event_capacity(
        store: ConfigStore,
        renderer: R,
        env: RenderEnv,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<ViewEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let notifications = store.subscribe();

        let view = Self {
            store,
            renderer,
            env,
            state: ViewState::Uninitialized,
            document: Document::defaults(),
            output: String::new(),
            notifications,
            event_tx: tx,
        };
        (view, rx)
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    /// The in-memory document
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Output of the last render; empty before the first one
    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn env(&self) -> RenderEnv {
        self.env
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Load the document from storage and render it
    pub async fn load(&mut self) -> &str {
        self.document = self.store.load().await;
        self.state = ViewState::Loaded;
        self.emit_event(ViewEvent::Loaded);
        debug!("{} view loaded '{}'", self.renderer.name(), self.store.key());

        self.render();
        &self.output
    }

    /// Apply an edit, persist the document, and re-render
    ///
    /// Returns `Ok(false)` when the edit addressed a missing entry; nothing
    /// is persisted in that case. If the write fails the in-memory document
    /// is restored and the error returned.
    pub async fn apply(&mut self, edit: &Edit) -> Result<bool> {
        self.ensure_loaded().await;

        let mut candidate = self.document.clone();
        if !edit.apply(&mut candidate, &self.env) {
            debug!("Edit {:?} addressed nothing, ignored", edit);
            return Ok(false);
        }

        self.persist(candidate).await?;
        Ok(true)
    }

    /// Shallow-merge an exported document into this one, persist, re-render
    ///
    /// A rejected payload is reported once through
    /// [`ViewEvent::ImportRejected`] and leaves everything unchanged.
    pub async fn import(&mut self, payload: &str) -> Result<()> {
        self.ensure_loaded().await;

        let mut candidate = self.document.clone();
        if let Err(e) = candidate.merge_import(payload) {
            warn!("{}", e);
            self.emit_event(ViewEvent::ImportRejected {
                reason: e.to_string(),
            });
            return Err(e);
        }

        self.persist(candidate).await?;
        info!("Imported document into '{}'", self.store.key());
        Ok(())
    }

    /// The in-memory document as pretty-printed JSON
    pub fn export(&self) -> Result<String> {
        self.document.to_export()
    }

    /// Remove the persisted document, then persist and render the defaults
    pub async fn reset_all(&mut self) -> Result<()> {
        let defaults = self.store.reset().await?;
        self.persist(defaults).await
    }

    /// Update the ambient color-scheme preference
    ///
    /// Only a view whose theme follows the system re-renders. Returns
    /// whether it did.
    pub fn set_prefers_dark(&mut self, prefers_dark: bool) -> bool {
        if self.env.prefers_dark == prefers_dark {
            return false;
        }
        self.env.prefers_dark = prefers_dark;

        if self.state == ViewState::Uninitialized
            || self.document.theme.mode != crate::document::ThemeMode::System
        {
            return false;
        }
        self.render();
        true
    }

    /// React to one change notification
    ///
    /// Notifications for other keys are ignored. Returns whether the view
    /// reloaded.
    pub async fn handle_notification(&mut self, notification: ChangeNotification) -> bool {
        if notification.key != self.store.key() {
            trace!("Ignoring change to '{}'", notification.key);
            return false;
        }
        if self.state == ViewState::Uninitialized {
            trace!("View not loaded yet, ignoring change notification");
            return false;
        }

        self.state = ViewState::Notified;
        self.reload(notification.origin).await;
        true
    }

    /// Handle every notification already queued, without waiting
    ///
    /// Returns how many reloads happened. A lagged subscription reloads once.
    pub async fn poll_notifications(&mut self) -> usize {
        let mut reloads = 0;
        let mut lagged = false;

        loop {
            match self.notifications.try_recv() {
                Ok(notification) => {
                    if self.handle_notification(notification).await {
                        reloads += 1;
                    }
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!(
                        "{} view lagged, skipped {} notification(s)",
                        self.renderer.name(),
                        skipped
                    );
                    lagged = true;
                }
                Err(broadcast::error::TryRecvError::Empty)
                | Err(broadcast::error::TryRecvError::Closed) => break,
            }
        }

        if lagged && self.state != ViewState::Uninitialized {
            self.reload(Origin::Local).await;
            reloads += 1;
        }
        reloads
    }

    /// Wait for the next notification and handle it
    ///
    /// Returns whether the view reloaded, or `None` once the notifier is
    /// gone.
    pub async fn recv_notification(&mut self) -> Option<bool> {
        match self.notifications.recv().await {
            Ok(notification) => Some(self.handle_notification(notification).await),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(
                    "{} view lagged, skipped {} notification(s)",
                    self.renderer.name(),
                    skipped
                );
                if self.state == ViewState::Uninitialized {
                    return Some(false);
                }
                self.reload(Origin::Local).await;
                Some(true)
            }
            Err(broadcast::error::RecvError::Closed) => None,
        }
    }

    /// Listen for changes until Ctrl-C
    pub async fn run(&mut self) -> Result<()> {
        self.run_with_shutdown(None).await
    }

    /// Listen for changes until the shutdown channel fires
    ///
    /// With `None`, runs until Ctrl-C. Loads first if needed.
    pub async fn run_with_shutdown(
        &mut self,
        shutdown_rx: Option<oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.ensure_loaded().await;

        let shutdown = shutdown_signal(shutdown_rx);
        tokio::pin!(shutdown);

        let reason = loop {
            tokio::select! {
                handled = self.recv_notification() => {
                    if handled.is_none() {
                        break "Notifier closed";
                    }
                }

                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break "Shutdown signal";
                }
            }
        };

        self.emit_event(ViewEvent::Stopped {
            reason: reason.to_string(),
        });
        Ok(())
    }

    async fn ensure_loaded(&mut self) {
        if self.state == ViewState::Uninitialized {
            self.load().await;
        }
    }

    async fn persist(&mut self, document: Document) -> Result<()> {
        self.store.save(&document).await?;
        self.document = document;
        self.state = ViewState::Persisted;
        self.emit_event(ViewEvent::Persisted);

        self.render();
        Ok(())
    }

    async fn reload(&mut self, origin: Origin) {
        self.document = self.store.load().await;
        self.state = ViewState::Reloaded;
        self.emit_event(ViewEvent::Reloaded { origin });
        debug!("{} view reloaded ({:?} change)", self.renderer.name(), origin);

        self.render();
    }

    fn render(&mut self) {
        self.output = self.renderer.render(&self.document, &self.env);
        self.state = ViewState::Rendered;
        self.emit_event(ViewEvent::Rendered {
            renderer: self.renderer.name(),
            bytes: self.output.len(),
            at: Utc::now(),
        });
    }

    fn emit_event(&self, event: ViewEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(
                    "View event channel full, dropping event. \
                    Consider increasing event_channel_capacity."
                );
            }
            // nobody is listening
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ThemeMode;
    use crate::edit::Field;
    use crate::render::PublicRenderer;
    use crate::storage::MemoryStorage;
    use std::sync::Arc;

    fn store() -> ConfigStore {
        ConfigStore::new(Arc::new(MemoryStorage::new()))
    }

    #[tokio::test]
    async fn load_renders_and_emits_events() {
        let (mut view, mut events) = View::new(store(), PublicRenderer, RenderEnv::default());
        assert_eq!(view.state(), ViewState::Uninitialized);
        assert!(view.output().is_empty());

        view.load().await;
        assert_eq!(view.state(), ViewState::Rendered);
        assert!(view.output().contains("AC Technology"));

        assert_eq!(events.recv().await.unwrap(), ViewEvent::Loaded);
        assert!(matches!(
            events.recv().await.unwrap(),
            ViewEvent::Rendered { renderer: "public", .. }
        ));
    }

    #[tokio::test]
    async fn apply_persists_before_rendering() {
        let store = store();
        let (mut view, mut events) = View::new(store.clone(), PublicRenderer, RenderEnv::default());
        view.load().await;
        while events.try_recv().is_ok() {}

        assert!(view.apply(&Edit::set(Field::SiteBrand, "Acme")).await.unwrap());
        assert_eq!(store.load().await.site.brand, "Acme");
        assert!(view.output().contains(r#"<span id="brand-foot">Acme</span>"#));

        assert_eq!(events.recv().await.unwrap(), ViewEvent::Persisted);
        assert!(matches!(events.recv().await.unwrap(), ViewEvent::Rendered { .. }));
    }

    #[tokio::test]
    async fn no_op_edit_is_not_persisted() {
        let store = store();
        let (mut view, _events) = View::new(store.clone(), PublicRenderer, RenderEnv::default());
        view.load().await;

        assert!(!view.apply(&Edit::RemoveProject(42)).await.unwrap());
        assert!(store.raw().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejected_import_changes_nothing() {
        let store = store();
        let (mut view, mut events) = View::new(store.clone(), PublicRenderer, RenderEnv::default());
        view.load().await;
        let before = view.output().to_string();
        while events.try_recv().is_ok() {}

        assert!(view.import("[1, 2").await.is_err());
        assert_eq!(view.output(), before);
        assert!(store.raw().await.unwrap().is_none());
        assert!(matches!(
            events.recv().await.unwrap(),
            ViewEvent::ImportRejected { .. }
        ));
    }

    #[tokio::test]
    async fn prefers_dark_only_matters_for_system_mode() {
        let (mut view, _events) = View::new(store(), PublicRenderer, RenderEnv::default());
        view.load().await;

        assert!(view.set_prefers_dark(true));
        assert!(view.output().contains(r#"class="dark""#));
        assert!(!view.set_prefers_dark(true));

        view.apply(&Edit::SetThemeMode(ThemeMode::Light)).await.unwrap();
        assert!(!view.set_prefers_dark(false));
    }

    #[tokio::test]
    async fn notifications_before_load_are_ignored() {
        let store = store();
        let (mut view, _events) = View::new(store.clone(), PublicRenderer, RenderEnv::default());

        store.save(&Document::defaults()).await.unwrap();
        assert_eq!(view.poll_notifications().await, 0);
        assert_eq!(view.state(), ViewState::Uninitialized);
    }

    #[tokio::test]
    async fn lagged_subscription_reloads_once() {
        let store = ConfigStore::from_config(
            Arc::new(MemoryStorage::new()),
            &CmsConfig {
                sync: crate::config::SyncConfig {
                    notification_capacity: 2,
                    ..Default::default()
                },
                ..Default::default()
            },
        )
        .unwrap();
        let (mut view, _events) = View::new(store.clone(), PublicRenderer, RenderEnv::default());
        view.load().await;

        let mut doc = Document::defaults();
        for brand in ["a", "b", "c", "d", "e"] {
            doc.site.brand = brand.to_string();
            store.save(&doc).await.unwrap();
        }

        // two buffered notifications plus one reload for the lag
        assert_eq!(view.poll_notifications().await, 3);
        assert_eq!(view.document().site.brand, "e");
    }
}
