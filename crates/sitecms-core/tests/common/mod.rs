//! Test doubles and common utilities for contract tests

#![allow(dead_code)]

use sitecms_core::error::{Error, Result};
use sitecms_core::traits::StorageBackend;
use sitecms_core::{
    AdminRenderer, ConfigStore, MemoryStorage, PublicRenderer, RenderEnv, View, ViewEvent,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::mpsc;

/// A memory backend that counts calls and can be told to fail writes
#[derive(Clone, Default)]
pub struct CountingStorage {
    inner: MemoryStorage,
    gets: Arc<AtomicUsize>,
    sets: Arc<AtomicUsize>,
    removes: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
}

impl CountingStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn remove_count(&self) -> usize {
        self.removes.load(Ordering::SeqCst)
    }

    /// Make every subsequent write fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl StorageBackend for CountingStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::storage("quota exceeded"));
        }
        self.inner.set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.inner.remove_item(key).await
    }

    async fn keys(&self) -> Result<Vec<String>> {
        self.inner.keys().await
    }

    fn backend_name(&self) -> &'static str {
        "counting"
    }
}

/// A store over a fresh in-memory backend
pub fn memory_store() -> ConfigStore {
    ConfigStore::new(Arc::new(MemoryStorage::new()))
}

/// A loaded admin view
pub async fn admin_view(store: &ConfigStore) -> (View<AdminRenderer>, mpsc::Receiver<ViewEvent>) {
    let (mut view, events) = View::new(store.clone(), AdminRenderer, RenderEnv::default());
    view.load().await;
    (view, events)
}

/// A loaded public view
pub async fn public_view(store: &ConfigStore) -> (View<PublicRenderer>, mpsc::Receiver<ViewEvent>) {
    let (mut view, events) = View::new(store.clone(), PublicRenderer, RenderEnv::default());
    view.load().await;
    (view, events)
}

/// Drain every event already queued
pub fn drain(events: &mut mpsc::Receiver<ViewEvent>) -> Vec<ViewEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

/// Text of the element with the given id, up to the next tag
pub fn element_text<'a>(html: &'a str, id: &str) -> Option<&'a str> {
    let marker = format!("id=\"{}\"", id);
    let start = html.find(&marker)?;
    let after_tag = start + html[start..].find('>')? + 1;
    let end = after_tag + html[after_tag..].find('<')?;
    Some(&html[after_tag..end])
}
