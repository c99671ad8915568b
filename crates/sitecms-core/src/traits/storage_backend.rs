// # Storage Backend Trait
//
// Defines the interface for the per-origin key/value store that holds the
// persisted document.
//
// ## Purpose
//
// The backend is deliberately dumb: string keys map to string values, the
// same contract a browser's local storage offers. Everything document-shaped
// (defaults, merging, notification) lives in `ConfigStore` on top of it.
//
// ## Implementations
//
// - File-based: one file per key inside a directory
// - In-memory: for tests and embedded use
//
// ## Usage
//
// ```rust,ignore
// use sitecms_core::StorageBackend;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let backend = /* StorageBackend implementation */;
//
//     backend.set_item("ac_suite_cms_v1", "{}").await?;
//     let raw = backend.get_item("ac_suite_cms_v1").await?;
//     backend.remove_item("ac_suite_cms_v1").await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for storage backend implementations
///
/// Implementations must be thread-safe and usable across async tasks.
/// Writes must be all-or-nothing from a reader's point of view: a concurrent
/// `get_item` sees either the old value or the new one, never a mix.
///
/// ## Implementation Guidelines
///
/// - **Async I/O only**: Use async file operations, never blocking I/O
/// - **No interpretation**: Values are opaque strings; never parse them
/// - **No notification**: Change announcements belong to `ConfigStore`
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Read the value stored under `key`
    ///
    /// # Returns
    ///
    /// - `Ok(Some(String))`: The stored value
    /// - `Ok(None)`: Nothing stored under this key
    /// - `Err(Error)`: Storage error
    async fn get_item(&self, key: &str) -> Result<Option<String>, crate::Error>;

    /// Store `value` under `key`, replacing any previous value
    async fn set_item(&self, key: &str, value: &str) -> Result<(), crate::Error>;

    /// Delete the value under `key`
    ///
    /// Deleting a missing key succeeds.
    async fn remove_item(&self, key: &str) -> Result<(), crate::Error>;

    /// List all keys currently stored
    async fn keys(&self) -> Result<Vec<String>, crate::Error>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// Helper trait for constructing storage backends from configuration
pub trait StorageBackendFactory: Send + Sync {
    /// Create a backend from its serialized [`StorageConfig`](crate::StorageConfig)
    fn create(
        &self,
        config: &serde_json::Value,
    ) -> Result<std::sync::Arc<dyn StorageBackend>, crate::Error>;
}
