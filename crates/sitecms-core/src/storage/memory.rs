// # Memory Storage
//
// In-memory implementation of StorageBackend.
//
// ## Purpose
//
// A fast, non-persistent store. Clones share the same map, which makes it
// the natural backend for several views living in one process (the
// equivalent of tabs sharing one origin).
//
// ## Crash Behavior
//
// - All values are lost on exit
// - The next load starts from the built-in defaults

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::StorageConfig;
use crate::traits::{StorageBackend, StorageBackendFactory};
use crate::Error;

/// In-memory storage backend
///
/// # Example
///
/// ```rust,no_run
/// use sitecms_core::storage::MemoryStorage;
/// use sitecms_core::traits::StorageBackend;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let storage = MemoryStorage::new();
///     storage.set_item("ac_suite_cms_v1", "{}").await?;
///     assert_eq!(storage.len().await, 1);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored keys
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the storage is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Remove every key
    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.keys().cloned().collect())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Factory registered under `"memory"`
///
/// Every call creates an independent, empty storage.
pub struct MemoryStorageFactory;

impl StorageBackendFactory for MemoryStorageFactory {
    fn create(&self, config: &serde_json::Value) -> Result<Arc<dyn StorageBackend>, Error> {
        match serde_json::from_value::<StorageConfig>(config.clone())? {
            StorageConfig::Memory => Ok(Arc::new(MemoryStorage::new())),
            other => Err(Error::config(format!(
                "Memory storage factory cannot build a '{}' backend",
                other.type_name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_basic() {
        let storage = MemoryStorage::new();

        assert!(storage.is_empty().await);

        storage.set_item("doc", "v1").await.unwrap();
        assert_eq!(storage.len().await, 1);
        assert_eq!(storage.get_item("doc").await.unwrap(), Some("v1".to_string()));

        storage.set_item("doc", "v2").await.unwrap();
        assert_eq!(storage.len().await, 1);
        assert_eq!(storage.get_item("doc").await.unwrap(), Some("v2".to_string()));

        storage.remove_item("doc").await.unwrap();
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_memory_storage_clones_share_state() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.set_item("a", "1").await.unwrap();
        other.set_item("b", "2").await.unwrap();

        assert_eq!(storage.keys().await.unwrap(), vec!["a".to_string(), "b".to_string()]);

        other.clear().await;
        assert!(storage.is_empty().await);
    }
}
