//! Plugin-based storage backend registry
//!
//! The registry maps backend type names to factories, so callers build a
//! backend from [`StorageConfig`] without hardcoded if-else chains.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sitecms_core::registry::BackendRegistry;
//! use sitecms_core::config::StorageConfig;
//!
//! # fn try_main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = BackendRegistry::with_builtin();
//! let backend = registry.create_backend(&StorageConfig::File {
//!     dir: "/var/lib/sitecms".to_string(),
//! })?;
//! # Ok(())
//! # }
//! ```

use crate::config::StorageConfig;
use crate::error::{Error, Result};
use crate::storage::{FileStorageFactory, MemoryStorageFactory};
use crate::traits::{StorageBackend, StorageBackendFactory};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Registry of storage backend factories
///
/// ## Thread Safety
///
/// The registry uses interior mutability with RwLock, allowing concurrent
/// reads and exclusive writes.
#[derive(Default)]
pub struct BackendRegistry {
    backends: RwLock<HashMap<String, Arc<dyn StorageBackendFactory>>>,
}

impl BackendRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the `file` and `memory` backends registered
    pub fn with_builtin() -> Self {
        let registry = Self::new();
        registry.register_backend("file", Box::new(FileStorageFactory));
        registry.register_backend("memory", Box::new(MemoryStorageFactory));
        registry
    }

    /// Register a backend factory under `name`, replacing any previous one
    pub fn register_backend(
        &self,
        name: impl Into<String>,
        factory: Box<dyn StorageBackendFactory>,
    ) {
        let name = name.into();
        let mut backends = match self.backends.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        tracing::debug!("Registering storage backend '{}'", name);
        backends.insert(name, Arc::from(factory));
    }

    /// Create a storage backend from configuration
    ///
    /// # Returns
    ///
    /// - `Ok(Arc<dyn StorageBackend>)`: Created backend
    /// - `Err(Error)`: If the type is not registered or creation fails
    pub fn create_backend(&self, config: &StorageConfig) -> Result<Arc<dyn StorageBackend>> {
        config.validate()?;
        let backend_type = config.type_name();

        let factory = self
            .read()?
            .get(backend_type)
            .cloned()
            .ok_or_else(|| Error::config(format!("Unknown storage type: {}", backend_type)))?;

        let config_json = serde_json::to_value(config)?;
        factory.create(&config_json)
    }

    /// List all registered backend types
    pub fn list_backends(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .read()
            .map(|backends| backends.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Check if a backend type is registered
    pub fn has_backend(&self, name: &str) -> bool {
        self.read()
            .map(|backends| backends.contains_key(name))
            .unwrap_or(false)
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, HashMap<String, Arc<dyn StorageBackendFactory>>>>
    {
        self.backends
            .read()
            .map_err(|_| Error::Other("Backend registry lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RefusingFactory;

    impl StorageBackendFactory for RefusingFactory {
        fn create(&self, _config: &serde_json::Value) -> Result<Arc<dyn StorageBackend>> {
            Err(Error::storage("refused"))
        }
    }

    #[test]
    fn test_registry_registration() {
        let registry = BackendRegistry::new();

        // Initially empty
        assert!(!registry.has_backend("memory"));

        registry.register_backend("memory", Box::new(RefusingFactory));
        assert!(registry.has_backend("memory"));
        assert!(registry.create_backend(&StorageConfig::Memory).is_err());
    }

    #[test]
    fn test_builtin_backends() {
        let registry = BackendRegistry::with_builtin();
        assert_eq!(registry.list_backends(), vec!["file".to_string(), "memory".to_string()]);

        let backend = registry.create_backend(&StorageConfig::Memory).unwrap();
        assert_eq!(backend.backend_name(), "memory");
    }

    #[test]
    fn test_unknown_backend_is_config_error() {
        let registry = BackendRegistry::new();
        let err = registry
            .create_backend(&StorageConfig::Memory)
            .err()
            .unwrap();
        assert!(matches!(err, Error::Config(_)));
    }
}
