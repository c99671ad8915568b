// # File Storage
//
// File-based implementation of StorageBackend.
//
// ## Layout
//
// Each key is a file in the storage directory, holding the value verbatim:
//
// ```text
// <dir>/
//   ac_suite_cms_v1.json
// ```
//
// ## Atomic Writes
//
// New values are written to a temp file unique to the writer
// (`<key>.json.<pid>.<n>.tmp`), flushed, then renamed over the real file.
// Readers never see a half-written document and concurrent writers never
// share a temp file, so the last rename wins whole. There is no backup: a
// value that fails to parse is the document layer's problem, and it falls
// back to defaults.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::config::{StorageConfig, validate_storage_key};
use crate::traits::{StorageBackend, StorageBackendFactory};
use crate::Error;

const VALUE_EXTENSION: &str = "json";
const TEMP_SUFFIX: &str = "tmp";

/// Distinguishes temp files of concurrent writers within one process
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// File-based storage backend
///
/// # Example
///
/// ```rust,no_run
/// use sitecms_core::storage::FileStorage;
/// use sitecms_core::traits::StorageBackend;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let storage = FileStorage::new("/var/lib/sitecms");
///
///     storage.set_item("ac_suite_cms_v1", "{}").await?;
///     assert_eq!(storage.get_item("ac_suite_cms_v1").await?, Some("{}".to_string()));
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir`
    ///
    /// The directory is created on first write.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Storage directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> Result<PathBuf, Error> {
        validate_storage_key(key).map_err(|e| Error::invalid_input(e.to_string()))?;
        Ok(self.dir.join(format!("{}.{}", key, VALUE_EXTENSION)))
    }

    fn temp_path(path: &Path) -> PathBuf {
        let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut name = path.as_os_str().to_owned();
        name.push(format!(".{}.{}.{}", std::process::id(), n, TEMP_SUFFIX));
        PathBuf::from(name)
    }

    async fn write_temp(temp_path: &Path, value: &str) -> Result<(), Error> {
        let mut file = fs::File::create(temp_path).await.map_err(|e| {
            Error::storage(format!(
                "Failed to create temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.write_all(value.as_bytes()).await.map_err(|e| {
            Error::storage(format!(
                "Failed to write to temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.flush().await.map_err(|e| {
            Error::storage(format!(
                "Failed to flush temp file {}: {}",
                temp_path.display(),
                e
            ))
        })
    }

    async fn ensure_dir(&self) -> Result<(), Error> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            Error::storage(format!(
                "Failed to create storage directory {}: {}",
                self.dir.display(),
                e
            ))
        })
    }
}

#[async_trait]
impl StorageBackend for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, Error> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::trace!("No value stored at {}", path.display());
                Ok(None)
            }
            Err(e) => Err(Error::storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), Error> {
        let path = self.path_for(key)?;
        self.ensure_dir().await?;

        let temp_path = Self::temp_path(&path);
        let written = match Self::write_temp(&temp_path, value).await {
            Ok(()) => fs::rename(&temp_path, &path).await.map_err(|e| {
                Error::storage(format!(
                    "Failed to rename {} to {}: {}",
                    temp_path.display(),
                    path.display(),
                    e
                ))
            }),
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        tracing::trace!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), Error> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::storage(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn keys(&self) -> Result<Vec<String>, Error> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::storage(format!(
                    "Failed to list {}: {}",
                    self.dir.display(),
                    e
                )));
            }
        };

        let mut keys = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(VALUE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}

/// Factory registered under `"file"`
pub struct FileStorageFactory;

impl StorageBackendFactory for FileStorageFactory {
    fn create(&self, config: &serde_json::Value) -> Result<Arc<dyn StorageBackend>, Error> {
        match serde_json::from_value::<StorageConfig>(config.clone())? {
            StorageConfig::File { dir } => Ok(Arc::new(FileStorage::new(dir))),
            other => Err(Error::config(format!(
                "File storage factory cannot build a '{}' backend",
                other.type_name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_file_storage_basic() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested").join("cms"));

        // Initially empty, directory not created yet
        assert_eq!(storage.get_item("doc").await.unwrap(), None);
        assert!(storage.keys().await.unwrap().is_empty());

        storage.set_item("doc", r#"{"a":1}"#).await.unwrap();
        assert_eq!(
            storage.get_item("doc").await.unwrap(),
            Some(r#"{"a":1}"#.to_string())
        );
        assert!(storage.path_for("doc").unwrap().exists());

        // A second instance over the same directory sees the value
        let other = FileStorage::new(storage.dir());
        assert_eq!(
            other.get_item("doc").await.unwrap(),
            Some(r#"{"a":1}"#.to_string())
        );

        storage.remove_item("doc").await.unwrap();
        assert_eq!(other.get_item("doc").await.unwrap(), None);

        // Removing again is fine
        storage.remove_item("doc").await.unwrap();
    }

    #[tokio::test]
    async fn test_file_storage_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        for i in 0..10 {
            storage.set_item("doc", &i.to_string()).await.unwrap();
        }

        assert_eq!(storage.get_item("doc").await.unwrap(), Some("9".to_string()));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        assert_eq!(storage.keys().await.unwrap(), vec!["doc".to_string()]);
    }

    #[test]
    fn test_temp_paths_are_unique_per_write() {
        let path = Path::new("/srv/cms/doc.json");
        let first = FileStorage::temp_path(path);
        let second = FileStorage::temp_path(path);

        assert_ne!(first, second);
        assert_eq!(first.parent(), path.parent());
        assert_eq!(first.extension().and_then(|ext| ext.to_str()), Some("tmp"));
    }

    #[tokio::test]
    async fn test_file_storage_rejects_path_keys() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        let err = storage.set_item("../escape", "x").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_factory_builds_from_config() {
        let config = serde_json::json!({"type": "file", "dir": "/tmp/sitecms-test"});
        let backend = FileStorageFactory.create(&config).unwrap();
        assert_eq!(backend.backend_name(), "file");

        let wrong = serde_json::json!({"type": "memory"});
        assert!(FileStorageFactory.create(&wrong).is_err());
    }
}
