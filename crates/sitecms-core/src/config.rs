//! Configuration types for the site CMS
//!
//! This module defines the runtime configuration: where the document is
//! persisted, under which key, and how views observe the environment.

use serde::{Deserialize, Serialize};

use crate::store::STORAGE_KEY;

/// Main CMS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsConfig {
    /// Storage backend configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Key the document is persisted under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Ambient display settings handed to renderers
    #[serde(default)]
    pub display: DisplayConfig,

    /// Cross-view synchronization settings
    #[serde(default)]
    pub sync: SyncConfig,
}

impl CmsConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            storage: StorageConfig::default(),
            storage_key: default_storage_key(),
            display: DisplayConfig::default(),
            sync: SyncConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        validate_storage_key(&self.storage_key)?;
        self.storage.validate()?;
        self.sync.validate()?;
        Ok(())
    }
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Storage keys double as file names for [`FileStorage`](crate::FileStorage),
/// so they are restricted to a portable character set.
pub fn validate_storage_key(key: &str) -> Result<(), crate::Error> {
    if key.is_empty() {
        return Err(crate::Error::config("Storage key cannot be empty"));
    }
    if key.len() > 128 {
        return Err(crate::Error::config(format!(
            "Storage key too long: {} chars (max 128)",
            key.len()
        )));
    }
    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        || key.starts_with('.')
    {
        return Err(crate::Error::config(format!(
            "Storage key '{}' contains invalid characters. \
            Valid: ASCII alphanumeric, '_', '-', '.' (not leading)",
            key
        )));
    }
    Ok(())
}

/// Storage backend configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageConfig {
    /// One JSON file per key inside a directory
    File {
        /// Directory holding the key files
        dir: String,
    },

    /// In-memory storage (not persistent)
    #[default]
    Memory,
}

impl StorageConfig {
    /// Validate the storage configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StorageConfig::File { dir } if dir.is_empty() => Err(crate::Error::config(
                "File storage directory cannot be empty",
            )),
            _ => Ok(()),
        }
    }

    /// Get the backend type name used for registry lookup
    pub fn type_name(&self) -> &'static str {
        match self {
            StorageConfig::File { .. } => "file",
            StorageConfig::Memory => "memory",
        }
    }
}

/// Ambient display settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Whether the platform prefers a dark color scheme.
    ///
    /// Only consulted when the document's theme mode is `system`.
    #[serde(default)]
    pub prefers_dark: bool,
}

/// Cross-view synchronization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// How often the external change watcher re-reads storage (milliseconds)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Capacity of the change-notification broadcast channel
    ///
    /// Slow subscribers that fall further behind than this reload once
    /// instead of replaying every missed notification.
    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,

    /// Capacity of each view's event channel
    ///
    /// When full, new view events are dropped (with a warning log).
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl SyncConfig {
    /// Validate the sync configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.poll_interval_ms == 0 {
            return Err(crate::Error::config("Poll interval must be > 0"));
        }
        if self.notification_capacity == 0 {
            return Err(crate::Error::config("Notification capacity must be > 0"));
        }
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            notification_capacity: default_notification_capacity(),
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_storage_key() -> String {
    STORAGE_KEY.to_string()
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_notification_capacity() -> usize {
    64
}

fn default_event_channel_capacity() -> usize {
    256
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = CmsConfig::default();
        assert_eq!(config.storage_key, "ac_suite_cms_v1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_path_like_keys() {
        assert!(validate_storage_key("../etc/passwd").is_err());
        assert!(validate_storage_key("a/b").is_err());
        assert!(validate_storage_key(".hidden").is_err());
        assert!(validate_storage_key("").is_err());
        assert!(validate_storage_key("site-v2.draft").is_ok());
    }

    #[test]
    fn partial_json_config_fills_defaults() {
        let config: CmsConfig =
            serde_json::from_str(r#"{"storage":{"type":"file","dir":"/tmp/cms"}}"#).unwrap();
        assert_eq!(
            config.storage,
            StorageConfig::File {
                dir: "/tmp/cms".to_string()
            }
        );
        assert_eq!(config.storage_key, STORAGE_KEY);
        assert_eq!(config.sync.poll_interval_ms, 500);
        assert!(!config.display.prefers_dark);
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let mut config = CmsConfig::default();
        config.sync.poll_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_file_dir_is_rejected() {
        let config = StorageConfig::File { dir: String::new() };
        assert!(config.validate().is_err());
        assert_eq!(config.type_name(), "file");
    }
}
