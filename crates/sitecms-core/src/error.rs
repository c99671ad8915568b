//! Error types for the site CMS
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for CMS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the site CMS
#[derive(Error, Debug)]
pub enum Error {
    /// Persisted payload could not be read back as a document.
    ///
    /// Recovered inside [`ConfigStore::load`](crate::ConfigStore::load) by
    /// substituting defaults; never surfaced to the user.
    #[error("Persisted data unreadable: {0}")]
    PersistedDataUnreadable(String),

    /// A user-supplied import file is not a usable document
    #[error("Invalid import payload: {0}")]
    ImportPayloadInvalid(String),

    /// Storage backend errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a persisted-data error
    pub fn unreadable(msg: impl Into<String>) -> Self {
        Self::PersistedDataUnreadable(msg.into())
    }

    /// Create an import error
    pub fn import(msg: impl Into<String>) -> Self {
        Self::ImportPayloadInvalid(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error should be shown to the user as-is.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::ImportPayloadInvalid(_) | Self::InvalidInput(_))
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_errors_are_user_facing() {
        assert!(Error::import("expected value at line 1").is_user_facing());
        assert!(!Error::unreadable("truncated").is_user_facing());
        assert!(!Error::storage("disk full").is_user_facing());
    }
}
