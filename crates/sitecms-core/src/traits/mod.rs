//! Core traits for the site CMS
//!
//! - [`StorageBackend`]: Key/value persistence for the document

pub mod storage_backend;

pub use storage_backend::{StorageBackend, StorageBackendFactory};
