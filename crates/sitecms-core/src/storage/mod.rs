// # Storage Backend Implementations
//
// This module provides implementations of the StorageBackend trait for
// different persistence strategies.

pub mod file;
pub mod memory;

pub use file::{FileStorage, FileStorageFactory};
pub use memory::{MemoryStorage, MemoryStorageFactory};
