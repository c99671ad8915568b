// # sitecms-core
//
// Core library for the site CMS: one configuration document shared between
// an admin editor and the public site renderer.
//
// ## Architecture Overview
//
// - **StorageBackend**: Trait for the string key/value store that holds the persisted document
// - **ConfigStore**: Loads (deep-merged over defaults), saves, resets and announces changes
// - **Renderer**: Pure projection of a document to markup (admin form, public site)
// - **View**: One running renderer bound to a store; reloads on change notifications
// - **BackendRegistry**: Builds storage backends from configuration by type name
//
// ## Design Principles
//
// 1. **Single Document**: Exactly one live document per view, under a fixed storage key
// 2. **Full Re-render**: Every mutation is followed by persist, then a complete render
// 3. **Last Write Wins**: Views converge by reloading on notification, never by merging
// 4. **Library-First**: The CLI is a thin layer over this crate

pub mod config;
pub mod document;
pub mod edit;
pub mod error;
pub mod registry;
pub mod render;
pub mod storage;
pub mod store;
pub mod sync;
pub mod traits;
pub mod view;

// Re-export core types for convenience
pub use config::{CmsConfig, DisplayConfig, StorageConfig, SyncConfig};
pub use document::{Document, ThemeMode};
pub use edit::{CtaSlot, Edit, Field, LinkKind};
pub use error::{Error, Result};
pub use registry::BackendRegistry;
pub use render::{AdminRenderer, PublicRenderer, RenderEnv, Renderer};
pub use storage::{FileStorage, MemoryStorage};
pub use store::{ConfigStore, STORAGE_KEY};
pub use sync::{ChangeNotification, ChangeNotifier, ExternalChangeWatcher, Origin};
pub use traits::StorageBackend;
pub use view::{View, ViewEvent, ViewState};
