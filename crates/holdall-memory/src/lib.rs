//! In-memory storage backend for Holdall.
//!
//! This crate provides an in-memory implementation of the `DataStore` trait
//! from `holdall-store`, using papaya lock-free HashMap for concurrent access.
//!
//! # Example
//!
//! ```ignore
//! use holdall_memory::memory_store;
//!
//! let store = memory_store();
//!
//! // Persist a widget and read it back by key
//! store.put(&widget).await?;
//! let widget: Widget = store.get_by_key(1).await?;
//! ```

pub mod factory;
pub mod storage;
mod store_impl;

// Re-export the backend contract for convenience
pub use holdall_store::{DataStore, DynDataStore, Store, StoreError};

pub use factory::{BackendKind, StoreConfig, StoreOptions, create_data_store, open_store};
pub use storage::{MemoryStore, StorageKey};

/// Creates a typed store backed by a fresh in-memory backend.
pub fn memory_store() -> Store {
    Store::new(std::sync::Arc::new(MemoryStore::new()))
}
