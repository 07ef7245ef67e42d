//! # holdall-store
//!
//! Storage abstraction layer for Holdall.
//!
//! This crate defines the traits and types every storage backend implements,
//! plus the typed [`Store`] handle applications call. It contains no backend
//! implementation - those live in separate crates.
//!
//! ## Overview
//!
//! The backend contract is [`DataStore`], which moves type-erased
//! [`Record`](holdall_core::Record)s and covers:
//! - writes (single and batch upsert)
//! - single-record fetches (by key, by field equality, by query, arbitrary)
//! - listings, deletes, and key-only counts
//!
//! [`Store`] wraps a `DataStore` and adds the entity-typed surface: encoding
//! through the record envelope, `NotFound` for single-entity misses, silent
//! idempotent deletes, and the shared last-error slot.
//!
//! ## Example
//!
//! ```ignore
//! use holdall_store::{Filter, Query, Sort, Store, StoreError};
//!
//! async fn first_small_widget(store: &Store) -> Result<Widget, StoreError> {
//!     let query = Query::new()
//!         .with_filter(Filter::range("size", None, Some(10.0)))
//!         .with_sort(Sort::asc("size"));
//!
//!     store.get_by_query(&query).await
//! }
//! ```
//!
//! ## Storage Backends
//!
//! To implement a storage backend, implement the [`DataStore`] trait:
//!
//! ```ignore
//! use async_trait::async_trait;
//! use holdall_core::Record;
//! use holdall_store::{DataStore, StoreError};
//!
//! struct MyBackend {
//!     // ...
//! }
//!
//! #[async_trait]
//! impl DataStore for MyBackend {
//!     async fn put(&self, record: Record) -> Result<(), StoreError> {
//!         // Implementation
//!     }
//!     // ... other methods
//! }
//! ```

mod error;
mod query;
mod slot;
mod store;
mod traits;

// Re-export everything from submodules
pub use error::{ErrorCategory, StoreError};
pub use query::{Filter, Query, Sort};
pub use slot::{ErrorSlot, LastError};
pub use store::Store;
pub use traits::DataStore;

/// Type alias for a store result.
pub type StoreResult<T> = Result<T, StoreError>;

/// Type alias for a shared backend trait object.
pub type DynDataStore = std::sync::Arc<dyn DataStore>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use holdall_store::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ErrorCategory, StoreError};
    pub use crate::query::{Filter, Query, Sort};
    pub use crate::slot::{ErrorSlot, LastError};
    pub use crate::store::Store;
    pub use crate::traits::DataStore;
    pub use crate::{DynDataStore, StoreResult};
    pub use holdall_core::{Entity, Key, Record};
}
