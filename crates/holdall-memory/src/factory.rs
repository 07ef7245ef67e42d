use std::sync::Arc;

use serde::{Deserialize, Serialize};

use holdall_store::{DynDataStore, Store};

use crate::storage::MemoryStore;

/// Supported storage backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// In-memory backend implemented on top of papaya::HashMap
    MemoryPapaya,
}

/// Backend-specific configuration options.
///
/// These are best-effort for the in-memory backend. Some options may be
/// no-ops until a backend that supports them is implemented.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    /// Optional preallocation hint (e.g., initial capacity). Not used by papaya.
    pub preallocate_records: Option<usize>,
}

/// Factory configuration to construct a backend instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: BackendKind,
    pub options: StoreOptions,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::MemoryPapaya,
            options: StoreOptions::default(),
        }
    }
}

/// Create a backend instance based on the provided configuration.
///
/// For now, only the in-memory papaya backend is supported.
pub fn create_data_store(config: &StoreConfig) -> DynDataStore {
    match config.backend {
        BackendKind::MemoryPapaya => {
            let store = MemoryStore::with_options(config.options.clone());
            // Note: options are currently hints and have no effect for papaya backend
            Arc::new(store)
        }
    }
}

/// Create a typed store over a backend built from the configuration.
pub fn open_store(config: &StoreConfig) -> Store {
    Store::new(create_data_store(config))
}
