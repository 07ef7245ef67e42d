use std::sync::Arc;

use holdall_core::{Key, Record};
use holdall_store::Query;
use papaya::HashMap as PapayaHashMap;

use crate::factory::StoreOptions;

/// Composite map key addressing one record within its extent.
///
/// Kind and key stay separate typed fields: flattening both into one string
/// would let `Key::Int(1)` and `Key::Str("1")` collide, since they share a
/// display form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey {
    pub kind: String,
    pub key: Key,
}

pub(crate) fn make_storage_key(kind: &str, key: &Key) -> StorageKey {
    StorageKey {
        kind: kind.to_string(),
        key: key.clone(),
    }
}

/// In-memory storage backend using papaya lock-free HashMap.
///
/// This backend provides:
/// - Lock-free concurrent access via papaya::HashMap
/// - Upserting writes and idempotent deletes over per-kind extents
/// - Query evaluation with sorting and offset/limit windows
/// - Key-only counting that never clones record bodies
#[derive(Debug)]
pub struct MemoryStore {
    /// Main storage using papaya for lock-free concurrent access
    pub(crate) data: Arc<PapayaHashMap<StorageKey, Record>>,
    /// Storage configuration options (soft hints for the in-memory backend)
    _options: StoreOptions,
}

impl MemoryStore {
    /// Creates a new in-memory backend with default options.
    pub fn new() -> Self {
        Self {
            data: Arc::new(PapayaHashMap::new()),
            _options: StoreOptions::default(),
        }
    }

    /// Creates a new in-memory backend with the given options.
    pub fn with_options(options: StoreOptions) -> Self {
        Self {
            data: Arc::new(PapayaHashMap::new()),
            _options: options,
        }
    }

    /// Total number of records across all extents.
    pub fn len(&self) -> usize {
        let guard = self.data.pin();
        guard.len()
    }

    /// Returns true when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Upserts one record, replacing any record stored under the same kind
    /// and key.
    pub fn insert_record(&self, record: Record) {
        let key = make_storage_key(&record.kind, &record.key);
        let guard = self.data.pin();
        guard.insert(key, record);
    }

    /// Removes the record under `kind` and `key`, returning whether one was
    /// present.
    pub fn remove_record(&self, kind: &str, key: &Key) -> bool {
        let storage_key = make_storage_key(kind, key);
        let guard = self.data.pin();
        guard.remove(&storage_key).is_some()
    }

    /// Clones every record of `kind` out of the map, in map order.
    pub fn extent(&self, kind: &str) -> Vec<Record> {
        let guard = self.data.pin();
        guard
            .iter()
            .filter(|(k, _)| k.kind == kind)
            .map(|(_, record)| record.clone())
            .collect()
    }

    /// Evaluates `query` against the extent of `kind`: clones the matching
    /// records, orders them by the query's sort keys, and applies the
    /// offset/limit window.
    pub fn select(&self, kind: &str, query: &Query) -> Vec<Record> {
        let guard = self.data.pin();
        let mut matching: Vec<Record> = guard
            .iter()
            .filter(|(k, record)| k.kind == kind && query.matches(record))
            .map(|(_, record)| record.clone())
            .collect();

        query.sort_records(&mut matching);

        let mut windowed: Vec<Record> = matching.into_iter().skip(query.offset).collect();
        if let Some(limit) = query.limit {
            windowed.truncate(limit);
        }
        windowed
    }

    /// Counts the records of `kind` looking at keys alone.
    pub fn count_by_kind(&self, kind: &str) -> usize {
        let guard = self.data.pin();
        guard.iter().filter(|(k, _)| k.kind == kind).count()
    }

    /// Counts the records of `kind` matching `query`'s filters, evaluating
    /// in place without cloning a single body. The query's window is not
    /// applied.
    pub fn count_matches(&self, kind: &str, query: &Query) -> usize {
        let guard = self.data.pin();
        guard
            .iter()
            .filter(|(k, record)| k.kind == kind && query.matches(record))
            .count()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
