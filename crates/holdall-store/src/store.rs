//! The typed entry point applications use.
//!
//! [`Store`] wraps a backend adapter and layers the entity-facing semantics
//! on top: encoding through the record envelope, strategy-specific lookups,
//! raising `NotFound` for single-entity misses, and recording every failure
//! into the shared last-error slot before propagating it.

use std::fmt;
use std::sync::Arc;

use holdall_core::{Entity, Key, Record};
use serde_json::Value;
use tracing::{debug, warn};

use crate::DynDataStore;
use crate::error::StoreError;
use crate::query::Query;
use crate::slot::{ErrorSlot, LastError};

/// Typed handle to a storage backend.
///
/// All operations are generic over an [`Entity`] type; the entity's kind tag
/// selects the extent, so one handle serves every entity type of the
/// application. Cloning is cheap and clones share both the backend and the
/// last-error slot, giving shared-instance semantics.
///
/// Single-entity lookups fail with [`StoreError::NotFound`] when nothing
/// matches; deletes of absent entities succeed silently. Stored entities are
/// copies: nothing retains the caller's value after a call returns.
#[derive(Clone)]
pub struct Store {
    backend: DynDataStore,
    errors: Arc<ErrorSlot>,
}

impl Store {
    /// Creates a store over the given backend adapter.
    #[must_use]
    pub fn new(backend: DynDataStore) -> Self {
        Self {
            backend,
            errors: Arc::new(ErrorSlot::new()),
        }
    }

    /// Get a reference to the backend adapter.
    #[must_use]
    pub fn backend(&self) -> &DynDataStore {
        &self.backend
    }

    /// Returns the name of the underlying backend.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    /// The most recent failure recorded on this store, if any.
    ///
    /// Best-effort diagnostics only: the slot is shared by clones and by
    /// concurrent callers, so per-call attribution must come from each
    /// call's own `Result`. Never reset by successful operations.
    #[must_use]
    pub fn last_error(&self) -> Option<LastError> {
        self.errors.last()
    }

    // ==================== Writes ====================

    /// Persists a copy of `entity`, replacing any stored entity of the same
    /// kind and key. The write is durable in the backend when this returns.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Serialization` if the entity cannot be encoded,
    /// or the backend's write failure.
    pub async fn put<E: Entity>(&self, entity: &E) -> Result<(), StoreError> {
        let record = self.encode(entity)?;
        let key = record.key.clone();
        self.note(self.backend.put(record).await)?;
        debug!(kind = E::KIND, key = %key, backend = self.backend.backend_name(), "Stored entity");
        Ok(())
    }

    /// Persists copies of every entity in the batch in one backend
    /// round-trip.
    ///
    /// Equivalent to repeated [`put`](Self::put) calls with no ordering or
    /// atomicity guarantee. Every entity is attempted: ones that fail to
    /// encode are skipped and the rest are still persisted.
    ///
    /// # Errors
    ///
    /// Returns the batch write failure if the backend rejects the batch;
    /// otherwise the first per-entity encode failure, after the remaining
    /// entities have been persisted.
    pub async fn put_all<'a, E, I>(&self, entities: I) -> Result<(), StoreError>
    where
        E: Entity,
        I: IntoIterator<Item = &'a E>,
    {
        let mut records = Vec::new();
        let mut first_error: Option<StoreError> = None;
        for entity in entities {
            match Record::from_entity(entity) {
                Ok(record) => records.push(record),
                Err(error) => {
                    let error = StoreError::from(error);
                    warn!(kind = E::KIND, error = %error, "Skipping entity in batch");
                    self.errors.record(&error);
                    first_error.get_or_insert(error);
                }
            }
        }

        let stored = records.len();
        self.note(self.backend.put_many(records).await)?;
        debug!(kind = E::KIND, count = stored, backend = self.backend.backend_name(), "Stored entity batch");

        match first_error {
            None => Ok(()),
            Some(error) => Err(error),
        }
    }

    // ==================== Single-entity lookups ====================

    /// Fetches the entity stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no entity of this kind is stored
    /// under `key`.
    pub async fn get_by_key<E: Entity>(&self, key: impl Into<Key>) -> Result<E, StoreError> {
        let key = key.into();
        match self.note(self.backend.fetch_by_key(E::KIND, &key).await)? {
            Some(record) => self.decode(record),
            None => self.fail(StoreError::not_found_key(E::KIND, &key)),
        }
    }

    /// Fetches the entity whose top-level `field` equals `value`.
    ///
    /// When several entities match, the lowest-keyed one is returned.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if nothing matches.
    pub async fn get_by_field<E: Entity>(
        &self,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<E, StoreError> {
        let value = value.into();
        match self.note(self.backend.fetch_by_field(E::KIND, field, &value).await)? {
            Some(record) => self.decode(record),
            None => self.fail(StoreError::not_found_field(E::KIND, field, &value)),
        }
    }

    /// Fetches the first entity matching `query`, in query order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if nothing falls inside the query's
    /// window.
    pub async fn get_by_query<E: Entity>(&self, query: &Query) -> Result<E, StoreError> {
        match self.note(self.backend.fetch_by_query(E::KIND, query).await)? {
            Some(record) => self.decode(record),
            None => self.fail(StoreError::not_found_query(E::KIND)),
        }
    }

    /// Fetches an arbitrary entity of the kind, failing only on an empty
    /// extent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no entity of this kind is stored.
    pub async fn get_any<E: Entity>(&self) -> Result<E, StoreError> {
        match self.note(self.backend.fetch_any(E::KIND).await)? {
            Some(record) => self.decode(record),
            None => self.fail(StoreError::not_found_any(E::KIND)),
        }
    }

    /// Returns whether an entity of this kind is stored under `key`.
    pub async fn exists<E: Entity>(&self, key: impl Into<Key>) -> Result<bool, StoreError> {
        let key = key.into();
        self.note(self.backend.exists(E::KIND, &key).await)
    }

    // ==================== Listings ====================

    /// Lists every stored entity of the kind, in the backend's default
    /// order. An empty extent yields an empty vec.
    pub async fn list<E: Entity>(&self) -> Result<Vec<E>, StoreError> {
        let records = self.note(self.backend.list(E::KIND).await)?;
        self.decode_all(records)
    }

    /// Lists every entity whose top-level `field` equals `value`.
    pub async fn list_by_field<E: Entity>(
        &self,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<Vec<E>, StoreError> {
        let value = value.into();
        let records = self.note(self.backend.list_by_field(E::KIND, field, &value).await)?;
        self.decode_all(records)
    }

    /// Lists the entities matching `query`, in query order, with the
    /// query's offset and limit applied.
    pub async fn list_by_query<E: Entity>(&self, query: &Query) -> Result<Vec<E>, StoreError> {
        let records = self.note(self.backend.list_by_query(E::KIND, query).await)?;
        self.decode_all(records)
    }

    // ==================== Deletes ====================

    /// Deletes the stored entity with `entity`'s key.
    ///
    /// Succeeds silently when nothing is stored under that key: delete is
    /// idempotent by contract and a miss is not a failure, so it is neither
    /// returned nor recorded in the last-error slot.
    pub async fn delete<E: Entity>(&self, entity: &E) -> Result<(), StoreError> {
        let key = entity.key();
        self.note(self.backend.delete_by_key(E::KIND, &key).await)?;
        debug!(kind = E::KIND, key = %key, backend = self.backend.backend_name(), "Deleted entity");
        Ok(())
    }

    /// Deletes the stored entities with the batch's keys in one backend
    /// round-trip, skipping absent keys silently.
    pub async fn delete_all<'a, E, I>(&self, entities: I) -> Result<(), StoreError>
    where
        E: Entity,
        I: IntoIterator<Item = &'a E>,
    {
        let keys: Vec<Key> = entities.into_iter().map(Entity::key).collect();
        let count = keys.len();
        self.note(self.backend.delete_many(E::KIND, &keys).await)?;
        debug!(kind = E::KIND, count, backend = self.backend.backend_name(), "Deleted entity batch");
        Ok(())
    }

    /// Deletes the entities matching `query`: exactly the ones
    /// [`list_by_query`](Self::list_by_query) would return.
    pub async fn delete_by_query<E: Entity>(&self, query: &Query) -> Result<(), StoreError> {
        self.note(self.backend.delete_by_query(E::KIND, query).await)?;
        debug!(kind = E::KIND, backend = self.backend.backend_name(), "Deleted by query");
        Ok(())
    }

    /// Deletes every stored entity of the kind.
    pub async fn delete_extent<E: Entity>(&self) -> Result<(), StoreError> {
        self.note(self.backend.delete_extent(E::KIND).await)?;
        debug!(kind = E::KIND, backend = self.backend.backend_name(), "Deleted extent");
        Ok(())
    }

    // ==================== Counts ====================

    /// Counts the stored entities of the kind through the backend's
    /// key-only path; no entity is materialized.
    pub async fn count<E: Entity>(&self) -> Result<u64, StoreError> {
        self.note(self.backend.count(E::KIND).await)
    }

    /// Counts the entities whose top-level `field` equals `value`.
    pub async fn count_by_field<E: Entity>(
        &self,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<u64, StoreError> {
        let value = value.into();
        self.note(self.backend.count_by_field(E::KIND, field, &value).await)
    }

    /// Counts the entities inside `query`'s window; always equal to the
    /// length of the corresponding [`list_by_query`](Self::list_by_query)
    /// result.
    pub async fn count_by_query<E: Entity>(&self, query: &Query) -> Result<u64, StoreError> {
        self.note(self.backend.count_by_query(E::KIND, query).await)
    }

    // ==================== Plumbing ====================

    fn encode<E: Entity>(&self, entity: &E) -> Result<Record, StoreError> {
        match Record::from_entity(entity) {
            Ok(record) => Ok(record),
            Err(error) => self.fail(error.into()),
        }
    }

    fn decode<E: Entity>(&self, record: Record) -> Result<E, StoreError> {
        match record.into_entity() {
            Ok(entity) => Ok(entity),
            Err(error) => self.fail(error.into()),
        }
    }

    fn decode_all<E: Entity>(&self, records: Vec<Record>) -> Result<Vec<E>, StoreError> {
        records
            .into_iter()
            .map(|record| self.decode(record))
            .collect()
    }

    /// Record a failed result into the slot before handing it back.
    fn note<T>(&self, result: Result<T, StoreError>) -> Result<T, StoreError> {
        if let Err(error) = &result {
            warn!(category = %error.category(), error = %error, "Store operation failed");
            self.errors.record(error);
        }
        result
    }

    fn fail<T>(&self, error: StoreError) -> Result<T, StoreError> {
        warn!(category = %error.category(), error = %error, "Store operation failed");
        self.errors.record(&error);
        Err(error)
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("backend", &self.backend.backend_name())
            .finish_non_exhaustive()
    }
}
