//! Backend traits for the data-access abstraction layer.
//!
//! This module defines the contract that all storage backends must implement.

use async_trait::async_trait;
use holdall_core::{Key, Record};
use serde_json::Value;

use crate::error::StoreError;
use crate::query::Query;

/// The backend contract all storage adapters must implement.
///
/// Operations are type-erased: entities travel as [`Record`] envelopes and
/// extents are addressed by their kind tag. The typed [`Store`](crate::Store)
/// facade layers entity encoding, not-found raising, and last-error
/// recording on top; adapters only move records. Implementations must be
/// thread-safe (`Send + Sync`) and callable concurrently.
///
/// Single-record fetches use the absent-result discipline: a miss is
/// `Ok(None)`, and errors are reserved for real failures.
///
/// # Example
///
/// ```ignore
/// use holdall_store::{DataStore, StoreError};
/// use holdall_core::{Key, Record};
///
/// async fn require_widget(
///     backend: &dyn DataStore,
///     key: &Key,
/// ) -> Result<Record, StoreError> {
///     backend
///         .fetch_by_key("widget", key)
///         .await?
///         .ok_or_else(|| StoreError::not_found_key("widget", key))
/// }
/// ```
#[async_trait]
pub trait DataStore: Send + Sync {
    // ==================== Writes ====================

    /// Upserts one record, synchronously: when this returns `Ok` the record
    /// is persisted. An existing record under the same kind and key is
    /// replaced.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Persistence` if the backend cannot complete the
    /// write and `StoreError::Unavailable` if it cannot be reached.
    async fn put(&self, record: Record) -> Result<(), StoreError>;

    /// Upserts a batch of records in one backend round-trip.
    ///
    /// Behaviorally equivalent to repeated [`put`](Self::put) calls, with no
    /// guaranteed ordering between the records and no atomicity: adapters
    /// attempt every record and report the first failure after the whole
    /// batch has been tried.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`put`](Self::put).
    async fn put_many(&self, records: Vec<Record>) -> Result<(), StoreError>;

    // ==================== Single-record fetches ====================

    /// Fetches the record stored under `kind` and `key`.
    ///
    /// Returns `None` if no such record exists.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures, never for a miss.
    async fn fetch_by_key(&self, kind: &str, key: &Key) -> Result<Option<Record>, StoreError>;

    /// Fetches one record of `kind` whose top-level `field` equals `value`.
    ///
    /// When several records match, the one with the lowest key is returned,
    /// so repeated calls against unchanged data agree.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::QueryEvaluation` if `field` is empty.
    async fn fetch_by_field(
        &self,
        kind: &str,
        field: &str,
        value: &Value,
    ) -> Result<Option<Record>, StoreError>;

    /// Fetches the first record of `kind` matching `query`, in query order.
    ///
    /// "First" follows the query's sort keys when present and the backend's
    /// default order (ascending key) otherwise; the query's offset applies
    /// before the first match is taken.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::QueryEvaluation` for malformed descriptors.
    async fn fetch_by_query(&self, kind: &str, query: &Query)
    -> Result<Option<Record>, StoreError>;

    /// Fetches an arbitrary record of `kind`, the bare-type probe.
    ///
    /// Returns `None` only when the extent is empty. Backends pick the
    /// lowest-keyed record so the choice is reproducible.
    async fn fetch_any(&self, kind: &str) -> Result<Option<Record>, StoreError>;

    // ==================== Listings ====================

    /// Lists every record of `kind` in the backend's default order.
    ///
    /// An empty extent yields an empty vec, not an error.
    async fn list(&self, kind: &str) -> Result<Vec<Record>, StoreError>;

    /// Lists every record of `kind` whose top-level `field` equals `value`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::QueryEvaluation` if `field` is empty.
    async fn list_by_field(
        &self,
        kind: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Record>, StoreError>;

    /// Lists the records of `kind` matching `query`, in query order, with
    /// the query's offset and limit applied.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::QueryEvaluation` for malformed descriptors.
    async fn list_by_query(&self, kind: &str, query: &Query) -> Result<Vec<Record>, StoreError>;

    // ==================== Deletes ====================

    /// Deletes the record stored under `kind` and `key`.
    ///
    /// Deleting an absent key is success, not an error: delete is
    /// idempotent by contract, and callers get no signal distinguishing
    /// "deleted" from "was never there".
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures.
    async fn delete_by_key(&self, kind: &str, key: &Key) -> Result<(), StoreError>;

    /// Deletes a batch of keys in one backend round-trip.
    ///
    /// Absent keys are skipped silently, like [`delete_by_key`](Self::delete_by_key).
    async fn delete_many(&self, kind: &str, keys: &[Key]) -> Result<(), StoreError>;

    /// Deletes the records of `kind` matching `query`.
    ///
    /// The query's window applies: exactly the records that
    /// [`list_by_query`](Self::list_by_query) would return are deleted.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::QueryEvaluation` for malformed descriptors.
    async fn delete_by_query(&self, kind: &str, query: &Query) -> Result<(), StoreError>;

    /// Deletes every record of `kind`.
    async fn delete_extent(&self, kind: &str) -> Result<(), StoreError>;

    // ==================== Counts ====================

    /// Counts the records of `kind`.
    ///
    /// Backends must use a key-only or metadata path: counting never
    /// materializes record bodies, which keeps it cheap on large extents.
    async fn count(&self, kind: &str) -> Result<u64, StoreError>;

    /// Counts the records of `kind` whose top-level `field` equals `value`,
    /// evaluating in place without materializing bodies.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::QueryEvaluation` if `field` is empty.
    async fn count_by_field(
        &self,
        kind: &str,
        field: &str,
        value: &Value,
    ) -> Result<u64, StoreError>;

    /// Counts the records of `kind` inside `query`'s window.
    ///
    /// The query's offset and limit apply, so this always equals the length
    /// of the corresponding [`list_by_query`](Self::list_by_query) result.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::QueryEvaluation` for malformed descriptors.
    async fn count_by_query(&self, kind: &str, query: &Query) -> Result<u64, StoreError>;

    // ==================== Probes and metadata ====================

    /// Returns whether a record exists under `kind` and `key`, via the same
    /// key-only path as [`count`](Self::count).
    async fn exists(&self, kind: &str, key: &Key) -> Result<bool, StoreError>;

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}
