//! Implementation of the DataStore trait for MemoryStore.

use async_trait::async_trait;
use serde_json::Value;

use holdall_core::{Key, Record};
use holdall_store::{DataStore, Query, StoreError};

use crate::storage::{MemoryStore, StorageKey, make_storage_key};

/// Rejects field selectors that name no field.
fn check_field(field: &str) -> Result<(), StoreError> {
    if field.is_empty() {
        return Err(StoreError::query_evaluation(
            "field selector names an empty field",
        ));
    }
    Ok(())
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn put(&self, record: Record) -> Result<(), StoreError> {
        self.insert_record(record);
        Ok(())
    }

    async fn put_many(&self, records: Vec<Record>) -> Result<(), StoreError> {
        // One pin for the whole batch.
        let guard = self.data.pin();
        for record in records {
            let key = make_storage_key(&record.kind, &record.key);
            guard.insert(key, record);
        }
        Ok(())
    }

    async fn fetch_by_key(&self, kind: &str, key: &Key) -> Result<Option<Record>, StoreError> {
        let storage_key = make_storage_key(kind, key);
        let guard = self.data.pin();
        Ok(guard.get(&storage_key).cloned())
    }

    async fn fetch_by_field(
        &self,
        kind: &str,
        field: &str,
        value: &Value,
    ) -> Result<Option<Record>, StoreError> {
        check_field(field)?;
        let guard = self.data.pin();
        let found = guard
            .iter()
            .filter(|(k, record)| k.kind == kind && record.field(field) == Some(value))
            .min_by(|(a, _), (b, _)| a.key.cmp(&b.key))
            .map(|(_, record)| record.clone());
        Ok(found)
    }

    async fn fetch_by_query(
        &self,
        kind: &str,
        query: &Query,
    ) -> Result<Option<Record>, StoreError> {
        query.validate()?;
        Ok(self.select(kind, query).into_iter().next())
    }

    async fn fetch_any(&self, kind: &str) -> Result<Option<Record>, StoreError> {
        let guard = self.data.pin();
        let found = guard
            .iter()
            .filter(|(k, _)| k.kind == kind)
            .min_by(|(a, _), (b, _)| a.key.cmp(&b.key))
            .map(|(_, record)| record.clone());
        Ok(found)
    }

    async fn list(&self, kind: &str) -> Result<Vec<Record>, StoreError> {
        let mut records = self.extent(kind);
        records.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(records)
    }

    async fn list_by_field(
        &self,
        kind: &str,
        field: &str,
        value: &Value,
    ) -> Result<Vec<Record>, StoreError> {
        check_field(field)?;
        let guard = self.data.pin();
        let mut records: Vec<Record> = guard
            .iter()
            .filter(|(k, record)| k.kind == kind && record.field(field) == Some(value))
            .map(|(_, record)| record.clone())
            .collect();
        records.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(records)
    }

    async fn list_by_query(&self, kind: &str, query: &Query) -> Result<Vec<Record>, StoreError> {
        query.validate()?;
        Ok(self.select(kind, query))
    }

    async fn delete_by_key(&self, kind: &str, key: &Key) -> Result<(), StoreError> {
        // Removing an absent key is a silent no-op; delete is idempotent.
        self.remove_record(kind, key);
        Ok(())
    }

    async fn delete_many(&self, kind: &str, keys: &[Key]) -> Result<(), StoreError> {
        let guard = self.data.pin();
        for key in keys {
            guard.remove(&make_storage_key(kind, key));
        }
        Ok(())
    }

    async fn delete_by_query(&self, kind: &str, query: &Query) -> Result<(), StoreError> {
        query.validate()?;
        // The window is computed once; records inserted concurrently are
        // not picked up.
        let matched = self.select(kind, query);
        let guard = self.data.pin();
        for record in &matched {
            guard.remove(&make_storage_key(kind, &record.key));
        }
        Ok(())
    }

    async fn delete_extent(&self, kind: &str) -> Result<(), StoreError> {
        let guard = self.data.pin();
        let keys: Vec<StorageKey> = guard
            .iter()
            .filter(|(k, _)| k.kind == kind)
            .map(|(k, _)| k.clone())
            .collect();
        for key in &keys {
            guard.remove(key);
        }
        Ok(())
    }

    async fn count(&self, kind: &str) -> Result<u64, StoreError> {
        Ok(self.count_by_kind(kind) as u64)
    }

    async fn count_by_field(
        &self,
        kind: &str,
        field: &str,
        value: &Value,
    ) -> Result<u64, StoreError> {
        check_field(field)?;
        let guard = self.data.pin();
        let matched = guard
            .iter()
            .filter(|(k, record)| k.kind == kind && record.field(field) == Some(value))
            .count();
        Ok(matched as u64)
    }

    async fn count_by_query(&self, kind: &str, query: &Query) -> Result<u64, StoreError> {
        query.validate()?;
        Ok(query.window_len(self.count_matches(kind, query)) as u64)
    }

    async fn exists(&self, kind: &str, key: &Key) -> Result<bool, StoreError> {
        let storage_key = make_storage_key(kind, key);
        let guard = self.data.pin();
        Ok(guard.contains_key(&storage_key))
    }

    fn backend_name(&self) -> &'static str {
        "memory-papaya"
    }
}
