//! Conformance suite for the typed store surface over the in-memory backend.

use serde::{Deserialize, Serialize};

use holdall_memory::{BackendKind, StoreConfig, create_data_store, memory_store, open_store};
use holdall_store::prelude::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Widget {
    id: i64,
    name: String,
    size: i64,
}

impl Entity for Widget {
    const KIND: &'static str = "widget";

    fn key(&self) -> Key {
        Key::Int(self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Gadget {
    id: i64,
    label: String,
}

impl Entity for Gadget {
    const KIND: &'static str = "gadget";

    fn key(&self) -> Key {
        Key::Int(self.id)
    }
}

/// Entity whose body refuses to encode for negative charges, for exercising
/// partial batch failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Flaky {
    id: i64,
    #[serde(serialize_with = "reject_negative")]
    charge: i64,
}

impl Entity for Flaky {
    const KIND: &'static str = "flaky";

    fn key(&self) -> Key {
        Key::Int(self.id)
    }
}

fn reject_negative<S>(value: &i64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    if *value < 0 {
        return Err(serde::ser::Error::custom("charge must not be negative"));
    }
    serializer.serialize_i64(*value)
}

fn widget(id: i64, name: &str) -> Widget {
    Widget {
        id,
        name: name.to_string(),
        size: id * 10,
    }
}

#[tokio::test]
async fn test_put_then_get_roundtrip() {
    let store = memory_store();
    let original = widget(1, "anvil");

    store.put(&original).await.unwrap();
    let found: Widget = store.get_by_key(1).await.unwrap();

    assert_eq!(found, original);
}

#[tokio::test]
async fn test_put_replaces_stored_entity() {
    let store = memory_store();
    store.put(&widget(1, "first")).await.unwrap();
    store
        .put(&Widget {
            id: 1,
            name: "second".to_string(),
            size: 99,
        })
        .await
        .unwrap();

    let found: Widget = store.get_by_key(1).await.unwrap();
    assert_eq!(found.name, "second");
    assert_eq!(found.size, 99);
    assert_eq!(store.count::<Widget>().await.unwrap(), 1);
}

#[tokio::test]
async fn test_missing_entity_is_not_found() {
    let store = memory_store();

    let error = store.get_by_key::<Widget>(1).await.unwrap_err();
    assert!(error.is_not_found());
    assert!(error.to_string().contains("Entity not found: widget"));
    assert_eq!(error.category().to_string(), "not_found");
}

#[tokio::test]
async fn test_delete_of_absent_entity_succeeds_twice() {
    let store = memory_store();

    store.delete(&widget(42, "ghost")).await.unwrap();
    store.delete(&widget(42, "ghost")).await.unwrap();

    assert!(store.last_error().is_none());
}

#[tokio::test]
async fn test_widget_filtering_scenario() {
    let store = memory_store();
    store
        .put_all(&[widget(1, "a"), widget(2, "b"), widget(3, "a")])
        .await
        .unwrap();

    let matches: Vec<Widget> = store.list_by_field("name", "a").await.unwrap();
    let ids: Vec<i64> = matches.iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![1, 3]);

    assert_eq!(store.count_by_field::<Widget>("name", "a").await.unwrap(), 2);

    store.delete(&widget(1, "a")).await.unwrap();
    let error = store.get_by_key::<Widget>(1).await.unwrap_err();
    assert!(error.is_not_found());

    // Deleting the same widget again is a quiet success.
    store.delete(&widget(1, "a")).await.unwrap();
}

#[tokio::test]
async fn test_get_by_field_returns_lowest_key_on_ties() {
    let store = memory_store();
    store
        .put_all(&[widget(3, "dup"), widget(1, "dup"), widget(2, "solo")])
        .await
        .unwrap();

    let found: Widget = store.get_by_field("name", "dup").await.unwrap();
    assert_eq!(found.id, 1);
}

#[tokio::test]
async fn test_get_any_fails_only_on_empty_extent() {
    let store = memory_store();

    let error = store.get_any::<Widget>().await.unwrap_err();
    assert!(error.is_not_found());

    store.put(&widget(5, "x")).await.unwrap();
    let any: Widget = store.get_any().await.unwrap();
    assert_eq!(any.id, 5);
}

#[tokio::test]
async fn test_query_sort_and_window_end_to_end() {
    let store = memory_store();
    store
        .put_all(&(1..=5).map(|i| widget(i, "w")).collect::<Vec<_>>())
        .await
        .unwrap();

    let query = Query::new()
        .with_sort(Sort::desc("size"))
        .with_offset(1)
        .with_limit(2);
    let ids: Vec<i64> = store
        .list_by_query::<Widget>(&query)
        .await
        .unwrap()
        .iter()
        .map(|w| w.id)
        .collect();
    assert_eq!(ids, vec![4, 3]);

    let first: Widget = store.get_by_query(&query).await.unwrap();
    assert_eq!(first.id, 4);

    let beyond = Query::new().with_offset(99);
    let error = store.get_by_query::<Widget>(&beyond).await.unwrap_err();
    assert!(error.is_not_found());
}

#[tokio::test]
async fn test_count_agrees_with_list_length() {
    let store = memory_store();
    assert_eq!(store.count::<Widget>().await.unwrap(), 0);

    store
        .put_all(&(1..=6).map(|i| widget(i, "w")).collect::<Vec<_>>())
        .await
        .unwrap();
    assert_eq!(
        store.count::<Widget>().await.unwrap() as usize,
        store.list::<Widget>().await.unwrap().len()
    );

    store.delete(&widget(2, "w")).await.unwrap();
    store.delete(&widget(4, "w")).await.unwrap();
    assert_eq!(
        store.count::<Widget>().await.unwrap() as usize,
        store.list::<Widget>().await.unwrap().len()
    );
    assert_eq!(store.count::<Widget>().await.unwrap(), 4);
}

#[tokio::test]
async fn test_count_by_query_agrees_with_windowed_listing() {
    let store = memory_store();
    store
        .put_all(
            &(1..=9)
                .map(|i| widget(i, if i % 3 == 0 { "fizz" } else { "plain" }))
                .collect::<Vec<_>>(),
        )
        .await
        .unwrap();

    for (offset, limit) in [(0, None), (0, Some(2)), (1, Some(5)), (2, None), (7, Some(1))] {
        let mut query = Query::new()
            .with_filter(Filter::eq("name", "plain"))
            .with_offset(offset);
        if let Some(limit) = limit {
            query = query.with_limit(limit);
        }

        let counted = store.count_by_query::<Widget>(&query).await.unwrap();
        let listed = store.list_by_query::<Widget>(&query).await.unwrap();
        assert_eq!(
            counted as usize,
            listed.len(),
            "window offset={offset} limit={limit:?}"
        );
    }
}

#[tokio::test]
async fn test_delete_extent_zeroes_count() {
    let store = memory_store();
    store
        .put_all(&(1..=4).map(|i| widget(i, "w")).collect::<Vec<_>>())
        .await
        .unwrap();
    assert_eq!(store.count::<Widget>().await.unwrap(), 4);

    store.delete_extent::<Widget>().await.unwrap();

    assert_eq!(store.count::<Widget>().await.unwrap(), 0);
    assert!(store.list::<Widget>().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_put_all_then_list_yields_same_set() {
    let store = memory_store();
    let batch = [widget(2, "b"), widget(3, "c"), widget(1, "a")];

    store.put_all(&batch).await.unwrap();

    let mut ids: Vec<i64> = store
        .list::<Widget>()
        .await
        .unwrap()
        .iter()
        .map(|w| w.id)
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_delete_all_removes_batch_keys() {
    let store = memory_store();
    let batch = [widget(1, "a"), widget(2, "b"), widget(3, "c")];
    store.put_all(&batch).await.unwrap();

    store.delete_all(&batch[..2]).await.unwrap();

    let ids: Vec<i64> = store
        .list::<Widget>()
        .await
        .unwrap()
        .iter()
        .map(|w| w.id)
        .collect();
    assert_eq!(ids, vec![3]);

    // Keys never stored are skipped silently.
    store
        .delete_all(&[widget(8, "x"), widget(9, "y")])
        .await
        .unwrap();
    assert!(store.last_error().is_none());
}

#[tokio::test]
async fn test_delete_by_query_removes_the_windowed_matches() {
    let store = memory_store();
    store
        .put_all(&[widget(1, "a"), widget(2, "b"), widget(3, "a"), widget(4, "a")])
        .await
        .unwrap();

    let query = Query::new().with_filter(Filter::eq("name", "a")).with_limit(2);
    store.delete_by_query::<Widget>(&query).await.unwrap();

    // The lowest-keyed two of the three matches went away.
    let ids: Vec<i64> = store
        .list::<Widget>()
        .await
        .unwrap()
        .iter()
        .map(|w| w.id)
        .collect();
    assert_eq!(ids, vec![2, 4]);
}

#[tokio::test]
async fn test_put_all_continues_past_encode_failures() {
    let store = memory_store();
    let batch = [
        Flaky { id: 1, charge: 5 },
        Flaky { id: 2, charge: -3 },
        Flaky { id: 3, charge: 8 },
    ];

    let error = store.put_all(&batch).await.unwrap_err();
    assert_eq!(error.category().to_string(), "serialization");

    // The encodable entities were still persisted.
    let ids: Vec<i64> = store
        .list::<Flaky>()
        .await
        .unwrap()
        .iter()
        .map(|f| f.id)
        .collect();
    assert_eq!(ids, vec![1, 3]);

    let last = store.last_error().unwrap();
    assert!(last.error.to_string().contains("charge"));
}

#[tokio::test]
async fn test_last_error_slot_records_failures_only() {
    let store = memory_store();
    assert!(store.last_error().is_none());

    // Success does not touch the slot.
    store.put(&widget(1, "a")).await.unwrap();
    assert!(store.last_error().is_none());

    // A delete miss is success, not a recordable failure.
    store.delete(&widget(9, "x")).await.unwrap();
    assert!(store.last_error().is_none());

    // A not-found lookup lands in the slot.
    let error = store.get_by_key::<Widget>(42).await.unwrap_err();
    assert!(error.is_not_found());
    assert!(store.last_error().unwrap().error.is_not_found());

    // Later successes never clear it.
    store.put(&widget(2, "b")).await.unwrap();
    assert!(store.last_error().is_some());
}

#[tokio::test]
async fn test_last_error_slot_keeps_newest_failure() {
    let store = memory_store();

    store.get_by_key::<Widget>(1).await.unwrap_err();
    assert!(store.last_error().unwrap().error.is_not_found());

    let bad_query = Query::new().with_filter(Filter::eq("", "x"));
    store.list_by_query::<Widget>(&bad_query).await.unwrap_err();
    assert!(store.last_error().unwrap().error.is_query_evaluation());
}

#[tokio::test]
async fn test_clones_share_backend_and_error_slot() {
    let store = memory_store();
    let clone = store.clone();

    store.put(&widget(1, "a")).await.unwrap();
    let via_clone: Widget = clone.get_by_key(1).await.unwrap();
    assert_eq!(via_clone.id, 1);

    clone.get_by_key::<Widget>(99).await.unwrap_err();
    assert!(store.last_error().unwrap().error.is_not_found());
}

#[tokio::test]
async fn test_kinds_are_separate_extents() {
    let store = memory_store();
    store.put(&widget(1, "w")).await.unwrap();
    store
        .put(&Gadget {
            id: 1,
            label: "g".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(store.count::<Widget>().await.unwrap(), 1);
    assert_eq!(store.count::<Gadget>().await.unwrap(), 1);

    store.delete_extent::<Widget>().await.unwrap();
    assert_eq!(store.count::<Widget>().await.unwrap(), 0);

    let gadget: Gadget = store.get_by_key(1).await.unwrap();
    assert_eq!(gadget.label, "g");
}

#[tokio::test]
async fn test_exists_reports_presence() {
    let store = memory_store();
    assert!(!store.exists::<Widget>(1).await.unwrap());

    store.put(&widget(1, "a")).await.unwrap();
    assert!(store.exists::<Widget>(1).await.unwrap());
}

#[tokio::test]
async fn test_open_store_from_config() {
    let store = open_store(&StoreConfig::default());
    assert_eq!(store.backend_name(), "memory-papaya");

    store.put(&widget(1, "a")).await.unwrap();
    let found: Widget = store.get_by_key(1).await.unwrap();
    assert_eq!(found.name, "a");
}

#[tokio::test]
async fn test_create_data_store_builds_memory_backend() {
    let backend = create_data_store(&StoreConfig::default());
    assert_eq!(backend.backend_name(), "memory-papaya");
}

#[test]
fn test_store_config_parses_with_defaults() {
    let config: StoreConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config.backend, BackendKind::MemoryPapaya);
    assert!(config.options.preallocate_records.is_none());

    let config: StoreConfig = serde_json::from_str(
        r#"{"backend": "memory-papaya", "options": {"preallocate_records": 512}}"#,
    )
    .unwrap();
    assert_eq!(config.options.preallocate_records, Some(512));
}
