use async_trait::async_trait;
use serde_json::{Value, json};

use firstdate_core::document::Document;
use firstdate_storage::documents::{CollectionRef, DocumentStore, Query, RecordPage};
use firstdate_storage::error::StorageError;
use firstdate_storage::memory::MemoryStore;
use firstdate_storage::pagination::{PAGE_SIZE, Progress, fetch_all};

fn collection() -> CollectionRef {
    CollectionRef::new("events", "questionnaires")
}

fn doc(i: usize) -> Document {
    match json!({ "$id": format!("doc{i:03}"), "studentId": format!("{i:07}") }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn seeded(n: usize) -> MemoryStore {
    let store = MemoryStore::new();
    store.insert_documents(&collection(), (0..n).map(doc));
    store
}

#[tokio::test]
async fn thirty_seven_records_take_two_requests() {
    let store = seeded(37);
    let mut seen = Vec::new();

    let all = fetch_all(&store, &collection(), PAGE_SIZE, |p| seen.push(p))
        .await
        .unwrap();

    assert_eq!(all.len(), 37);
    assert_eq!(store.list_calls(), 2);
    assert_eq!(
        seen,
        vec![
            Progress { current: 0, total: 37 },
            Progress { current: 25, total: 37 },
            Progress { current: 37, total: 37 },
        ]
    );
}

#[tokio::test]
async fn exact_multiple_of_page_size_stops_at_total() {
    let store = seeded(50);

    let all = fetch_all(&store, &collection(), PAGE_SIZE, |_| {}).await.unwrap();

    assert_eq!(all.len(), 50);
    // No third request for an empty page once the total is reached.
    assert_eq!(store.list_calls(), 2);
}

#[tokio::test]
async fn records_keep_cursor_order_without_duplicates() {
    let store = seeded(60);

    let all = fetch_all(&store, &collection(), 7, |_| {}).await.unwrap();

    let ids: Vec<&str> = all.iter().map(|d| d["$id"].as_str().unwrap()).collect();
    let expected: Vec<String> = (0..60).map(|i| format!("doc{i:03}")).collect();
    assert_eq!(ids, expected);
    assert_eq!(store.list_calls(), 9);
}

#[tokio::test]
async fn empty_collection_makes_one_request() {
    let store = MemoryStore::new();

    let all = fetch_all(&store, &collection(), PAGE_SIZE, |_| {}).await.unwrap();

    assert!(all.is_empty());
    assert_eq!(store.list_calls(), 1);
}

#[tokio::test]
async fn failure_mid_walk_fails_the_whole_fetch() {
    let store = seeded(80);
    store.fail_lists_from(2);

    let result = fetch_all(&store, &collection(), PAGE_SIZE, |_| {}).await;

    assert!(matches!(result, Err(StorageError::Request(_))));
    assert_eq!(store.list_calls(), 3);
}

/// Reports a stale total larger than what is actually stored, as happens
/// when documents are deleted during a walk.
struct StaleTotal {
    inner: MemoryStore,
    reported_total: u64,
}

#[async_trait]
impl DocumentStore for StaleTotal {
    async fn list_records(
        &self,
        collection: &CollectionRef,
        queries: &[Query],
    ) -> Result<RecordPage, StorageError> {
        let mut page = self.inner.list_records(collection, queries).await?;
        page.total = self.reported_total;
        Ok(page)
    }

    async fn create_record(
        &self,
        collection: &CollectionRef,
        id: &str,
        payload: Document,
    ) -> Result<Document, StorageError> {
        self.inner.create_record(collection, id, payload).await
    }
}

#[tokio::test]
async fn empty_page_ends_the_walk_before_total() {
    let store = StaleTotal {
        inner: seeded(30),
        reported_total: 100,
    };

    let all = fetch_all(&store, &collection(), PAGE_SIZE, |_| {}).await.unwrap();

    assert_eq!(all.len(), 30);
    assert_eq!(store.inner.list_calls(), 3);
}
