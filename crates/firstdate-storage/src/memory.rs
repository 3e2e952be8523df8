//! In-process [`DocumentStore`] with the hosted backend's list semantics.
//!
//! Used for local development without a backend and by tests across the
//! workspace.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use firstdate_core::document::{self, Document, DOCUMENT_CREATED_AT, DOCUMENT_ID};

use crate::documents::{CollectionRef, DocumentStore, Query, RecordPage};
use crate::error::StorageError;

/// Page size applied when a list call carries no limit.
pub const DEFAULT_LIMIT: usize = 25;

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, Vec<Document>>>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    /// List calls numbered at or above this value fail.
    fail_lists_from: Mutex<Option<usize>>,
    /// List calls numbered at or above this value never complete.
    stall_lists_from: Mutex<Option<usize>>,
    fail_creates: Mutex<Option<StorageError>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a collection. Documents without an id get a generated one.
    pub fn insert_documents(&self, collection: &CollectionRef, docs: impl IntoIterator<Item = Document>) {
        let mut collections = self.lock();
        let stored = collections.entry(key(collection)).or_default();
        for mut doc in docs {
            if document::document_id(&doc).is_none() {
                doc.insert(DOCUMENT_ID.into(), Value::String(document::new_document_id()));
            }
            stored.push(doc);
        }
    }

    pub fn documents(&self, collection: &CollectionRef) -> Vec<Document> {
        self.lock().get(&key(collection)).cloned().unwrap_or_default()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Make the `n`th list call (zero-based) and every later one fail.
    pub fn fail_lists_from(&self, n: usize) {
        *self.fail_lists_from.lock().unwrap_or_else(|e| e.into_inner()) = Some(n);
    }

    /// Make the `n`th list call (zero-based) and every later one hang until
    /// the caller drops the future.
    pub fn stall_lists_from(&self, n: usize) {
        *self.stall_lists_from.lock().unwrap_or_else(|e| e.into_inner()) = Some(n);
    }

    /// Make the next create call fail with `err`.
    pub fn fail_next_create(&self, err: StorageError) {
        *self.fail_creates.lock().unwrap_or_else(|e| e.into_inner()) = Some(err);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<Document>>> {
        self.collections.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn key(collection: &CollectionRef) -> String {
    format!("{}/{}", collection.database_id, collection.collection_id)
}

fn matches(doc: &Document, queries: &[Query]) -> bool {
    queries.iter().all(|q| match q {
        Query::Equal { attribute, value } => {
            doc.get(attribute).and_then(Value::as_str) == Some(value.as_str())
        }
        Query::Limit(_) | Query::CursorAfter(_) => true,
    })
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn list_records(
        &self,
        collection: &CollectionRef,
        queries: &[Query],
    ) -> Result<RecordPage, StorageError> {
        let call = self.list_calls.fetch_add(1, Ordering::SeqCst);
        let failing = *self.fail_lists_from.lock().unwrap_or_else(|e| e.into_inner());
        if failing.is_some_and(|n| call >= n) {
            return Err(StorageError::Request("connection reset".to_string()));
        }
        let stalled = *self.stall_lists_from.lock().unwrap_or_else(|e| e.into_inner());
        if stalled.is_some_and(|n| call >= n) {
            std::future::pending::<()>().await;
        }

        let collections = self.lock();
        let filtered: Vec<&Document> = collections
            .get(&key(collection))
            .map(|docs| docs.iter().filter(|d| matches(d, queries)).collect())
            .unwrap_or_default();

        let mut start = 0;
        let mut limit = DEFAULT_LIMIT;
        for q in queries {
            match q {
                Query::Limit(n) => limit = *n,
                Query::CursorAfter(id) => {
                    let pos = filtered
                        .iter()
                        .position(|d| document::document_id(d) == Some(id.as_str()))
                        .ok_or_else(|| StorageError::Backend {
                            status: 400,
                            kind: "general_cursor_not_found".to_string(),
                            message: format!("document '{id}' for the 'cursorAfter' value not found"),
                        })?;
                    start = pos + 1;
                }
                Query::Equal { .. } => {}
            }
        }

        Ok(RecordPage {
            total: filtered.len() as u64,
            documents: filtered.iter().skip(start).take(limit).map(|d| (*d).clone()).collect(),
        })
    }

    async fn create_record(
        &self,
        collection: &CollectionRef,
        id: &str,
        payload: Document,
    ) -> Result<Document, StorageError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_creates.lock().unwrap_or_else(|e| e.into_inner()).take() {
            return Err(err);
        }

        let mut collections = self.lock();
        let stored = collections.entry(key(collection)).or_default();
        if stored.iter().any(|d| document::document_id(d) == Some(id)) {
            return Err(StorageError::Backend {
                status: 409,
                kind: "document_already_exists".to_string(),
                message: format!("document '{id}' already exists"),
            });
        }

        let mut doc = Document::new();
        doc.insert(DOCUMENT_ID.into(), Value::String(id.to_string()));
        doc.insert(
            DOCUMENT_CREATED_AT.into(),
            Value::String(jiff::Timestamp::now().to_string()),
        );
        doc.extend(payload);
        stored.push(doc.clone());
        Ok(doc)
    }
}
