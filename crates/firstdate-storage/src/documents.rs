use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use firstdate_core::document::Document;

use crate::client::AppwriteClient;
use crate::error::StorageError;

/// Where a set of documents lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRef {
    pub database_id: String,
    pub collection_id: String,
}

impl CollectionRef {
    pub fn new(database_id: impl Into<String>, collection_id: impl Into<String>) -> Self {
        Self {
            database_id: database_id.into(),
            collection_id: collection_id.into(),
        }
    }

    fn documents_path(&self) -> String {
        format!(
            "databases/{}/collections/{}/documents",
            self.database_id, self.collection_id
        )
    }
}

/// Filters understood by [`DocumentStore::list_records`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Equal { attribute: String, value: String },
    Limit(usize),
    /// Only documents ordered after the one with this id.
    CursorAfter(String),
}

impl Query {
    pub fn equal(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Query::Equal {
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    pub fn limit(limit: usize) -> Self {
        Query::Limit(limit)
    }

    pub fn cursor_after(id: impl Into<String>) -> Self {
        Query::CursorAfter(id.into())
    }

    /// JSON query syntax accepted by the backend's `queries[]` parameter.
    pub fn to_wire(&self) -> String {
        let value = match self {
            Query::Equal { attribute, value } => {
                json!({ "method": "equal", "attribute": attribute, "values": [value] })
            }
            Query::Limit(limit) => json!({ "method": "limit", "values": [limit] }),
            Query::CursorAfter(id) => json!({ "method": "cursorAfter", "values": [id] }),
        };
        value.to_string()
    }
}

/// One page of a list call. `total` counts every document matching the
/// filters, ignoring limit and cursor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPage {
    pub total: u64,
    pub documents: Vec<Document>,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn list_records(
        &self,
        collection: &CollectionRef,
        queries: &[Query],
    ) -> Result<RecordPage, StorageError>;

    async fn create_record(
        &self,
        collection: &CollectionRef,
        id: &str,
        payload: Document,
    ) -> Result<Document, StorageError>;
}

/// [`DocumentStore`] backed by the hosted database, authenticated with the
/// server key.
#[derive(Debug, Clone)]
pub struct AppwriteDocuments {
    client: AppwriteClient,
}

impl AppwriteDocuments {
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateDocumentBody<'a> {
    document_id: &'a str,
    data: Document,
}

#[async_trait]
impl DocumentStore for AppwriteDocuments {
    async fn list_records(
        &self,
        collection: &CollectionRef,
        queries: &[Query],
    ) -> Result<RecordPage, StorageError> {
        let params: Vec<(&str, String)> = queries.iter().map(|q| ("queries[]", q.to_wire())).collect();
        let req = self
            .client
            .key_request(Method::GET, &collection.documents_path())?
            .query(&params);

        let page: RecordPage = self.client.send_json(req).await?;
        tracing::debug!(
            collection = %collection.collection_id,
            total = page.total,
            returned = page.documents.len(),
            "listed documents"
        );
        Ok(page)
    }

    async fn create_record(
        &self,
        collection: &CollectionRef,
        id: &str,
        payload: Document,
    ) -> Result<Document, StorageError> {
        let req = self
            .client
            .key_request(Method::POST, &collection.documents_path())?
            .json(&CreateDocumentBody {
                document_id: id,
                data: payload,
            });

        let doc: Document = self.client.send_json(req).await?;
        tracing::info!(collection = %collection.collection_id, id, "created document");
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_serialize_to_backend_syntax() {
        assert_eq!(
            Query::equal("userId", "abc").to_wire(),
            r#"{"method":"equal","attribute":"userId","values":["abc"]}"#
        );
        assert_eq!(Query::limit(25).to_wire(), r#"{"method":"limit","values":[25]}"#);
        assert_eq!(
            Query::cursor_after("doc9").to_wire(),
            r#"{"method":"cursorAfter","values":["doc9"]}"#
        );
    }

    #[test]
    fn list_response_parses_total_and_documents() {
        let body = r#"{"total":37,"documents":[{"$id":"a","studentId":"1234567"}]}"#;
        let page: RecordPage = serde_json::from_str(body).unwrap();
        assert_eq!(page.total, 37);
        assert_eq!(page.documents[0]["$id"], "a");
    }
}
