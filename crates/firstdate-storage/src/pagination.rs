use serde::{Deserialize, Serialize};

use firstdate_core::document::{self, Document};

use crate::documents::{CollectionRef, DocumentStore, Query};
use crate::error::StorageError;

/// Documents requested per list call during a full walk.
pub const PAGE_SIZE: usize = 25;

/// How far a [`fetch_all`] walk has got.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current: usize,
    pub total: u64,
}

/// Fetch every document in `collection`, one page at a time.
///
/// The first call learns the total and doubles as the first page. Each
/// following call resumes after the last id seen. The walk ends on an empty
/// page or once `total` documents have been collected, whichever comes first,
/// so a collection growing mid-walk cannot keep it running. Any failed call
/// fails the whole walk and nothing collected so far is returned.
///
/// Calls are strictly sequential. Dropping the returned future abandons the
/// walk.
pub async fn fetch_all<S, F>(
    store: &S,
    collection: &CollectionRef,
    page_size: usize,
    mut on_progress: F,
) -> Result<Vec<Document>, StorageError>
where
    S: DocumentStore + ?Sized,
    F: FnMut(Progress),
{
    let first = store
        .list_records(collection, &[Query::limit(page_size)])
        .await?;
    let total = first.total;
    on_progress(Progress { current: 0, total });

    let mut all: Vec<Document> = Vec::new();
    let mut page = first.documents;
    let mut requests = 1;

    while !page.is_empty() {
        let cursor = page
            .last()
            .and_then(document::document_id)
            .map(str::to_string)
            .ok_or_else(|| StorageError::UnexpectedResponse("document without an id".to_string()))?;

        all.extend(page);
        on_progress(Progress {
            current: all.len(),
            total,
        });

        if all.len() as u64 >= total {
            break;
        }

        page = store
            .list_records(
                collection,
                &[Query::limit(page_size), Query::cursor_after(cursor)],
            )
            .await?
            .documents;
        requests += 1;
    }

    tracing::info!(
        collection = %collection.collection_id,
        fetched = all.len(),
        total,
        requests,
        "fetched all documents"
    );
    Ok(all)
}
