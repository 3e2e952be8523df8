use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use jiff::{Timestamp, tz::TimeZone};
use serde::Serialize;
use serde_json::json;
use ts_rs::TS;

use firstdate_export::csv::{self, CONTENT_TYPE as CSV_CONTENT_TYPE};
use firstdate_export::{tabulate, ResponseTable};
use firstdate_storage::pagination::fetch_all;

use crate::audit::AuditEvent;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::{AppState, RefreshStatus};

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ResponsesView {
    pub count: usize,
    pub loaded_at: Option<String>,
    pub status: RefreshStatus,
    /// Export is disabled until a completed load holds at least one response.
    pub can_export: bool,
    pub table: ResponseTable,
}

fn current_view(state: &AppState) -> ResponsesView {
    let cache = state.responses();
    ResponsesView {
        count: cache.records.len(),
        loaded_at: cache.loaded_at.map(|t| t.to_string()),
        status: cache.status.clone(),
        can_export: cache.status == RefreshStatus::Idle && !cache.records.is_empty(),
        table: tabulate(&cache.records),
    }
}

/// Marks the cache as refreshing, emptying it first, and clears the mark if
/// the refresh is dropped before finishing, e.g. when the client disconnects.
struct RefreshGuard<'a> {
    state: &'a AppState,
    finished: bool,
}

impl<'a> RefreshGuard<'a> {
    fn start(state: &'a AppState) -> Result<Self, ApiError> {
        let mut cache = state.responses();
        if cache.is_refreshing() {
            return Err(ApiError::Conflict("Responses are already being refreshed.".to_string()));
        }
        cache.records.clear();
        cache.loaded_at = None;
        cache.status = RefreshStatus::Running { current: 0, total: 0 };
        Ok(Self { state, finished: false })
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            let mut cache = self.state.responses();
            if cache.is_refreshing() {
                cache.status = RefreshStatus::Idle;
            }
        }
    }
}

/// Walk the whole collection and replace the cache. A failed walk leaves the
/// cache empty until the next successful refresh.
async fn refresh_cache(state: &AppState, user_id: &str) -> Result<(), ApiError> {
    let mut guard = RefreshGuard::start(state)?;

    let result = fetch_all(state.documents.as_ref(), &state.collection, state.page_size, |progress| {
        state.responses().set_progress(progress);
    })
    .await;

    let mut cache = state.responses();
    guard.finished = true;
    match result {
        Ok(records) => {
            AuditEvent::new("refresh", "responses", &state.collection.collection_id, user_id)
                .with_details(json!({ "count": records.len() }))
                .emit();
            cache.records = records;
            cache.loaded_at = Some(Timestamp::now());
            cache.status = RefreshStatus::Idle;
            Ok(())
        }
        Err(e) => {
            cache.status = RefreshStatus::Failed {
                message: "Failed to load responses.".to_string(),
            };
            Err(e.into())
        }
    }
}

/// Loaded responses. The first visit loads them; after a failed load the
/// failure is reported until an explicit refresh.
pub async fn list_responses(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ResponsesView>, ApiError> {
    let never_loaded = {
        let cache = state.responses();
        cache.loaded_at.is_none() && cache.status == RefreshStatus::Idle
    };
    if never_loaded {
        refresh_cache(&state, &user.account.id).await?;
    }
    Ok(Json(current_view(&state)))
}

pub async fn refresh_responses(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ResponsesView>, ApiError> {
    refresh_cache(&state, &user.account.id).await?;
    Ok(Json(current_view(&state)))
}

/// Download the loaded responses as CSV.
pub async fn export_responses(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let records = {
        let cache = state.responses();
        if cache.status != RefreshStatus::Idle {
            return Err(ApiError::Conflict(
                "Responses must be reloaded before they can be exported.".to_string(),
            ));
        }
        cache.records.clone()
    };
    let body = csv::to_csv(&records).await?;
    let today = Timestamp::now().to_zoned(TimeZone::UTC).date();
    let file_name = csv::file_name(today);

    AuditEvent::new("export", "responses", &file_name, &user.account.id)
        .with_details(json!({ "rows": records.len() }))
        .emit();

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\"")),
        ],
        body,
    )
        .into_response())
}
