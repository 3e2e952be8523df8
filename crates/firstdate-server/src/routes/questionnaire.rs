use std::collections::BTreeMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use jiff::Timestamp;
use serde::Deserialize;
use serde_json::json;

use firstdate_questionnaire::submit;
use firstdate_questionnaire::wizard::Wizard;
use firstdate_questionnaire::StepOutline;

use crate::audit::AuditEvent;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Current wizard view. 422 when the last navigation left field errors.
fn view_response(wizard: &Wizard) -> Response {
    let status = if wizard.errors().is_empty() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, Json(wizard.view())).into_response()
}

pub async fn catalog(State(state): State<AppState>) -> Json<Vec<StepOutline>> {
    Json(firstdate_questionnaire::outline(&state.settings))
}

pub async fn get_wizard(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> Response {
    let draft = state.draft(&user.account.id);
    let wizard = draft.lock().await;
    (StatusCode::OK, Json(wizard.view())).into_response()
}

#[derive(Debug, Deserialize)]
pub struct AnswersRequest {
    pub values: BTreeMap<String, String>,
}

pub async fn set_answers(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<AnswersRequest>,
) -> Result<Response, ApiError> {
    let draft = state.draft(&user.account.id);
    let mut wizard = draft.lock().await;
    for (key, value) in req.values {
        wizard.set_value(&key, value)?;
    }
    Ok((StatusCode::OK, Json(wizard.view())).into_response())
}

pub async fn next(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> Result<Response, ApiError> {
    let draft = state.draft(&user.account.id);
    let mut wizard = draft.lock().await;
    wizard.next()?;
    Ok(view_response(&wizard))
}

pub async fn previous(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let draft = state.draft(&user.account.id);
    let mut wizard = draft.lock().await;
    wizard.previous()?;
    Ok(view_response(&wizard))
}

/// Validate everything and ask for confirmation. Nothing is written yet.
pub async fn submit(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> Result<Response, ApiError> {
    let draft = state.draft(&user.account.id);
    let mut wizard = draft.lock().await;
    match wizard.submit() {
        Ok(()) => Ok(view_response(&wizard)),
        Err(firstdate_questionnaire::QuestionnaireError::Validation(_)) => Ok(view_response(&wizard)),
        Err(e) => Err(e.into()),
    }
}

/// Write the confirmed answers. The draft keeps its values when this fails,
/// so the same call can be retried.
pub async fn confirm(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Response, ApiError> {
    let draft = state.draft(&user.account.id);
    let mut wizard = draft.lock().await;
    let submission = submit::submit_confirmed(
        &mut wizard,
        state.documents.as_ref(),
        &state.collection,
        Some(&user.account),
        Timestamp::now(),
    )
    .await?;

    AuditEvent::new("submit", "questionnaire", &submission.id, &user.account.id)
        .with_details(json!({ "preferredDate": submission.answers.preferred_date.to_string() }))
        .emit();
    Ok((StatusCode::CREATED, Json(wizard.view())).into_response())
}

pub async fn cancel(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> Result<Response, ApiError> {
    let draft = state.draft(&user.account.id);
    let mut wizard = draft.lock().await;
    wizard.cancel_confirmation()?;
    Ok(view_response(&wizard))
}
