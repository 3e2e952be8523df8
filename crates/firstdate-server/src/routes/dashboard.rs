use axum::extract::State;
use axum::{Extension, Json};
use serde::Serialize;
use ts_rs::TS;

use firstdate_core::models::account::Account;
use firstdate_core::models::submission::QuestionnaireSubmission;
use firstdate_questionnaire::schema::read_submission;
use firstdate_questionnaire::submit::find_submission;

use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum NextAction {
    CompleteQuestionnaire,
    PurchaseTicket,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Dashboard {
    pub name: String,
    pub email_verified: bool,
    pub has_submitted: bool,
    /// Absent when the stored submission could not be decoded.
    pub submitted_at: Option<String>,
    /// Matching is not run by this service yet.
    pub has_match: bool,
    pub progress: u8,
    pub next_action: NextAction,
}

impl Dashboard {
    pub fn new(account: &Account, has_submitted: bool, submission: Option<&QuestionnaireSubmission>) -> Self {
        Self {
            name: account.name.clone(),
            email_verified: account.email_verified,
            has_submitted,
            submitted_at: submission.map(|s| s.submitted_at.to_string()),
            has_match: false,
            progress: if has_submitted { 50 } else { 0 },
            next_action: if has_submitted {
                NextAction::PurchaseTicket
            } else {
                NextAction::CompleteQuestionnaire
            },
        }
    }
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Dashboard>, ApiError> {
    let found = find_submission(state.documents.as_ref(), &state.collection, &user.account.id).await?;
    let submission = match &found {
        Some(doc) => match read_submission(doc) {
            Ok(submission) => Some(submission),
            Err(e) => {
                tracing::warn!(user_id = %user.account.id, error = %e, "stored submission could not be decoded");
                None
            }
        },
        None => None,
    };
    Ok(Json(Dashboard::new(&user.account, found.is_some(), submission.as_ref())))
}
