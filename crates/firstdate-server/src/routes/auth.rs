use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Serialize;
use ts_rs::TS;

use firstdate_auth::flows::{self, SignedIn};
use firstdate_auth::forms::{
    RecoveryConfirmForm, RecoveryRequestForm, RegisterForm, SignInForm, VerificationConfirmForm,
};
use firstdate_core::models::account::Account;

use crate::audit::AuditEvent;
use crate::error::ApiError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Returned on register and sign-in. The UI sends `session` back as a
/// bearer token.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct SessionResponse {
    pub account: Account,
    pub session: String,
    pub redirect: String,
}

impl From<SignedIn> for SessionResponse {
    fn from(s: SignedIn) -> Self {
        Self {
            account: s.account,
            session: s.session.secret,
            redirect: s.redirect.to_string(),
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct Notice {
    pub message: String,
}

fn notice(message: &str) -> Json<Notice> {
    Json(Notice {
        message: message.to_string(),
    })
}

pub async fn register(
    State(state): State<AppState>,
    Json(form): Json<RegisterForm>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let signed_in = flows::register(state.accounts.as_ref(), &state.email_policy, &form, &state.origin).await?;
    AuditEvent::new("register", "account", &signed_in.account.id, &signed_in.account.id).emit();
    Ok((StatusCode::CREATED, Json(signed_in.into())))
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(form): Json<SignInForm>,
) -> Result<Json<SessionResponse>, ApiError> {
    let signed_in = flows::sign_in(state.accounts.as_ref(), &state.email_policy, &form).await?;
    AuditEvent::new("sign_in", "session", &signed_in.session.id, &signed_in.account.id).emit();
    Ok(Json(signed_in.into()))
}

pub async fn sign_out(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<StatusCode, ApiError> {
    flows::sign_out(state.accounts.as_ref(), &user.session).await?;
    state.discard_draft(&user.account.id);
    AuditEvent::new("sign_out", "session", "current", &user.account.id).emit();
    Ok(StatusCode::NO_CONTENT)
}

pub async fn me(Extension(user): Extension<AuthUser>) -> Json<Account> {
    Json(user.account)
}

pub async fn request_recovery(
    State(state): State<AppState>,
    Json(form): Json<RecoveryRequestForm>,
) -> Result<(StatusCode, Json<Notice>), ApiError> {
    flows::request_recovery(state.accounts.as_ref(), &state.email_policy, &form, &state.origin).await?;
    Ok((
        StatusCode::ACCEPTED,
        notice("If an account exists for this email, a reset link is on its way."),
    ))
}

pub async fn confirm_recovery(
    State(state): State<AppState>,
    Json(form): Json<RecoveryConfirmForm>,
) -> Result<Json<Notice>, ApiError> {
    flows::confirm_recovery(state.accounts.as_ref(), &form).await?;
    Ok(notice("Your password has been reset. You can now sign in."))
}

pub async fn request_verification(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<(StatusCode, Json<Notice>), ApiError> {
    flows::request_verification(state.accounts.as_ref(), &user.session, &state.origin).await?;
    Ok((StatusCode::ACCEPTED, notice("Verification email sent.")))
}

pub async fn confirm_verification(
    State(state): State<AppState>,
    Json(form): Json<VerificationConfirmForm>,
) -> Result<Json<Notice>, ApiError> {
    flows::confirm_verification(state.accounts.as_ref(), &form).await?;
    Ok(notice("Your email has been verified."))
}
