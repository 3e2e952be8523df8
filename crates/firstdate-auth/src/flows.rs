//! Account flows. Every flow validates its form before touching the backend.

use tracing::{info, warn};

use firstdate_core::document::new_document_id;
use firstdate_core::models::account::{Account, Session};

use crate::error::AuthError;
use crate::forms::{
    EmailPolicy, RecoveryConfirmForm, RecoveryRequestForm, RegisterForm, SignInForm, VerificationConfirmForm,
};
use crate::service::AccountService;

pub const QUESTIONNAIRE_PATH: &str = "/questionnaire";
pub const DASHBOARD_PATH: &str = "/dashboard";
pub const SIGN_IN_PATH: &str = "/auth/signin";
pub const RECOVERY_CONFIRM_PATH: &str = "/auth/reset-password/confirm";
pub const VERIFY_PATH: &str = "/auth/verify";

/// A fresh session and where to send the browser next.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub account: Account,
    pub session: Session,
    pub redirect: &'static str,
}

fn link(origin: &str, path: &str) -> String {
    format!("{}{path}", origin.trim_end_matches('/'))
}

/// Create the account, sign it in, and send the verification email.
///
/// A failed verification email does not undo the registration; the
/// dashboard offers to send it again.
pub async fn register<S: AccountService + ?Sized>(
    service: &S,
    policy: &EmailPolicy,
    form: &RegisterForm,
    origin: &str,
) -> Result<SignedIn, AuthError> {
    form.validate(policy)?;
    let email = form.email.trim();

    let account = service
        .create_account(&new_document_id(), email, &form.password, form.name.trim())
        .await?;
    let session = service.create_session(email, &form.password).await?;
    info!(user_id = %account.id, "account registered");

    if let Err(e) = service
        .create_verification(&session.secret, &link(origin, VERIFY_PATH))
        .await
    {
        warn!(user_id = %account.id, error = %e, "failed to send verification email");
    }

    Ok(SignedIn {
        account,
        session,
        redirect: QUESTIONNAIRE_PATH,
    })
}

pub async fn sign_in<S: AccountService + ?Sized>(
    service: &S,
    policy: &EmailPolicy,
    form: &SignInForm,
) -> Result<SignedIn, AuthError> {
    form.validate(policy)?;
    let session = service.create_session(form.email.trim(), &form.password).await?;
    let account = service.current_account(&session.secret).await?;
    info!(user_id = %account.id, "signed in");
    Ok(SignedIn {
        account,
        session,
        redirect: DASHBOARD_PATH,
    })
}

pub async fn sign_out<S: AccountService + ?Sized>(service: &S, session: &str) -> Result<(), AuthError> {
    service.delete_session(session).await?;
    info!("signed out");
    Ok(())
}

pub async fn request_recovery<S: AccountService + ?Sized>(
    service: &S,
    policy: &EmailPolicy,
    form: &RecoveryRequestForm,
    origin: &str,
) -> Result<(), AuthError> {
    form.validate(policy)?;
    service
        .create_recovery(form.email.trim(), &link(origin, RECOVERY_CONFIRM_PATH))
        .await
}

pub async fn confirm_recovery<S: AccountService + ?Sized>(
    service: &S,
    form: &RecoveryConfirmForm,
) -> Result<(), AuthError> {
    let (user_id, secret) = form.validate()?;
    service.confirm_recovery(user_id, secret, &form.password).await?;
    info!(user_id, "password reset");
    Ok(())
}

pub async fn request_verification<S: AccountService + ?Sized>(
    service: &S,
    session: &str,
    origin: &str,
) -> Result<(), AuthError> {
    service.create_verification(session, &link(origin, VERIFY_PATH)).await
}

pub async fn confirm_verification<S: AccountService + ?Sized>(
    service: &S,
    form: &VerificationConfirmForm,
) -> Result<(), AuthError> {
    let (user_id, secret) = form.validate()?;
    service.confirm_verification(user_id, secret).await?;
    info!(user_id, "email verified");
    Ok(())
}
