use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use firstdate_core::models::account::Account;

use crate::error::ApiError;
use crate::state::AppState;

/// Session middleware.
///
/// Extracts `Authorization: Bearer <session secret>` and resolves it to an
/// account through the account backend. On success, inserts [`AuthUser`]
/// into request extensions for handlers to use.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let session = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(ApiError::sign_in_required)?
        .to_string();

    let account = state.accounts.current_account(&session).await?;
    req.extensions_mut().insert(AuthUser { account, session });

    Ok(next.run(req).await)
}

/// Admin gate. Runs after [`require_auth`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let user = req
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(ApiError::sign_in_required)?;
    if !user.account.is_admin() {
        tracing::warn!(user_id = %user.account.id, path = %req.uri().path(), "admin route refused");
        return Err(ApiError::Forbidden("Admin access required.".to_string()));
    }
    Ok(next.run(req).await)
}

/// The signed-in account and the session secret it was resolved from.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub account: Account,
    pub session: String,
}
