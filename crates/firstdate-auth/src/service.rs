use async_trait::async_trait;

use firstdate_core::models::account::{Account, Session};

use crate::error::AuthError;

/// The account backend. `session` arguments are the opaque session secret
/// handed out by [`create_session`](AccountService::create_session).
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn current_account(&self, session: &str) -> Result<Account, AuthError>;

    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Account, AuthError>;

    async fn create_session(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn delete_session(&self, session: &str) -> Result<(), AuthError>;

    /// Email a recovery link pointing at `url`.
    async fn create_recovery(&self, email: &str, url: &str) -> Result<(), AuthError>;

    async fn confirm_recovery(&self, user_id: &str, secret: &str, password: &str) -> Result<(), AuthError>;

    /// Email a verification link pointing at `url` to the session's account.
    async fn create_verification(&self, session: &str, url: &str) -> Result<(), AuthError>;

    async fn confirm_verification(&self, user_id: &str, secret: &str) -> Result<(), AuthError>;
}
