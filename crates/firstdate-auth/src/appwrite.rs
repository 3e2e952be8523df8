//! [`AccountService`] over the hosted backend's account API.

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;

use firstdate_core::models::account::{Account, Session};
use firstdate_storage::client::{AppwriteClient, SESSION_HEADER};
use firstdate_storage::error::StorageError;

use crate::error::AuthError;
use crate::service::AccountService;

#[derive(Debug, Deserialize)]
struct UserBody {
    #[serde(rename = "$id")]
    id: String,
    #[serde(default)]
    name: String,
    email: String,
    #[serde(rename = "emailVerification", default)]
    email_verification: bool,
    #[serde(default)]
    labels: Vec<String>,
}

impl From<UserBody> for Account {
    fn from(u: UserBody) -> Self {
        Account {
            id: u.id,
            name: u.name,
            email: u.email,
            email_verified: u.email_verification,
            labels: u.labels,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SessionBody {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "userId")]
    user_id: String,
    #[serde(default)]
    secret: String,
}

#[derive(Debug, Clone)]
pub struct AppwriteAccounts {
    client: AppwriteClient,
}

impl AppwriteAccounts {
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }

    async fn send_unit(&self, req: reqwest::RequestBuilder) -> Result<(), AuthError> {
        self.client.send(req).await?;
        Ok(())
    }
}

#[async_trait]
impl AccountService for AppwriteAccounts {
    async fn current_account(&self, session: &str) -> Result<Account, AuthError> {
        let req = self
            .client
            .request(Method::GET, "account")
            .header(SESSION_HEADER, session);
        let user: UserBody = self.client.send_json(req).await?;
        Ok(user.into())
    }

    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Account, AuthError> {
        let req = self.client.request(Method::POST, "account").json(&json!({
            "userId": user_id,
            "email": email,
            "password": password,
            "name": name,
        }));
        let user: UserBody = self.client.send_json(req).await?;
        tracing::info!(user_id = %user.id, "account created");
        Ok(user.into())
    }

    async fn create_session(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        // The secret is only returned when the call carries the server key.
        let req = self
            .client
            .key_request(Method::POST, "account/sessions/email")?
            .json(&json!({ "email": email, "password": password }));
        let body: SessionBody = self.client.send_json(req).await.map_err(|e| match e {
            StorageError::Unauthorized(_) => AuthError::InvalidCredentials,
            other => AuthError::from(other),
        })?;
        if body.secret.is_empty() {
            return Err(AuthError::Backend(StorageError::UnexpectedResponse(
                "session created without a secret".to_string(),
            )));
        }
        Ok(Session {
            id: body.id,
            user_id: body.user_id,
            secret: body.secret,
        })
    }

    async fn delete_session(&self, session: &str) -> Result<(), AuthError> {
        let req = self
            .client
            .request(Method::DELETE, "account/sessions/current")
            .header(SESSION_HEADER, session);
        self.send_unit(req).await
    }

    async fn create_recovery(&self, email: &str, url: &str) -> Result<(), AuthError> {
        let req = self
            .client
            .request(Method::POST, "account/recovery")
            .json(&json!({ "email": email, "url": url }));
        self.send_unit(req).await
    }

    async fn confirm_recovery(&self, user_id: &str, secret: &str, password: &str) -> Result<(), AuthError> {
        let req = self.client.request(Method::PUT, "account/recovery").json(&json!({
            "userId": user_id,
            "secret": secret,
            "password": password,
        }));
        self.send_unit(req).await
    }

    async fn create_verification(&self, session: &str, url: &str) -> Result<(), AuthError> {
        let req = self
            .client
            .request(Method::POST, "account/verification")
            .header(SESSION_HEADER, session)
            .json(&json!({ "url": url }));
        self.send_unit(req).await
    }

    async fn confirm_verification(&self, user_id: &str, secret: &str) -> Result<(), AuthError> {
        let req = self
            .client
            .request(Method::PUT, "account/verification")
            .json(&json!({ "userId": user_id, "secret": secret }));
        self.send_unit(req).await
    }
}
