//! In-process [`AccountService`] for local development and tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use firstdate_core::document::new_document_id;
use firstdate_core::models::account::{Account, Session};

use crate::error::AuthError;
use crate::service::AccountService;

#[derive(Debug, Clone)]
struct StoredUser {
    account: Account,
    password: String,
}

/// A link the service would have emailed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentLink {
    pub user_id: String,
    pub secret: String,
    pub url: String,
}

#[derive(Debug, Default)]
struct Inner {
    users: Vec<StoredUser>,
    /// Session secret → user id.
    sessions: HashMap<String, String>,
    recoveries: Vec<SentLink>,
    verifications: Vec<SentLink>,
}

#[derive(Debug, Default)]
pub struct MemoryAccounts {
    inner: Mutex<Inner>,
    calls: AtomicUsize,
}

impl MemoryAccounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user directly, e.g. an admin for local runs.
    pub fn insert_user(&self, account: Account, password: &str) {
        self.lock().users.push(StoredUser {
            account,
            password: password.to_string(),
        });
    }

    /// Number of trait calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn recovery_links(&self) -> Vec<SentLink> {
        self.lock().recoveries.clone()
    }

    pub fn verification_links(&self) -> Vec<SentLink> {
        self.lock().verifications.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn call(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.lock()
    }
}

impl Inner {
    fn user_for_session(&mut self, session: &str) -> Result<&mut StoredUser, AuthError> {
        let user_id = self.sessions.get(session).cloned().ok_or(AuthError::Unauthorized)?;
        self.users
            .iter_mut()
            .find(|u| u.account.id == user_id)
            .ok_or(AuthError::Unauthorized)
    }

    fn take_link(links: &mut Vec<SentLink>, user_id: &str, secret: &str) -> Result<(), AuthError> {
        let pos = links
            .iter()
            .position(|l| l.user_id == user_id && l.secret == secret)
            .ok_or(AuthError::Unauthorized)?;
        links.remove(pos);
        Ok(())
    }
}

#[async_trait]
impl AccountService for MemoryAccounts {
    async fn current_account(&self, session: &str) -> Result<Account, AuthError> {
        let mut inner = self.call();
        Ok(inner.user_for_session(session)?.account.clone())
    }

    async fn create_account(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Account, AuthError> {
        let mut inner = self.call();
        if inner
            .users
            .iter()
            .any(|u| u.account.id == user_id || u.account.email.eq_ignore_ascii_case(email))
        {
            return Err(AuthError::AlreadyExists);
        }
        let account = Account {
            id: user_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            email_verified: false,
            labels: Vec::new(),
        };
        inner.users.push(StoredUser {
            account: account.clone(),
            password: password.to_string(),
        });
        Ok(account)
    }

    async fn create_session(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let mut inner = self.call();
        let user_id = inner
            .users
            .iter()
            .find(|u| u.account.email.eq_ignore_ascii_case(email) && u.password == password)
            .map(|u| u.account.id.clone())
            .ok_or(AuthError::InvalidCredentials)?;
        let session = Session {
            id: new_document_id(),
            user_id: user_id.clone(),
            secret: new_document_id(),
        };
        inner.sessions.insert(session.secret.clone(), user_id);
        Ok(session)
    }

    async fn delete_session(&self, session: &str) -> Result<(), AuthError> {
        let mut inner = self.call();
        inner.sessions.remove(session).map(|_| ()).ok_or(AuthError::Unauthorized)
    }

    async fn create_recovery(&self, email: &str, url: &str) -> Result<(), AuthError> {
        let mut inner = self.call();
        let user_id = inner
            .users
            .iter()
            .find(|u| u.account.email.eq_ignore_ascii_case(email))
            .map(|u| u.account.id.clone());
        // Unknown addresses are accepted silently.
        if let Some(user_id) = user_id {
            inner.recoveries.push(SentLink {
                user_id,
                secret: new_document_id(),
                url: url.to_string(),
            });
        }
        Ok(())
    }

    async fn confirm_recovery(&self, user_id: &str, secret: &str, password: &str) -> Result<(), AuthError> {
        let mut inner = self.call();
        Inner::take_link(&mut inner.recoveries, user_id, secret)?;
        if let Some(user) = inner.users.iter_mut().find(|u| u.account.id == user_id) {
            user.password = password.to_string();
        }
        Ok(())
    }

    async fn create_verification(&self, session: &str, url: &str) -> Result<(), AuthError> {
        let mut inner = self.call();
        let user_id = inner.user_for_session(session)?.account.id.clone();
        inner.verifications.push(SentLink {
            user_id,
            secret: new_document_id(),
            url: url.to_string(),
        });
        Ok(())
    }

    async fn confirm_verification(&self, user_id: &str, secret: &str) -> Result<(), AuthError> {
        let mut inner = self.call();
        Inner::take_link(&mut inner.verifications, user_id, secret)?;
        if let Some(user) = inner.users.iter_mut().find(|u| u.account.id == user_id) {
            user.account.email_verified = true;
        }
        Ok(())
    }
}
