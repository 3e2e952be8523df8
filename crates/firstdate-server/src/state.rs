use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use jiff::Timestamp;
use serde::Serialize;
use ts_rs::TS;

use firstdate_auth::appwrite::AppwriteAccounts;
use firstdate_auth::forms::EmailPolicy;
use firstdate_auth::memory::MemoryAccounts;
use firstdate_auth::service::AccountService;
use firstdate_core::document::Document;
use firstdate_core::models::account::{Account, ADMIN_LABEL};
use firstdate_questionnaire::{QuestionnaireSettings, Wizard};
use firstdate_storage::client::AppwriteClient;
use firstdate_storage::documents::{AppwriteDocuments, CollectionRef, DocumentStore};
use firstdate_storage::error::StorageError;
use firstdate_storage::memory::MemoryStore;
use firstdate_storage::pagination::Progress;

use crate::config::{BackendKind, Config, DevAdmin};

/// One in-progress questionnaire per account.
pub type Drafts = Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<Wizard>>>>>;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub documents: Arc<dyn DocumentStore>,
    pub accounts: Arc<dyn AccountService>,
    pub collection: CollectionRef,
    pub email_policy: EmailPolicy,
    pub settings: QuestionnaireSettings,
    pub origin: String,
    pub page_size: usize,
    pub drafts: Drafts,
    pub responses: Arc<Mutex<ResponseCache>>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Result<Self, StorageError> {
        let (documents, accounts): (Arc<dyn DocumentStore>, Arc<dyn AccountService>) = match config.backend {
            BackendKind::Appwrite => {
                let appwrite = config
                    .appwrite
                    .clone()
                    .ok_or_else(|| StorageError::Config("appwrite settings missing".to_string()))?;
                let client = AppwriteClient::new(appwrite)?;
                (
                    Arc::new(AppwriteDocuments::new(client.clone())),
                    Arc::new(AppwriteAccounts::new(client)),
                )
            }
            BackendKind::Memory => {
                let accounts = MemoryAccounts::new();
                if let Some(admin) = &config.dev_admin {
                    seed_admin(&accounts, admin);
                }
                (Arc::new(MemoryStore::new()), Arc::new(accounts))
            }
        };

        Ok(Self::new(documents, accounts, config))
    }

    pub fn new(documents: Arc<dyn DocumentStore>, accounts: Arc<dyn AccountService>, config: &Config) -> Self {
        Self {
            documents,
            accounts,
            collection: config.questionnaire_collection.clone(),
            email_policy: config.email_policy.clone(),
            settings: config.questionnaire.clone(),
            origin: config.origin.clone(),
            page_size: config.page_size,
            drafts: Drafts::default(),
            responses: Arc::default(),
        }
    }

    /// The account's wizard, created on first use.
    pub fn draft(&self, account_id: &str) -> Arc<tokio::sync::Mutex<Wizard>> {
        let mut drafts = self.drafts.lock().unwrap_or_else(|e| e.into_inner());
        drafts
            .entry(account_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(Wizard::new(self.settings.clone()))))
            .clone()
    }

    pub fn discard_draft(&self, account_id: &str) {
        self.drafts.lock().unwrap_or_else(|e| e.into_inner()).remove(account_id);
    }

    pub fn responses(&self) -> std::sync::MutexGuard<'_, ResponseCache> {
        self.responses.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn seed_admin(accounts: &MemoryAccounts, admin: &DevAdmin) {
    accounts.insert_user(
        Account {
            id: "dev-admin".to_string(),
            name: "Local Admin".to_string(),
            email: admin.email.clone(),
            email_verified: true,
            labels: vec![ADMIN_LABEL.to_string()],
        },
        &admin.password,
    );
    tracing::info!(email = %admin.email, "seeded local admin account");
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(tag = "state", rename_all = "snake_case")]
#[ts(export)]
pub enum RefreshStatus {
    Idle,
    Running { current: usize, total: u64 },
    Failed { message: String },
}

/// Responses loaded for the admin page.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    pub records: Vec<Document>,
    pub loaded_at: Option<Timestamp>,
    pub status: RefreshStatus,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            loaded_at: None,
            status: RefreshStatus::Idle,
        }
    }
}

impl ResponseCache {
    pub fn is_refreshing(&self) -> bool {
        matches!(self.status, RefreshStatus::Running { .. })
    }

    pub fn set_progress(&mut self, progress: Progress) {
        self.status = RefreshStatus::Running {
            current: progress.current,
            total: progress.total,
        };
    }
}
