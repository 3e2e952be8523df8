use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Label the backend attaches to accounts allowed into the admin panel.
pub const ADMIN_LABEL: &str = "admin";

/// A signed-in account as reported by the account collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl Account {
    pub fn is_admin(&self) -> bool {
        self.labels.iter().any(|l| l == ADMIN_LABEL)
    }
}

/// An authenticated session. `secret` is the opaque token passed back to the
/// backend on every subsequent call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub secret: String,
}
