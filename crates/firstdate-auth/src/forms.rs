//! Account form schemas, checked before any backend call.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use firstdate_core::validation::FieldError;

use crate::error::{AuthError, INVALID_RESET_LINK, INVALID_VERIFICATION_LINK};

pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_PASSWORD_CHARS: usize = 8;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+$").expect("email pattern is valid")
});

/// Which email domains may hold an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailPolicy {
    pub domains: Vec<String>,
}

impl Default for EmailPolicy {
    fn default() -> Self {
        Self {
            domains: vec!["warwick.ac.uk".to_string(), "live.warwick.ac.uk".to_string()],
        }
    }
}

impl EmailPolicy {
    fn check(&self, email: &str, errors: &mut Vec<FieldError>) {
        if !EMAIL_PATTERN.is_match(email) {
            errors.push(FieldError::new("email", "Invalid email address"));
            return;
        }
        let domain = email.rsplit('@').next().unwrap_or_default().to_ascii_lowercase();
        if !self.domains.iter().any(|d| d.eq_ignore_ascii_case(&domain)) {
            errors.push(FieldError::new("email", "Please use your Warwick University email"));
        }
    }
}

fn check_password(field: &str, password: &str, errors: &mut Vec<FieldError>) {
    let rules: [(bool, &str); 4] = [
        (
            password.chars().count() >= MIN_PASSWORD_CHARS,
            "Password must be at least 8 characters",
        ),
        (
            password.chars().any(|c| c.is_ascii_uppercase()),
            "Password must contain at least one uppercase letter",
        ),
        (
            password.chars().any(|c| c.is_ascii_lowercase()),
            "Password must contain at least one lowercase letter",
        ),
        (
            password.chars().any(|c| c.is_ascii_digit()),
            "Password must contain at least one number",
        ),
    ];
    if let Some((_, message)) = rules.iter().find(|(ok, _)| !ok) {
        errors.push(FieldError::new(field, *message));
    }
}

fn check_confirmation(password: &str, confirm: &str, errors: &mut Vec<FieldError>) {
    if password != confirm {
        errors.push(FieldError::new("confirmPassword", "Passwords don't match"));
    }
}

fn finish(errors: Vec<FieldError>) -> Result<(), AuthError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation(errors))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self, policy: &EmailPolicy) -> Result<(), AuthError> {
        let mut errors = Vec::new();
        if self.name.trim().chars().count() < MIN_NAME_CHARS {
            errors.push(FieldError::new("name", "Name must be at least 2 characters"));
        }
        policy.check(self.email.trim(), &mut errors);
        check_password("password", &self.password, &mut errors);
        check_confirmation(&self.password, &self.confirm_password, &mut errors);
        finish(errors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    /// Only the length rule applies at sign-in.
    pub fn validate(&self, policy: &EmailPolicy) -> Result<(), AuthError> {
        let mut errors = Vec::new();
        policy.check(self.email.trim(), &mut errors);
        if self.password.chars().count() < MIN_PASSWORD_CHARS {
            errors.push(FieldError::new("password", "Password must be at least 8 characters"));
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RecoveryRequestForm {
    pub email: String,
}

impl RecoveryRequestForm {
    pub fn validate(&self, policy: &EmailPolicy) -> Result<(), AuthError> {
        let mut errors = Vec::new();
        policy.check(self.email.trim(), &mut errors);
        finish(errors)
    }
}

/// Recovery link parameters plus the new password.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RecoveryConfirmForm {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

impl RecoveryConfirmForm {
    /// Returns the link's `(user_id, secret)` once everything checks out.
    pub fn validate(&self) -> Result<(&str, &str), AuthError> {
        let link = link_params(&self.user_id, &self.secret).ok_or(AuthError::InvalidLink(INVALID_RESET_LINK))?;
        let mut errors = Vec::new();
        check_password("password", &self.password, &mut errors);
        check_confirmation(&self.password, &self.confirm_password, &mut errors);
        finish(errors)?;
        Ok(link)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct VerificationConfirmForm {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub secret: Option<String>,
}

impl VerificationConfirmForm {
    pub fn validate(&self) -> Result<(&str, &str), AuthError> {
        link_params(&self.user_id, &self.secret).ok_or(AuthError::InvalidLink(INVALID_VERIFICATION_LINK))
    }
}

fn link_params<'a>(user_id: &'a Option<String>, secret: &'a Option<String>) -> Option<(&'a str, &'a str)> {
    let user_id = user_id.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
    let secret = secret.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
    Some((user_id, secret))
}
