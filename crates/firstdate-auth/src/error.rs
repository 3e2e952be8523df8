use thiserror::Error;

use firstdate_core::validation::FieldError;
use firstdate_storage::error::StorageError;

pub const GENERIC_MESSAGE: &str = "Something went wrong. Please try again later.";
pub const INVALID_RESET_LINK: &str = "Invalid reset link. Please request a new one.";
pub const INVALID_VERIFICATION_LINK: &str = "Invalid verification link";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("form has {} invalid field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("an account with this email already exists")]
    AlreadyExists,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("not signed in")]
    Unauthorized,

    /// A recovery or verification link without its `userId` and `secret`.
    #[error("invalid link: {0}")]
    InvalidLink(&'static str),

    #[error("account backend error: {0}")]
    Backend(StorageError),
}

impl AuthError {
    /// The message shown to the person at the keyboard.
    pub fn user_message(&self) -> &str {
        match self {
            AuthError::Validation(_) => "Please correct the highlighted fields.",
            AuthError::AlreadyExists => "An account with this email already exists",
            AuthError::InvalidCredentials => "Invalid email or password",
            AuthError::Unauthorized => "Please sign in to continue.",
            AuthError::InvalidLink(message) => message,
            AuthError::Backend(_) => GENERIC_MESSAGE,
        }
    }
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        match err.kind() {
            Some("user_already_exists") => return AuthError::AlreadyExists,
            Some("user_invalid_credentials") => return AuthError::InvalidCredentials,
            _ => {}
        }
        match err {
            StorageError::Unauthorized(_) => AuthError::Unauthorized,
            other => AuthError::Backend(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(status: u16, kind: &str) -> StorageError {
        StorageError::Backend {
            status,
            kind: kind.to_string(),
            message: String::new(),
        }
    }

    #[test]
    fn backend_kinds_map_to_domain_errors() {
        assert!(matches!(
            AuthError::from(backend(409, "user_already_exists")),
            AuthError::AlreadyExists
        ));
        assert!(matches!(
            AuthError::from(backend(400, "user_invalid_credentials")),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(
            AuthError::from(StorageError::Unauthorized("no session".into())),
            AuthError::Unauthorized
        ));
        let other = AuthError::from(backend(500, "general_unknown"));
        assert_eq!(other.user_message(), GENERIC_MESSAGE);
    }
}
