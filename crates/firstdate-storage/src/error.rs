use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend rejected the caller's credentials (HTTP 401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("document not found: {0}")]
    NotFound(String),

    /// Any other error response. `kind` is the backend's machine-readable
    /// error type, e.g. `user_already_exists`.
    #[error("backend error {status} ({kind}): {message}")]
    Backend {
        status: u16,
        kind: String,
        message: String,
    },

    #[error("request failed: {0}")]
    Request(String),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("client config error: {0}")]
    Config(String),
}

impl StorageError {
    /// The backend's error type, when the failure came from an error response.
    pub fn kind(&self) -> Option<&str> {
        match self {
            StorageError::Backend { kind, .. } => Some(kind),
            _ => None,
        }
    }
}
