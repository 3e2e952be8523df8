use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use firstdate_auth::error::{AuthError, GENERIC_MESSAGE};
use firstdate_core::validation::FieldError;
use firstdate_export::ExportError;
use firstdate_questionnaire::error::QuestionnaireError;
use firstdate_questionnaire::submit::SubmitError;
use firstdate_questionnaire::wizard::SubmitFailure;
use firstdate_storage::error::StorageError;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    /// Field-scoped input problems.
    Validation(Vec<FieldError>),
    Unauthorized(String),
    Forbidden(String),
    NotFound(String),
    /// The request clashes with stored state; the message is specific.
    Conflict(String),
    BadRequest(String),
    /// The backend failed or could not be reached. Detail is logged, not
    /// returned.
    Backend(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldError>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, fields) = match self {
            ApiError::Validation(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Please correct the highlighted fields.".to_string(),
                fields,
            ),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, Vec::new()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg, Vec::new()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, Vec::new()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg, Vec::new()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, Vec::new()),
            ApiError::Backend(detail) => {
                tracing::error!("backend error: {detail}");
                (StatusCode::BAD_GATEWAY, GENERIC_MESSAGE.to_string(), Vec::new())
            }
            ApiError::Internal(detail) => {
                tracing::error!("internal error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                    Vec::new(),
                )
            }
        };

        (status, Json(ErrorBody { error: message, fields })).into_response()
    }
}

impl ApiError {
    pub fn sign_in_required() -> Self {
        ApiError::Unauthorized("Please sign in to continue.".to_string())
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Unauthorized(_) => ApiError::sign_in_required(),
            StorageError::Config(msg) => ApiError::Internal(msg),
            other => ApiError::Backend(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        let message = e.user_message().to_string();
        match e {
            AuthError::Validation(fields) => ApiError::Validation(fields),
            AuthError::AlreadyExists => ApiError::Conflict(message),
            AuthError::InvalidCredentials | AuthError::Unauthorized => ApiError::Unauthorized(message),
            AuthError::InvalidLink(_) => ApiError::BadRequest(message),
            AuthError::Backend(inner) => ApiError::from(inner),
        }
    }
}

impl From<QuestionnaireError> for ApiError {
    fn from(e: QuestionnaireError) -> Self {
        match e {
            QuestionnaireError::UnknownField(key) => {
                ApiError::Validation(vec![FieldError::new(key, "Unknown question")])
            }
            QuestionnaireError::Validation(step) => ApiError::Validation(step.errors),
            QuestionnaireError::NotAtFinalStep(_) | QuestionnaireError::InvalidTransition { .. } => {
                ApiError::Conflict(e.to_string())
            }
        }
    }
}

impl From<SubmitError> for ApiError {
    fn from(e: SubmitError) -> Self {
        match (e.failure(), e) {
            (_, SubmitError::Wizard(inner)) => ApiError::from(inner),
            (Some(SubmitFailure::Unauthenticated), _) => {
                ApiError::Unauthorized(SubmitFailure::Unauthenticated.message().to_string())
            }
            (Some(SubmitFailure::AlreadySubmitted), _) => {
                ApiError::Conflict(SubmitFailure::AlreadySubmitted.message().to_string())
            }
            (_, other) => ApiError::Backend(other.to_string()),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::NoRecords => ApiError::Conflict("There are no responses to export yet.".to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}
