//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::docstore::DocumentStoreError;
use crate::services::auth::AuthError;
use crate::services::token::TokenError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Record store operation failed.
    #[error("repository error: {0}")]
    Database(#[from] RepositoryError),

    /// Document store operation failed.
    #[error("document store error: {0}")]
    Documents(#[from] DocumentStoreError),

    /// Authentication operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Bearer token absent or invalid.
    #[error("unauthenticated")]
    Unauthenticated,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is the server's fault and worth capturing.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Database(e) => !matches!(e, RepositoryError::NotFound | RepositoryError::Conflict(_)),
            Self::Documents(_) | Self::Internal(_) => true,
            Self::Auth(e) => matches!(
                e,
                AuthError::PasswordHash
                    | AuthError::Token(TokenError::Signing)
                    | AuthError::Repository(_)
            ),
            _ => false,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Database(e) => repository_status(e),
            Self::Documents(DocumentStoreError::Backend(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Documents(DocumentStoreError::Serialization(_)) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Auth(e) => match e {
                AuthError::InvalidCredentials | AuthError::Token(TokenError::Invalid) => {
                    StatusCode::UNAUTHORIZED
                }
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_)
                | AuthError::InvalidUsername(_)
                | AuthError::InvalidEmail(_) => StatusCode::BAD_REQUEST,
                AuthError::PasswordHash | AuthError::Token(TokenError::Signing) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                AuthError::Repository(e) => repository_status(e),
            },
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Client-facing message. Internal details never leak.
    fn message(&self) -> String {
        match self {
            Self::Database(e) => match e {
                RepositoryError::NotFound => "Not found".to_owned(),
                RepositoryError::Conflict(_) => "Already exists".to_owned(),
                _ => "Service unavailable".to_owned(),
            },
            Self::Documents(_) => "Service unavailable".to_owned(),
            Self::Internal(_) => "Internal server error".to_owned(),
            Self::Auth(e) => match e {
                AuthError::InvalidCredentials | AuthError::Token(TokenError::Invalid) => {
                    "Incorrect username or password".to_owned()
                }
                AuthError::UserAlreadyExists => {
                    "A user with this username or email already exists".to_owned()
                }
                AuthError::WeakPassword(msg) => msg.clone(),
                AuthError::InvalidUsername(e) => e.to_string(),
                AuthError::InvalidEmail(e) => e.to_string(),
                AuthError::Repository(_) => "Service unavailable".to_owned(),
                _ => "Authentication error".to_owned(),
            },
            Self::Unauthenticated => "Not authenticated".to_owned(),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::BadRequest(msg) => format!("Bad request: {msg}"),
        }
    }
}

fn repository_status(e: &RepositoryError) -> StatusCode {
    match e {
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict(_) => StatusCode::CONFLICT,
        RepositoryError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
        RepositoryError::DataCorruption(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (self.status(), self.message()).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
