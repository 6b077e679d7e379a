//! Authentication error types.

use thiserror::Error;

use parcelhub_core::{EmailError, UsernameError};

use crate::db::RepositoryError;
use crate::services::password::PasswordHashError;
use crate::services::token::TokenError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username unknown or password mismatch. One variant for both, so the
    /// response never reveals which part was wrong.
    #[error("incorrect username or password")]
    InvalidCredentials,

    /// The username or email is already registered.
    #[error("user already exists")]
    UserAlreadyExists,

    /// The password does not meet the minimum requirements.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// The username failed validation.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    /// The email failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Password hashing failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Token issuance failed.
    #[error(transparent)]
    Token(#[from] TokenError),

    /// The record store failed.
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<PasswordHashError> for AuthError {
    fn from(_: PasswordHashError) -> Self {
        Self::PasswordHash
    }
}
