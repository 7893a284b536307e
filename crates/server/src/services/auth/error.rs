//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::error::AppError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] bluedrop_core::EmailError),

    /// Invalid credentials (wrong password or account not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Account already exists for this email.
    #[error("account already exists")]
    AccountAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Invite code unknown, consumed, or issued for a different email.
    #[error("invalid invite: {0}")]
    InvalidInvite(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => {
                Self::Unauthorized("Invalid email or password".to_owned())
            }
            AuthError::AccountAlreadyExists => {
                Self::Conflict("An account with this email already exists".to_owned())
            }
            AuthError::InvalidEmail(e) => Self::Validation(e.to_string()),
            AuthError::WeakPassword(msg) | AuthError::InvalidInvite(msg) => Self::Validation(msg),
            AuthError::Repository(e) => Self::Database(e),
            AuthError::PasswordHash => Self::Internal("password hashing failed".to_owned()),
        }
    }
}
