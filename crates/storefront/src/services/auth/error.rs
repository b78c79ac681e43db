//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] estore_core::EmailError),

    /// Display name missing.
    #[error("name is required")]
    MissingName,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User already exists.
    #[error("user already exists")]
    UserAlreadyExists,

    /// No bearer token, or a token that was never issued or was revoked.
    #[error("missing or invalid access token")]
    InvalidToken,

    /// The bearer token is past its expiry.
    #[error("access token expired")]
    TokenExpired,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// The configured token lifetime puts the expiry out of range.
    #[error("token lifetime out of range")]
    TokenLifetime,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
