//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during seller authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] orbit_market_core::EmailError),

    /// No seller registered under the given email.
    #[error("seller not found")]
    SellerNotFound,

    /// Password hash did not match.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A seller with this email already exists.
    #[error("seller already exists")]
    SellerAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
