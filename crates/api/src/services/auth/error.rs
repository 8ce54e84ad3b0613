//! Authentication error types.

use thiserror::Error;

use super::TokenError;
use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] nearshop_core::EmailError),

    /// Invalid credentials (wrong password or vendor not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Bearer token missing, invalid, expired, or for an unknown vendor.
    #[error("not authenticated")]
    Unauthenticated,

    /// Vendor already exists.
    #[error("vendor already exists")]
    VendorAlreadyExists,

    /// Registration field failed validation.
    #[error("{0}")]
    Validation(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Token signing error.
    #[error("token error: {0}")]
    Token(#[from] TokenError),
}
