//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::mailer::MailerError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] bazaar_core::EmailError),

    /// Invalid mobile number format.
    #[error("invalid mobile number: {0}")]
    InvalidMobile(#[from] bazaar_core::MobileError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// Username, mobile number, or invite code already taken.
    #[error("user already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// No two-factor code matches the submitted value.
    #[error("two-factor code not found")]
    CodeNotFound,

    /// The matched two-factor code is past its expiry.
    #[error("two-factor code expired")]
    CodeExpired,

    /// No reset token matches the submitted value (possibly already used).
    #[error("reset token not found")]
    TokenNotFound,

    /// The reset token is past its expiry.
    #[error("reset token expired")]
    TokenExpired,

    /// Email delivery failed; the triggering operation is considered failed.
    #[error("delivery failed: {0}")]
    Delivery(#[from] MailerError),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
