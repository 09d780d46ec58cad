//! Database operations for the Bazaar `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `users` / `user_passwords` - Accounts and their password hashes
//! - `two_factor_codes` - Short-lived login codes (10 minute expiry)
//! - `password_reset_tokens` - Single-use reset tokens (1 hour expiry)
//! - `categories` / `products` - Catalog (products carry a tsvector column)
//! - `cart_items` - One line per (user, product)
//! - `orders` / `order_items` - Immutable orders with price-at-purchase lines
//! - `reviews` - One review per (user, product), approval-gated
//! - `tower_sessions.session` - Session store (created by the session layer)
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p bazaar-cli -- migrate
//! ```
//!
//! All queries use the runtime sqlx API (`query`, `query_as`, `QueryBuilder`)
//! with `FromRow` row structs, so the workspace builds without a live
//! database.

pub mod cart;
pub mod catalog;
pub mod credentials;
pub mod orders;
pub mod reviews;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors returned by repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// No row matched the operation.
    #[error("not found")]
    NotFound,

    /// A unique constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored value failed domain validation on the way out.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl RepositoryError {
    /// Map a sqlx error to `Conflict` when it is a unique violation,
    /// otherwise wrap it as `Database`.
    pub(crate) fn from_unique_violation(e: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(format!("{what} already exists"));
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
