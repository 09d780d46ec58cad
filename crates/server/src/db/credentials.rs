//! Repository for time-bound credentials: two-factor codes and reset tokens.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use bazaar_core::{ResetTokenId, TwoFactorCodeId, UserId};

use super::RepositoryError;
use crate::models::credential::{PasswordResetToken, TwoFactorCode};

/// Internal row type for two-factor codes.
#[derive(Debug, sqlx::FromRow)]
struct TwoFactorCodeRow {
    id: i64,
    user_id: i64,
    code: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<TwoFactorCodeRow> for TwoFactorCode {
    fn from(row: TwoFactorCodeRow) -> Self {
        Self {
            id: TwoFactorCodeId::new(row.id),
            user_id: UserId::new(row.user_id),
            code: row.code,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

/// Internal row type for reset tokens.
#[derive(Debug, sqlx::FromRow)]
struct ResetTokenRow {
    id: i64,
    user_id: i64,
    token: Uuid,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<ResetTokenRow> for PasswordResetToken {
    fn from(row: ResetTokenRow) -> Self {
        Self {
            id: ResetTokenId::new(row.id),
            user_id: UserId::new(row.user_id),
            token: row.token,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

/// Repository for credential database operations.
pub struct CredentialRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CredentialRepository<'a> {
    /// Create a new credential repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a two-factor code with its expiry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create_two_factor_code(
        &self,
        user_id: UserId,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<TwoFactorCode, RepositoryError> {
        let row = sqlx::query_as::<_, TwoFactorCodeRow>(
            "INSERT INTO two_factor_codes (user_id, code, expires_at)
             VALUES ($1, $2, $3)
             RETURNING id, user_id, code, created_at, expires_at",
        )
        .bind(user_id.as_i64())
        .bind(code)
        .bind(expires_at)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Find the most recently created code matching the submitted value.
    ///
    /// Ordering is creation timestamp descending with ID descending as a
    /// deterministic tie-break for identical timestamps.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn latest_matching_code(
        &self,
        user_id: UserId,
        code: &str,
    ) -> Result<Option<TwoFactorCode>, RepositoryError> {
        let row = sqlx::query_as::<_, TwoFactorCodeRow>(
            "SELECT id, user_id, code, created_at, expires_at
             FROM two_factor_codes
             WHERE user_id = $1 AND code = $2
             ORDER BY created_at DESC, id DESC
             LIMIT 1",
        )
        .bind(user_id.as_i64())
        .bind(code)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Persist a password-reset token with its expiry.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the token value already exists
    /// (UUID collision, practically unreachable).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_reset_token(
        &self,
        user_id: UserId,
        token: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<PasswordResetToken, RepositoryError> {
        let row = sqlx::query_as::<_, ResetTokenRow>(
            "INSERT INTO password_reset_tokens (user_id, token, expires_at)
             VALUES ($1, $2, $3)
             RETURNING id, user_id, token, created_at, expires_at",
        )
        .bind(user_id.as_i64())
        .bind(token)
        .bind(expires_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique_violation(e, "reset token"))?;

        Ok(row.into())
    }

    /// Look up a reset token by its opaque value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_reset_token(
        &self,
        token: Uuid,
    ) -> Result<Option<PasswordResetToken>, RepositoryError> {
        let row = sqlx::query_as::<_, ResetTokenRow>(
            "SELECT id, user_id, token, created_at, expires_at
             FROM password_reset_tokens
             WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a reset token, enforcing single use.
    ///
    /// # Returns
    ///
    /// Returns `true` if the token was deleted, `false` if it was already gone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_reset_token(&self, id: ResetTokenId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM password_reset_tokens WHERE id = $1")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
