//! Review repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bazaar_core::{ProductId, ReviewId, UserId};

use super::RepositoryError;
use crate::models::review::Review;

/// Internal row type for reviews.
#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: i64,
    user_id: i64,
    product_id: i64,
    rating: i16,
    comment: String,
    is_approved: bool,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Self {
            id: ReviewId::new(row.id),
            user_id: UserId::new(row.user_id),
            product_id: ProductId::new(row.product_id),
            rating: row.rating,
            comment: row.comment,
            is_approved: row.is_approved,
            created_at: row.created_at,
        }
    }
}

/// Repository for review database operations.
pub struct ReviewRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepository<'a> {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a review. Reviews start unapproved.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user already reviewed the
    /// product.
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        user_id: UserId,
        product_id: ProductId,
        rating: i16,
        comment: &str,
    ) -> Result<Review, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            "INSERT INTO reviews (user_id, product_id, rating, comment)
             VALUES ($1, $2, $3, $4)
             RETURNING id, user_id, product_id, rating, comment, is_approved, created_at",
        )
        .bind(user_id.as_i64())
        .bind(product_id.as_i64())
        .bind(rating)
        .bind(comment)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.is_unique_violation() {
                    return RepositoryError::Conflict(
                        "review already exists for this product".to_owned(),
                    );
                }
                if db_err.is_foreign_key_violation() {
                    return RepositoryError::NotFound;
                }
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// List reviews for a product, oldest first.
    ///
    /// Non-staff readers only see approved reviews.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_product(
        &self,
        product_id: ProductId,
        include_unapproved: bool,
    ) -> Result<Vec<Review>, RepositoryError> {
        let rows = sqlx::query_as::<_, ReviewRow>(
            "SELECT id, user_id, product_id, rating, comment, is_approved, created_at
             FROM reviews
             WHERE product_id = $1 AND (is_approved OR $2)
             ORDER BY created_at, id",
        )
        .bind(product_id.as_i64())
        .bind(include_unapproved)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Approve a review, making it visible to everyone.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the review doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn approve(&self, review_id: ReviewId) -> Result<Review, RepositoryError> {
        let row = sqlx::query_as::<_, ReviewRow>(
            "UPDATE reviews
             SET is_approved = TRUE
             WHERE id = $1
             RETURNING id, user_id, product_id, rating, comment, is_approved, created_at",
        )
        .bind(review_id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }
}
