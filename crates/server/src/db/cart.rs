//! Cart repository.
//!
//! One line per (user, product), enforced by a unique constraint. Adding a
//! product already in the cart increments the existing line instead of
//! creating a second one.

use rust_decimal::Decimal;
use sqlx::PgPool;

use bazaar_core::{CartItemId, ProductId, UserId};

use super::RepositoryError;
use crate::models::cart::CartLine;

/// Internal row type for cart lines joined with product data.
#[derive(Debug, sqlx::FromRow)]
struct CartLineRow {
    id: i64,
    user_id: i64,
    product_id: i64,
    product_name: String,
    quantity: i32,
    unit_price: Decimal,
}

impl From<CartLineRow> for CartLine {
    fn from(row: CartLineRow) -> Self {
        let unit_price = row.unit_price;
        Self {
            id: CartItemId::new(row.id),
            user_id: UserId::new(row.user_id),
            product_id: ProductId::new(row.product_id),
            product_name: row.product_name,
            quantity: row.quantity,
            unit_price,
            line_total: unit_price * Decimal::from(row.quantity),
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a user's cart lines with live product names and prices.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartLineRow>(
            "SELECT c.id, c.user_id, c.product_id, p.name AS product_name, c.quantity,
                    p.price AS unit_price
             FROM cart_items c
             JOIN products p ON p.id = c.product_id
             WHERE c.user_id = $1
             ORDER BY c.id",
        )
        .bind(user_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Add a product to the cart, merging into an existing line if present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartLine, RepositoryError> {
        let row = sqlx::query_as::<_, CartLineRow>(
            "WITH upserted AS (
                 INSERT INTO cart_items (user_id, product_id, quantity)
                 VALUES ($1, $2, $3)
                 ON CONFLICT (user_id, product_id)
                 DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
                 RETURNING id, user_id, product_id, quantity
             )
             SELECT u.id, u.user_id, u.product_id, p.name AS product_name, u.quantity,
                    p.price AS unit_price
             FROM upserted u
             JOIN products p ON p.id = u.product_id",
        )
        .bind(user_id.as_i64())
        .bind(product_id.as_i64())
        .bind(quantity)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Set the quantity on an existing cart line owned by the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the line doesn't exist or
    /// belongs to another user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_quantity(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        quantity: i32,
    ) -> Result<CartLine, RepositoryError> {
        let row = sqlx::query_as::<_, CartLineRow>(
            "WITH updated AS (
                 UPDATE cart_items
                 SET quantity = $3
                 WHERE id = $1 AND user_id = $2
                 RETURNING id, user_id, product_id, quantity
             )
             SELECT u.id, u.user_id, u.product_id, p.name AS product_name, u.quantity,
                    p.price AS unit_price
             FROM updated u
             JOIN products p ON p.id = u.product_id",
        )
        .bind(item_id.as_i64())
        .bind(user_id.as_i64())
        .bind(quantity)
        .fetch_optional(self.pool)
        .await?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Remove a cart line owned by the user.
    ///
    /// # Returns
    ///
    /// Returns `true` if the line was removed, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove(
        &self,
        user_id: UserId,
        item_id: CartItemId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
            .bind(item_id.as_i64())
            .bind(user_id.as_i64())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
