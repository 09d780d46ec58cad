//! Order repository, including the cart-to-order placement transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use bazaar_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

use super::RepositoryError;
use crate::models::order::{Order, OrderItem, OrderWithItems};

/// Errors specific to order placement.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The user's cart has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line asks for more units than the product has in stock.
    #[error("insufficient stock for product {product_id} ({name}): {available} available, {requested} requested")]
    InsufficientStock {
        product_id: ProductId,
        name: String,
        available: i32,
        requested: i32,
    },

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for OrderError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Internal row type for orders.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    status: String,
    total_price: Decimal,
    shipping_address: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<OrderStatus>()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Self {
            id: OrderId::new(row.id),
            user_id: UserId::new(row.user_id),
            status,
            total_price: row.total_price,
            shipping_address: row.shipping_address,
            created_at: row.created_at,
        })
    }
}

/// Internal row type for order items.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    product_id: i64,
    quantity: i32,
    price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            product_id: ProductId::new(row.product_id),
            quantity: row.quantity,
            price: row.price,
        }
    }
}

/// A cart line joined with live product price and stock, as loaded inside
/// the placement transaction.
#[derive(Debug, sqlx::FromRow)]
struct PricedLineRow {
    product_id: i64,
    product_name: String,
    quantity: i32,
    price: Decimal,
    stock: i32,
}

/// Check every loaded cart line and compute the order total.
///
/// Returns `EmptyCart` for a cart with no lines and `InsufficientStock`
/// for the first line whose quantity exceeds live stock. On success the
/// returned total is the sum of line price times quantity, at the prices
/// loaded inside the transaction.
fn validate_lines(lines: &[PricedLineRow]) -> Result<Decimal, OrderError> {
    if lines.is_empty() {
        return Err(OrderError::EmptyCart);
    }

    for line in lines {
        if line.stock < line.quantity {
            return Err(OrderError::InsufficientStock {
                product_id: ProductId::new(line.product_id),
                name: line.product_name.clone(),
                available: line.stock,
                requested: line.quantity,
            });
        }
    }

    Ok(lines
        .iter()
        .map(|line| line.price * Decimal::from(line.quantity))
        .sum())
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Convert the user's cart into a pending order, atomically.
    ///
    /// In one transaction: load the cart lines with live prices and stock,
    /// lock in the total, validate stock, insert the order and its
    /// price-at-purchase lines, decrement stock, and clear the cart. Any
    /// failure rolls the whole transaction back — no partial orders are
    /// observable.
    ///
    /// Runs at the pool's default isolation (READ COMMITTED). Two concurrent
    /// placements for the same product can both pass the stock check before
    /// either decrements; the `stock >= 0` CHECK constraint then aborts the
    /// later decrement instead of persisting negative stock. This lost-update
    /// window is a documented limitation, not handled with row locks here.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyCart` if the user has no cart lines.
    /// Returns `OrderError::InsufficientStock` on the first line whose
    /// quantity exceeds live stock.
    /// Returns `OrderError::Repository` for database errors.
    pub async fn place_order(
        &self,
        user_id: UserId,
        shipping_address: &str,
    ) -> Result<OrderWithItems, OrderError> {
        let mut tx = self.pool.begin().await?;

        // 1. Load cart lines with live product data.
        let lines = sqlx::query_as::<_, PricedLineRow>(
            "SELECT c.product_id, p.name AS product_name, c.quantity, p.price, p.stock
             FROM cart_items c
             JOIN products p ON p.id = c.product_id
             WHERE c.user_id = $1
             ORDER BY c.id",
        )
        .bind(user_id.as_i64())
        .fetch_all(&mut *tx)
        .await?;

        // 2. Validate every line and lock in the total before writing
        //    anything; a failure here leaves no rows to roll back.
        let total_price = validate_lines(&lines)?;

        // 3. Create the order in the pending state.
        let order_row = sqlx::query_as::<_, OrderRow>(
            "INSERT INTO orders (user_id, status, total_price, shipping_address)
             VALUES ($1, $2, $3, $4)
             RETURNING id, user_id, status, total_price, shipping_address, created_at",
        )
        .bind(user_id.as_i64())
        .bind(OrderStatus::Pending.to_string())
        .bind(total_price)
        .bind(shipping_address)
        .fetch_one(&mut *tx)
        .await?;

        // 4. Snapshot each line at the current price and decrement stock.
        let mut items = Vec::with_capacity(lines.len());
        for line in &lines {
            let item_row = sqlx::query_as::<_, OrderItemRow>(
                "INSERT INTO order_items (order_id, product_id, quantity, price)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, order_id, product_id, quantity, price",
            )
            .bind(order_row.id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.price)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query("UPDATE products SET stock = stock - $2 WHERE id = $1")
                .bind(line.product_id)
                .bind(line.quantity)
                .execute(&mut *tx)
                .await?;

            items.push(OrderItem::from(item_row));
        }

        // 5. The cart is consumed by the order.
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id.as_i64())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let order = Order::try_from(order_row)?;
        Ok(OrderWithItems { order, items })
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` on an unknown stored status.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, status, total_price, shipping_address, created_at
             FROM orders
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Order::try_from).collect()
    }

    /// Get one of the user's orders with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` on an unknown stored status.
    pub async fn get_for_user(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, user_id, status, total_price, shipping_address, created_at
             FROM orders
             WHERE id = $1 AND user_id = $2",
        )
        .bind(order_id.as_i64())
        .bind(user_id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let order = Order::try_from(row)?;

        let item_rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT id, order_id, product_id, quantity, price
             FROM order_items
             WHERE order_id = $1
             ORDER BY id",
        )
        .bind(order_id.as_i64())
        .fetch_all(self.pool)
        .await?;

        Ok(Some(OrderWithItems {
            order,
            items: item_rows.into_iter().map(Into::into).collect(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: i64, name: &str, quantity: i32, price: Decimal, stock: i32) -> PricedLineRow {
        PricedLineRow {
            product_id,
            product_name: name.to_string(),
            quantity,
            price,
            stock,
        }
    }

    #[test]
    fn total_is_sum_of_price_times_quantity() {
        // Two units at 10.00 plus one unit at 5.00 comes to 25.00.
        let lines = vec![
            line(1, "mug", 2, Decimal::new(10_00, 2), 10),
            line(2, "tote", 1, Decimal::new(5_00, 2), 3),
        ];

        assert_eq!(
            validate_lines(&lines).expect("lines are orderable"),
            Decimal::new(25_00, 2)
        );
    }

    #[test]
    fn empty_cart_is_rejected() {
        assert!(matches!(validate_lines(&[]), Err(OrderError::EmptyCart)));
    }

    #[test]
    fn quantity_equal_to_stock_is_allowed() {
        let lines = vec![line(1, "mug", 3, Decimal::new(10_00, 2), 3)];

        assert_eq!(
            validate_lines(&lines).expect("exact stock is orderable"),
            Decimal::new(30_00, 2)
        );
    }

    #[test]
    fn insufficient_stock_names_the_offending_line() {
        let lines = vec![
            line(1, "mug", 2, Decimal::new(10_00, 2), 10),
            line(7, "tote", 5, Decimal::new(5_00, 2), 3),
        ];

        match validate_lines(&lines) {
            Err(OrderError::InsufficientStock {
                product_id,
                name,
                available,
                requested,
            }) => {
                assert_eq!(product_id, ProductId::new(7));
                assert_eq!(name, "tote");
                assert_eq!(available, 3);
                assert_eq!(requested, 5);
            }
            other => panic!("expected InsufficientStock, got {other:?}"),
        }
    }
}
