//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use bazaar_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

/// A placed order.
///
/// `total_price` is computed once at placement and never recomputed.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(skip)]
    pub user_id: UserId,
    pub status: OrderStatus,
    pub total_price: Decimal,
    pub shipping_address: String,
    pub created_at: DateTime<Utc>,
}

/// A line on a placed order.
///
/// `price` is the unit price at time of purchase — later catalog price
/// changes never affect past orders.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    #[serde(skip)]
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
}

/// An order with its lines, as returned to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}
