//! Cart domain types.

use rust_decimal::Decimal;
use serde::Serialize;

use bazaar_core::{CartItemId, ProductId, UserId};

/// A cart line joined with live product data for display.
///
/// `unit_price` and `line_total` reflect the *live* product price; the price
/// is only locked in at order placement.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    pub id: CartItemId,
    #[serde(skip)]
    pub user_id: UserId,
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}
