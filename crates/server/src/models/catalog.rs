//! Catalog domain types: categories and products.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use bazaar_core::{CategoryId, ProductId};

/// A catalog category. Categories form a tree via `parent_id`.
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: CategoryId,
    /// Unique category name.
    pub name: String,
    /// Parent category; deleting the parent cascades to children.
    pub parent_id: Option<CategoryId>,
    pub is_active: bool,
}

/// A catalog product.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Live unit price. Orders snapshot this at placement time.
    pub price: Decimal,
    /// Units on hand. Never negative (enforced by a CHECK constraint).
    pub stock: i32,
    pub discount: Decimal,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub is_active: bool,
    pub short_description: String,
    pub long_description: String,
    /// Nulled (not cascaded) when the category is deleted.
    pub category_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating or replacing a product.
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    pub discount: Decimal,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub is_active: bool,
    pub short_description: String,
    pub long_description: String,
    pub category_id: Option<CategoryId>,
}

/// Query-side filters for product listing.
///
/// `search` runs against the weighted tsvector column and orders results by
/// rank; the attribute filters match case-insensitively; the price bounds
/// are inclusive.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub category_id: Option<CategoryId>,
}

impl ProductFilter {
    /// True when no filter is set and listing can skip the WHERE clause.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.brand.is_none()
            && self.size.is_none()
            && self.color.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
            && self.category_id.is_none()
    }
}
