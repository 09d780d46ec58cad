//! Product route handlers.
//!
//! Reads (including full-text search) are public; mutations are staff-only.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use bazaar_core::{CategoryId, ProductId};

use crate::db::catalog::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireStaff;
use crate::models::ProductFilter;
use crate::state::AppState;

/// Query parameters for product listing.
///
/// `search` is a websearch-style full-text query; the attribute filters are
/// case-insensitive exact matches; the price bounds are inclusive.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub search: Option<String>,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub category_id: Option<i64>,
}

impl From<ProductListQuery> for ProductFilter {
    fn from(query: ProductListQuery) -> Self {
        Self {
            search: query.search,
            brand: query.brand,
            size: query.size,
            color: query.color,
            min_price: query.min_price,
            max_price: query.max_price,
            category_id: query.category_id.map(CategoryId::new),
        }
    }
}

/// Product create/update request body.
#[derive(Debug, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    pub price: Decimal,
    pub stock: i32,
    #[serde(default)]
    pub discount: Decimal,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub color: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    pub category_id: Option<i64>,
}

const fn default_true() -> bool {
    true
}

impl ProductRequest {
    fn validate(&self) -> Result<()> {
        if self.price < Decimal::ZERO {
            return Err(AppError::BadRequest("price must not be negative".to_owned()));
        }
        if self.stock < 0 {
            return Err(AppError::BadRequest("stock must not be negative".to_owned()));
        }
        Ok(())
    }

    fn into_input(self) -> crate::models::catalog::ProductInput {
        crate::models::catalog::ProductInput {
            name: self.name,
            price: self.price,
            stock: self.stock,
            discount: self.discount,
            brand: self.brand,
            size: self.size,
            color: self.color,
            is_active: self.is_active,
            short_description: self.short_description,
            long_description: self.long_description,
            category_id: self.category_id.map(CategoryId::new),
        }
    }
}

/// `GET /products` — list products, optionally filtered and searched.
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<impl IntoResponse> {
    let filter = ProductFilter::from(query);
    let products = ProductRepository::new(state.pool()).list(&filter).await?;

    Ok(Json(products))
}

/// `GET /products/{id}` — product detail.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    Ok(Json(product))
}

/// `POST /products` — create a product (staff).
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(_): RequireStaff,
    Json(req): Json<ProductRequest>,
) -> Result<impl IntoResponse> {
    req.validate()?;

    let product = ProductRepository::new(state.pool())
        .create(&req.into_input())
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /products/{id}` — replace a product (staff).
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(_): RequireStaff,
    Path(id): Path<i64>,
    Json(req): Json<ProductRequest>,
) -> Result<impl IntoResponse> {
    req.validate()?;

    let product = ProductRepository::new(state.pool())
        .update(ProductId::new(id), &req.into_input())
        .await?;

    Ok(Json(product))
}

/// `DELETE /products/{id}` — delete a product (staff).
pub async fn destroy(
    State(state): State<AppState>,
    RequireStaff(_): RequireStaff,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let deleted = ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound(format!("product {id}")));
    }

    Ok(StatusCode::NO_CONTENT)
}
