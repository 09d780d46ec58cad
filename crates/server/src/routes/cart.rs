//! Cart route handlers (require authentication).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use bazaar_core::{CartItemId, ProductId};

use crate::db::cart::CartRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: i64,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

/// Quantity update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

const fn default_quantity() -> i32 {
    1
}

fn validate_quantity(quantity: i32) -> Result<()> {
    if quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be positive".to_owned(),
        ));
    }
    Ok(())
}

/// `GET /cart` — list the user's cart lines with live prices.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let lines = CartRepository::new(state.pool()).list(user.id).await?;
    Ok(Json(lines))
}

/// `POST /cart/items` — add a product, merging into an existing line.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<AddToCartRequest>,
) -> Result<impl IntoResponse> {
    validate_quantity(req.quantity)?;

    let line = CartRepository::new(state.pool())
        .add(user.id, ProductId::new(req.product_id), req.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(line)))
}

/// `PUT /cart/items/{id}` — set the quantity on a cart line.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
    Json(req): Json<UpdateQuantityRequest>,
) -> Result<impl IntoResponse> {
    validate_quantity(req.quantity)?;

    let line = CartRepository::new(state.pool())
        .update_quantity(user.id, CartItemId::new(id), req.quantity)
        .await?;

    Ok(Json(line))
}

/// `DELETE /cart/items/{id}` — remove a cart line.
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let removed = CartRepository::new(state.pool())
        .remove(user.id, CartItemId::new(id))
        .await?;

    if !removed {
        return Err(AppError::NotFound(format!("cart item {id}")));
    }

    Ok(StatusCode::NO_CONTENT)
}
