//! Order route handlers (require authentication).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use bazaar_core::OrderId;

use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Order placement request body.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub shipping_address: String,
}

/// `GET /orders` — the user's order history, newest first.
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(Json(orders))
}

/// `GET /orders/{id}` — one of the user's orders with its items.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let order = OrderRepository::new(state.pool())
        .get_for_user(user.id, OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    Ok(Json(order))
}

/// `POST /orders` — convert the cart into a pending order.
pub async fn place(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<impl IntoResponse> {
    if req.shipping_address.trim().is_empty() {
        return Err(AppError::BadRequest(
            "shipping_address must not be empty".to_owned(),
        ));
    }

    let order = OrderRepository::new(state.pool())
        .place_order(user.id, &req.shipping_address)
        .await?;

    tracing::info!(
        user_id = %user.id,
        order_id = %order.order.id,
        total = %order.order.total_price,
        "order placed"
    );

    Ok((StatusCode::CREATED, Json(order)))
}
