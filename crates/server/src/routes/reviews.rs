//! Review route handlers.
//!
//! Reviews are submitted by logged-in users and hidden until a staff member
//! approves them. Staff see unapproved reviews in listings.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use bazaar_core::{ProductId, ReviewId};

use crate::db::catalog::ProductRepository;
use crate::db::reviews::ReviewRepository;
use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, RequireAuth, RequireStaff};
use crate::state::AppState;

/// Review submission request body.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub rating: i16,
    #[serde(default)]
    pub comment: String,
}

/// `GET /products/{id}/reviews` — approved reviews for a product.
///
/// Staff also see unapproved reviews.
pub async fn index(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(product_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let product_id = ProductId::new(product_id);

    // Listing reviews of a missing product is a 404, not an empty list.
    ProductRepository::new(state.pool())
        .get(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let include_unapproved = user.is_some_and(|u| u.is_staff);
    let reviews = ReviewRepository::new(state.pool())
        .list_for_product(product_id, include_unapproved)
        .await?;

    Ok(Json(reviews))
}

/// `POST /products/{id}/reviews` — submit a review (one per user/product).
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(product_id): Path<i64>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse> {
    if !(1..=5).contains(&req.rating) {
        return Err(AppError::BadRequest(
            "rating must be between 1 and 5".to_owned(),
        ));
    }

    let review = ReviewRepository::new(state.pool())
        .create(user.id, ProductId::new(product_id), req.rating, &req.comment)
        .await?;

    Ok((StatusCode::CREATED, Json(review)))
}

/// `POST /reviews/{id}/approve` — approve a review (staff).
pub async fn approve(
    State(state): State<AppState>,
    RequireStaff(_): RequireStaff,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let review = ReviewRepository::new(state.pool())
        .approve(ReviewId::new(id))
        .await?;

    Ok(Json(review))
}
