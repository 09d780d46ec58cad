//! Category route handlers.
//!
//! Reads are public; mutations are staff-only.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use bazaar_core::CategoryId;

use crate::db::catalog::CategoryRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireStaff;
use crate::state::AppState;

/// Category create/update request body.
#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    pub parent_id: Option<i64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

const fn default_true() -> bool {
    true
}

/// `GET /categories` — list all categories.
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let categories = CategoryRepository::new(state.pool()).list().await?;
    Ok(Json(categories))
}

/// `GET /categories/{id}` — category detail.
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let category = CategoryRepository::new(state.pool())
        .get(CategoryId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("category {id}")))?;

    Ok(Json(category))
}

/// `POST /categories` — create a category (staff).
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(_): RequireStaff,
    Json(req): Json<CategoryRequest>,
) -> Result<impl IntoResponse> {
    let category = CategoryRepository::new(state.pool())
        .create(&req.name, req.parent_id.map(CategoryId::new), req.is_active)
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// `PUT /categories/{id}` — replace a category (staff).
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(_): RequireStaff,
    Path(id): Path<i64>,
    Json(req): Json<CategoryRequest>,
) -> Result<impl IntoResponse> {
    let category = CategoryRepository::new(state.pool())
        .update(
            CategoryId::new(id),
            &req.name,
            req.parent_id.map(CategoryId::new),
            req.is_active,
        )
        .await?;

    Ok(Json(category))
}

/// `DELETE /categories/{id}` — delete a category (staff).
///
/// Child categories cascade; products are detached, not deleted.
pub async fn destroy(
    State(state): State<AppState>,
    RequireStaff(_): RequireStaff,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let deleted = CategoryRepository::new(state.pool())
        .delete(CategoryId::new(id))
        .await?;

    if !deleted {
        return Err(AppError::NotFound(format!("category {id}")));
    }

    Ok(StatusCode::NO_CONTENT)
}
