//! Account route handlers (require authentication).

use axum::{Json, extract::State, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use bazaar_core::{Email, Mobile};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::user::ProfileUpdate;
use crate::services::auth::{AuthError, AuthService};
use crate::state::AppState;

/// Profile update request body. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Password change request body.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// `GET /account` — the logged-in user's profile.
pub async fn profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), state.mailer());
    let user = auth.get_user(current.id).await?;

    Ok(Json(user))
}

/// `PUT /account` — partial profile update.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse> {
    let update = ProfileUpdate {
        email: req
            .email
            .as_deref()
            .map(Email::parse)
            .transpose()
            .map_err(AuthError::from)?,
        mobile_number: req
            .mobile_number
            .as_deref()
            .map(Mobile::parse)
            .transpose()
            .map_err(AuthError::from)?,
        first_name: req.first_name,
        last_name: req.last_name,
    };

    let auth = AuthService::new(state.pool(), state.mailer());
    let user = auth.update_profile(current.id, &update).await?;

    Ok(Json(user))
}

/// `POST /account/password` — change password, re-checking the current one.
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(current): RequireAuth,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), state.mailer());
    auth.change_password(&current.username, &req.current_password, &req.new_password)
        .await?;

    Ok(Json(json!({ "message": "Password updated" })))
}
