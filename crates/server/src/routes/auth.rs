//! Authentication route handlers.
//!
//! Registration, the two-step login, logout, and password reset. Handlers
//! own all session state changes; the service layer only decides outcomes.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use uuid::Uuid;

use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, PendingLogin, session_keys};
use crate::services::auth::{AuthError, AuthService, RegisterInput};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub mobile_number: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub invite_code: Option<String>,
}

/// Login request body (first factor).
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Two-factor verification request body (second factor).
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub code: String,
}

/// Password reset request body.
#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

/// Password reset confirmation body.
#[derive(Debug, Deserialize)]
pub struct PasswordResetConfirmRequest {
    pub token: Uuid,
    pub new_password: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /auth/register` — create an account.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), state.mailer());

    let user = auth
        .register(RegisterInput {
            username: req.username,
            email: req.email,
            mobile_number: req.mobile_number,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
            invite_code: req.invite_code,
        })
        .await?;

    tracing::info!(user_id = %user.id, "user registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// `POST /auth/login` — first factor.
///
/// On success a verification code is emailed and a pending-login marker is
/// stored in the session. The user is not logged in yet.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), state.mailer());

    let pending = auth.start_login(&req.username, &req.password).await?;

    session
        .insert(session_keys::PENDING_LOGIN, &pending)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(Json(json!({
        "message": "Verification code sent, confirm it at /auth/two-factor/verify"
    })))
}

/// `POST /auth/two-factor/verify` — second factor.
///
/// Promotes the pending login to a full session on success.
pub async fn verify_two_factor(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<VerifyRequest>,
) -> Result<impl IntoResponse> {
    let pending: PendingLogin = session
        .get(session_keys::PENDING_LOGIN)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .ok_or_else(|| AppError::Unauthorized("No login pending verification".to_owned()))?;

    let auth = AuthService::new(state.pool(), state.mailer());
    let user = auth.verify_two_factor(&pending, &req.code).await?;

    session
        .remove::<PendingLogin>(session_keys::PENDING_LOGIN)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let current = CurrentUser {
        id: user.id,
        username: user.username.clone(),
        is_staff: user.is_staff,
    };
    set_current_user(&session, &current)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(user))
}

/// `POST /auth/logout` — clear the session.
pub async fn logout(session: Session) -> Result<impl IntoResponse> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    session
        .remove::<PendingLogin>(session_keys::PENDING_LOGIN)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    clear_sentry_user();

    Ok(Json(json!({ "message": "Logged out" })))
}

/// `POST /auth/password-reset` — email a reset link.
///
/// An unknown email is reported as 404, unlike login where a missing user
/// reads as bad credentials.
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(req): Json<PasswordResetRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), state.mailer());

    auth.request_password_reset(&req.email, &state.config().base_url)
        .await
        .map_err(|e| match e {
            AuthError::UserNotFound => AppError::NotFound("No account with that email".to_owned()),
            other => AppError::Auth(other),
        })?;

    Ok(Json(json!({ "message": "Password reset email sent" })))
}

/// `POST /auth/password-reset/confirm` — redeem a reset token.
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(req): Json<PasswordResetConfirmRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool(), state.mailer());

    auth.confirm_password_reset(req.token, &req.new_password)
        .await?;

    Ok(Json(json!({ "message": "Password updated" })))
}
