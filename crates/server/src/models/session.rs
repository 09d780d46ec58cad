//! Session-related types.
//!
//! Types stored in the session for authentication state. The pending-login
//! marker is deliberately session data passed through handlers, not ambient
//! process state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bazaar_core::UserId;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's login handle.
    pub username: String,
    /// Whether the user may use staff-gated endpoints.
    pub is_staff: bool,
}

/// Marker set between first-factor success and two-factor verification.
///
/// Cleared on successful verification or logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingLogin {
    /// User who passed the password check.
    pub user_id: UserId,
    /// When the first factor succeeded.
    pub issued_at: DateTime<Utc>,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the pending-login marker awaiting the second factor.
    pub const PENDING_LOGIN: &str = "pending_login";
}
