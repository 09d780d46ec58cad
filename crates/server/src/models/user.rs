//! User domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use bazaar_core::{Email, Mobile, UserId};

/// A registered account.
///
/// The password hash is deliberately not part of this type; it lives in a
/// separate table and is only surfaced by the credential-checking queries.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique login handle.
    pub username: String,
    /// Registered email address (receives two-factor codes and reset links).
    pub email: Email,
    /// Unique mobile number.
    pub mobile_number: Mobile,
    /// Optional given name.
    pub first_name: Option<String>,
    /// Optional family name.
    pub last_name: Option<String>,
    /// Store-credit balance.
    pub wallet_balance: Decimal,
    /// Optional unique invite code.
    pub invite_code: Option<String>,
    /// Staff accounts may mutate the catalog and approve reviews.
    pub is_staff: bool,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: Email,
    pub mobile_number: Mobile,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub invite_code: Option<String>,
}

/// Input for a partial profile update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<Email>,
    pub mobile_number: Option<Mobile>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
