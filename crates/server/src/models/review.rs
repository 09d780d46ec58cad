//! Review domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bazaar_core::{ProductId, ReviewId, UserId};

/// A product review. One per (user, product).
///
/// Unapproved reviews are visible to staff readers only.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub product_id: ProductId,
    /// 1 through 5.
    pub rating: i16,
    pub comment: String,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}
