//! Time-bound credential types: two-factor codes and reset tokens.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use bazaar_core::{ResetTokenId, TwoFactorCodeId, UserId};

/// A six-digit second-factor login code.
///
/// Multiple codes may coexist per user; verification only ever considers the
/// most recently created record matching the submitted value.
#[derive(Debug, Clone)]
pub struct TwoFactorCode {
    pub id: TwoFactorCodeId,
    pub user_id: UserId,
    /// Six ASCII digits.
    pub code: String,
    pub created_at: DateTime<Utc>,
    /// Always set before persistence (creation + 10 minutes).
    pub expires_at: DateTime<Utc>,
}

impl TwoFactorCode {
    /// A code is valid strictly before its expiry instant.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// A single-use password-reset token.
///
/// Valid only while `now < expires_at` and the row still exists; the row is
/// deleted on successful redemption.
#[derive(Debug, Clone)]
pub struct PasswordResetToken {
    pub id: ResetTokenId,
    pub user_id: UserId,
    /// Globally unique opaque token value.
    pub token: Uuid,
    pub created_at: DateTime<Utc>,
    /// Always set before persistence (creation + 1 hour).
    pub expires_at: DateTime<Utc>,
}

impl PasswordResetToken {
    /// A token is valid strictly before its expiry instant.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn code_expiring_at(expires_at: DateTime<Utc>) -> TwoFactorCode {
        TwoFactorCode {
            id: TwoFactorCodeId::new(1),
            user_id: UserId::new(1),
            code: "123456".to_string(),
            created_at: expires_at - Duration::minutes(10),
            expires_at,
        }
    }

    #[test]
    fn valid_strictly_before_expiry() {
        let now = Utc::now();
        let code = code_expiring_at(now + Duration::seconds(1));
        assert!(!code.is_expired(now));
    }

    #[test]
    fn expired_at_the_expiry_instant() {
        let now = Utc::now();
        let code = code_expiring_at(now);
        assert!(code.is_expired(now));
    }

    #[test]
    fn expired_eleven_minutes_after_issuance() {
        let issued = Utc::now() - Duration::minutes(11);
        let code = code_expiring_at(issued + Duration::minutes(10));
        assert!(code.is_expired(Utc::now()));
    }
}
