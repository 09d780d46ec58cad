//! Authentication service.
//!
//! Issues and redeems the two time-bound credentials: six-digit two-factor
//! login codes (10-minute expiry) and single-use password-reset tokens
//! (1-hour expiry). Passwords are hashed with Argon2id.
//!
//! Session writes (pending-login marker, current user) stay in the route
//! handlers — this service only decides whether a login may proceed.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use rand::Rng;
use sqlx::PgPool;
use uuid::Uuid;

use bazaar_core::{Email, Mobile};

use crate::db::RepositoryError;
use crate::db::credentials::CredentialRepository;
use crate::db::users::UserRepository;
use crate::models::session::PendingLogin;
use crate::models::user::{NewUser, ProfileUpdate, User};
use crate::services::mailer::Mailer;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Digits in a two-factor code.
const CODE_LENGTH: usize = 6;

/// Two-factor codes live for ten minutes from issuance.
const TWO_FACTOR_TTL_MINUTES: i64 = 10;

/// Reset tokens live for one hour from issuance.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

/// Registration input, unparsed. Validation happens inside `register`.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub mobile_number: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub invite_code: Option<String>,
}

/// Authentication service.
///
/// Handles registration, the two-step login, and password recovery.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    credentials: CredentialRepository<'a>,
    mailer: &'a Mailer,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, mailer: &'a Mailer) -> Self {
        Self {
            users: UserRepository::new(pool),
            credentials: CredentialRepository::new(pool),
            mailer,
        }
    }

    // =========================================================================
    // Registration & profile
    // =========================================================================

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` / `InvalidMobile` on malformed input.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` on a username/mobile/invite-code collision.
    pub async fn register(&self, input: RegisterInput) -> Result<User, AuthError> {
        let email = Email::parse(&input.email)?;
        let mobile_number = Mobile::parse(&input.mobile_number)?;
        validate_password(&input.password)?;

        let password_hash = hash_password(&input.password)?;

        let new_user = NewUser {
            username: input.username,
            email,
            mobile_number,
            first_name: input.first_name,
            last_name: input.last_name,
            invite_code: input.invite_code,
        };

        let user = self
            .users
            .create_with_password(&new_user, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    pub async fn get_user(&self, user_id: bazaar_core::UserId) -> Result<User, AuthError> {
        self.users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Apply a partial profile update.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the user doesn't exist.
    /// Returns `AuthError::UserAlreadyExists` on a mobile-number collision.
    pub async fn update_profile(
        &self,
        user_id: bazaar_core::UserId,
        update: &ProfileUpdate,
    ) -> Result<User, AuthError> {
        self.users
            .update_profile(user_id, update)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }

    // =========================================================================
    // Two-step login
    // =========================================================================

    /// First factor: verify username and password, then issue and email a
    /// six-digit code.
    ///
    /// The code is persisted with a 10-minute expiry before dispatch. If
    /// delivery fails the login attempt fails; the undelivered code simply
    /// ages out.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    /// Returns `AuthError::Delivery` if the code email cannot be sent.
    pub async fn start_login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<PendingLogin, AuthError> {
        let (user, password_hash) = self
            .users
            .get_password_hash(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let code = generate_code();
        let now = Utc::now();
        let expires_at = now + Duration::minutes(TWO_FACTOR_TTL_MINUTES);

        self.credentials
            .create_two_factor_code(user.id, &code, expires_at)
            .await?;

        self.mailer
            .send(
                &user.email,
                "Your login code",
                &format!(
                    "Your verification code is {code}. It expires in {TWO_FACTOR_TTL_MINUTES} minutes."
                ),
            )
            .await?;

        tracing::debug!(user_id = %user.id, "two-factor code issued");

        Ok(PendingLogin {
            user_id: user.id,
            issued_at: now,
        })
    }

    /// Second factor: redeem a submitted code against the pending login.
    ///
    /// Only the most recently created matching code is considered. Expiry is
    /// checked against wall-clock time at verification, not issuance.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::CodeNotFound` if no code matches.
    /// Returns `AuthError::CodeExpired` if the matched code is past expiry.
    pub async fn verify_two_factor(
        &self,
        pending: &PendingLogin,
        submitted_code: &str,
    ) -> Result<User, AuthError> {
        let code = self
            .credentials
            .latest_matching_code(pending.user_id, submitted_code)
            .await?
            .ok_or(AuthError::CodeNotFound)?;

        if code.is_expired(Utc::now()) {
            return Err(AuthError::CodeExpired);
        }

        self.users
            .get_by_id(pending.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    // =========================================================================
    // Password recovery
    // =========================================================================

    /// Issue a single-use reset token and email a redemption link.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no account has that email.
    /// Returns `AuthError::Delivery` if the link email cannot be sent.
    pub async fn request_password_reset(
        &self,
        email: &str,
        base_url: &str,
    ) -> Result<(), AuthError> {
        let email = Email::parse(email)?;
        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let token = Uuid::new_v4();
        let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);

        self.credentials
            .create_reset_token(user.id, token, expires_at)
            .await?;

        self.mailer
            .send(
                &user.email,
                "Password reset",
                &format!(
                    "To reset your password, open {base_url}/auth/password-reset-confirm?token={token} \
                     within {RESET_TOKEN_TTL_HOURS} hour(s). If you did not request this, ignore this email."
                ),
            )
            .await?;

        tracing::debug!(user_id = %user.id, "password reset token issued");

        Ok(())
    }

    /// Redeem a reset token: set the new password, then delete the token.
    ///
    /// The delete follows the password write (best-effort ordering); a token
    /// that no longer exists reads as `TokenNotFound`, which is what makes
    /// the token single-use.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenNotFound` if the token doesn't exist.
    /// Returns `AuthError::TokenExpired` if it is past its expiry.
    /// Returns `AuthError::WeakPassword` if the new password is too short.
    pub async fn confirm_password_reset(
        &self,
        token: Uuid,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let record = self
            .credentials
            .get_reset_token(token)
            .await?
            .ok_or(AuthError::TokenNotFound)?;

        if record.is_expired(Utc::now()) {
            return Err(AuthError::TokenExpired);
        }

        validate_password(new_password)?;
        let password_hash = hash_password(new_password)?;

        self.users.set_password(record.user_id, &password_hash).await?;
        self.credentials.delete_reset_token(record.id).await?;

        Ok(())
    }

    /// Change the password of a logged-in user after re-checking the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the current password is wrong.
    /// Returns `AuthError::WeakPassword` if the new password is too short.
    pub async fn change_password(
        &self,
        username: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let (user, password_hash) = self
            .users
            .get_password_hash(username)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(current_password, &password_hash)?;
        validate_password(new_password)?;

        let new_hash = hash_password(new_password)?;
        self.users.set_password(user.id, &new_hash).await?;

        Ok(())
    }
}

/// Generate a code of `CODE_LENGTH` uniform random digits.
///
/// Deliberately not cryptographically whitened — a short-lived numeric
/// second factor, not a bearer token.
fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn short_passwords_rejected() {
        assert!(matches!(
            validate_password("seven77"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("eight888").is_ok());
    }

    #[test]
    fn password_hash_roundtrip() {
        let hash = hash_password("correct horse battery").expect("hash");
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
