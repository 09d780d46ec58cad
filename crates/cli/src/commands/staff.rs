//! Staff permission management.

use bazaar_server::db::users::UserRepository;

use super::CommandError;

/// Grant or revoke staff permissions for a username.
///
/// # Errors
///
/// Returns `CommandError::UserNotFound` if no account has that username.
pub async fn set_staff(username: &str, is_staff: bool) -> Result<(), CommandError> {
    let pool = super::connect().await?;
    let users = UserRepository::new(&pool);

    let user = users
        .get_by_username(username)
        .await?
        .ok_or_else(|| CommandError::UserNotFound(username.to_owned()))?;

    users.set_staff(user.id, is_staff).await?;

    tracing::info!(
        username,
        is_staff,
        "staff permissions updated"
    );
    Ok(())
}
