//! Business-logic services sitting between routes and repositories.

pub mod auth;
pub mod mailer;

pub use auth::{AuthError, AuthService};
pub use mailer::{Mailer, MailerError};
