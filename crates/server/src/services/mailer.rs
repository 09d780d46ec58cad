//! Outbound email via SMTP.
//!
//! The mailer accepts (subject, body, recipient) and either succeeds or
//! fails synchronously — no queueing, no retry. Callers decide what a
//! delivery failure means for their operation.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use secrecy::ExposeSecret;
use thiserror::Error;

use bazaar_core::Email;

use crate::config::MailConfig;

/// Errors that can occur while building or sending mail.
#[derive(Debug, Error)]
pub enum MailerError {
    /// The from or to address could not be parsed.
    #[error("invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("failed to build message: {0}")]
    Build(#[from] lettre::error::Error),

    /// The SMTP transport rejected the message or the connection failed.
    #[error("smtp error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// SMTP mailer for two-factor codes and reset links.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    /// Build a mailer from SMTP configuration.
    ///
    /// # Errors
    ///
    /// Returns `MailerError` if the from address is invalid or the relay
    /// parameters cannot be resolved.
    pub fn from_config(config: &MailConfig) -> Result<Self, MailerError> {
        let from: Mailbox = format!("{} <{}>", config.from_name, config.from_address).parse()?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(
                username.clone(),
                password.expose_secret().to_owned(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    /// Send a plain-text email.
    ///
    /// # Errors
    ///
    /// Returns `MailerError` if the message cannot be built or delivered.
    pub async fn send(&self, to: &Email, subject: &str, body: &str) -> Result<(), MailerError> {
        let to: Mailbox = to.as_str().parse()?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_owned())?;

        self.transport.send(message).await?;

        tracing::info!(subject, "email sent");

        Ok(())
    }
}
