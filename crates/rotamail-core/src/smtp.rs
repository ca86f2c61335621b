//! SMTP delivery via `lettre`, STARTTLS on the configured relay.

use crate::config::Config;
use crate::error::{Result, RotamailError};
use crate::mail::{MailTransport, Message, Secret};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{SmtpTransport, Transport};
use std::time::Duration;
use tracing::info;

/// Environment variable holding the sender account's password.
pub const PASSWORD_ENV: &str = "SENDER_PASSWORD";

pub struct SmtpMailer {
    transport: SmtpTransport,
    relay: String,
}

impl SmtpMailer {
    pub fn new(config: &Config, password: &Secret) -> Result<Self> {
        let relay = format!("{}:{}", config.smtp_host, config.smtp_port);
        let transport = SmtpTransport::starttls_relay(&config.smtp_host)
            .map_err(|e| RotamailError::Delivery(format!("cannot configure {relay}: {e}")))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.sender_address(),
                password.expose().to_string(),
            ))
            .timeout(Some(Duration::from_secs(config.smtp_timeout_secs)))
            .build();
        Ok(Self { transport, relay })
    }

    /// Build a mailer authenticated with the password from [`PASSWORD_ENV`].
    pub fn from_env(config: &Config) -> Result<Self> {
        Self::new(config, &password_from_env()?)
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, message: &Message) -> Result<()> {
        let email = build_email(message)?;
        self.transport
            .send(&email)
            .map_err(|e| RotamailError::Delivery(format!("{}: {e}", self.relay)))?;
        info!(relay = %self.relay, subject = %message.subject, "sent notification");
        Ok(())
    }
}

pub fn password_from_env() -> Result<Secret> {
    match std::env::var(PASSWORD_ENV) {
        Ok(v) if !v.is_empty() => Ok(Secret::new(v)),
        _ => Err(RotamailError::MissingSecret(PASSWORD_ENV.to_string())),
    }
}

/// Convert a [`Message`] into an RFC 5322 email with an HTML body.
pub fn build_email(message: &Message) -> Result<lettre::Message> {
    let mut builder = lettre::Message::builder()
        .from(mailbox(&message.from)?)
        .subject(message.subject.as_str())
        .header(ContentType::TEXT_HTML);
    for to in &message.to {
        builder = builder.to(mailbox(to)?);
    }
    for cc in &message.cc {
        builder = builder.cc(mailbox(cc)?);
    }
    builder
        .body(message.body.clone())
        .map_err(|e| RotamailError::Delivery(format!("cannot build message: {e}")))
}

fn mailbox(addr: &str) -> Result<Mailbox> {
    addr.parse()
        .map_err(|e| RotamailError::Delivery(format!("invalid address '{addr}': {e}")))
}
