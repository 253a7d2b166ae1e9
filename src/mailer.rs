use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use thiserror::Error;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::draft::EmailDraft;

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection, authentication and submission failures all surface here
/// uniformly; callers only get a detail string to log, never the subtype.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("could not assemble the outgoing message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("mail relay failure: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Seam in front of the SMTP relay. Sending is NOT idempotent; the
/// confirmation handler guarantees at most one call per confirmation.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send_draft(&self, draft: &EmailDraft) -> Result<(), DispatchError>;
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpMailer {
    /// Mailbox addresses are parsed here so a bad configuration fails at
    /// startup instead of on the first send.
    pub fn new(config: &Config) -> Result<Self> {
        let credentials = Credentials::new(
            config.email_address.clone(),
            config.email_password.clone(),
        );
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .with_context(|| format!("Could not configure the mail relay '{}'", config.smtp_host))?
            .credentials(credentials)
            .timeout(Some(SMTP_TIMEOUT))
            .build();

        let from = config
            .email_address
            .parse()
            .with_context(|| format!("'{}' is not a valid sender address", config.email_address))?;
        let to = config.recipient_email.parse().with_context(|| {
            format!("'{}' is not a valid recipient address", config.recipient_email)
        })?;

        Ok(Self { transport, from, to })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send_draft(&self, draft: &EmailDraft) -> Result<(), DispatchError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(draft.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(draft.body.clone())?;

        self.transport.send(message).await?;
        Ok(())
    }
}
