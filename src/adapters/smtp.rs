//! SMTP delivery via lettre.
//!
//! Every call to [`SmtpMailer::send`] runs one complete submission: connect, STARTTLS
//! upgrade, login, send, quit. The transport is built per call and dropped on return, so no
//! connection outlives a send on any path.

use crate::config::MailSettings;
use crate::domain::model::Notification;
use crate::domain::ports::Mailer;
use crate::utils::error::{ConsultationError, Result};
use async_trait::async_trait;
use lettre::message::{Mailbox, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpMailer;

impl SmtpMailer {
    pub fn new() -> Self {
        Self
    }

    fn mailbox(field: &str, address: &str) -> Result<Mailbox> {
        address
            .parse()
            .map_err(|e: lettre::address::AddressError| {
                ConsultationError::InvalidConfigValueError {
                    field: field.to_string(),
                    value: address.to_string(),
                    reason: e.to_string(),
                }
            })
    }

    /// 建立 lettre Message (HTML 單一部分，UTF-8)
    pub fn build_message(settings: &MailSettings, notification: &Notification) -> Result<Message> {
        let mut builder = Message::builder()
            .from(Self::mailbox("smtp_from", settings.sender_address())?)
            .to(Self::mailbox("recipient_email", &notification.recipient)?)
            .subject(notification.subject.as_str());

        if let Some(reply_to) = &notification.reply_to {
            match reply_to.parse::<Mailbox>() {
                Ok(mailbox) => builder = builder.reply_to(mailbox),
                Err(e) => tracing::warn!("Skipping Reply-To header for {}: {}", reply_to, e),
            }
        }

        builder
            .singlepart(SinglePart::html(notification.html_body.clone()))
            .map_err(|e| ConsultationError::transport(format!("failed to build message: {}", e)))
    }

    fn transport(settings: &MailSettings) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| ConsultationError::transport(e.to_string()))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .timeout(Some(Duration::from_secs(settings.timeout_secs)))
            .build();
        Ok(transport)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, settings: &MailSettings, notification: &Notification) -> Result<()> {
        let message = Self::build_message(settings, notification)?;
        let transport = Self::transport(settings)?;

        let response = transport.send(message).await.map_err(|e| {
            ConsultationError::transport(format!(
                "{}:{} rejected delivery: {}",
                settings.host, settings.port, e
            ))
        })?;

        tracing::debug!("SMTP server accepted message: {}", response.code());
        Ok(())
    }
}
