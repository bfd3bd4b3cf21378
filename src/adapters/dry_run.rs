use crate::config::MailSettings;
use crate::domain::model::Notification;
use crate::domain::ports::Mailer;
use crate::utils::error::Result;
use async_trait::async_trait;

/// 只記錄郵件內容、不實際寄送 (本機測試用)
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunMailer;

#[async_trait]
impl Mailer for DryRunMailer {
    async fn send(&self, settings: &MailSettings, notification: &Notification) -> Result<()> {
        tracing::info!(
            "🧪 Dry run: would send \"{}\" from {} to {} via {}:{}",
            notification.subject,
            settings.sender_address(),
            notification.recipient,
            settings.host,
            settings.port
        );
        tracing::debug!("Dry run body:\n{}", notification.html_body);
        Ok(())
    }
}
