use crate::config::MailSettings;
use crate::domain::model::Notification;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Delivers a composed notification. Implementations perform one complete send per call and
/// release any connection before returning.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, settings: &MailSettings, notification: &Notification) -> Result<()>;
}

#[async_trait]
impl<T: Mailer + ?Sized> Mailer for Box<T> {
    async fn send(&self, settings: &MailSettings, notification: &Notification) -> Result<()> {
        (**self).send(settings, notification).await
    }
}

/// Supplies mail settings at invocation time.
pub trait ConfigProvider: Send + Sync {
    fn mail_settings(&self) -> Result<MailSettings>;
}

impl<T: ConfigProvider + ?Sized> ConfigProvider for Box<T> {
    fn mail_settings(&self) -> Result<MailSettings> {
        (**self).mail_settings()
    }
}
