#[cfg(feature = "cli")]
pub mod cli;
pub mod env;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ConsultationError, Result};
use crate::utils::validation::{
    validate_email, validate_non_empty_string, validate_range, FieldViolation, Validate,
};
use std::fmt;

pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// SMTP connection and routing settings for one send.
#[derive(Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub recipient: String,
    /// 寄件者地址；未設定時使用 `username`
    pub sender: Option<String>,
    pub timeout_secs: u64,
}

impl MailSettings {
    pub fn sender_address(&self) -> &str {
        self.sender.as_deref().unwrap_or(&self.username)
    }
}

// 密碼不可出現在日誌中
impl fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("recipient", &self.recipient)
            .field("sender", &self.sender)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn invalid(violation: FieldViolation, value: &str) -> ConsultationError {
    ConsultationError::InvalidConfigValueError {
        field: violation.field,
        value: value.to_string(),
        reason: violation.message,
    }
}

impl Validate for MailSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("smtp_host", &self.host).map_err(|v| invalid(v, &self.host))?;
        validate_range("smtp_port", self.port, 1, u16::MAX)
            .map_err(|v| invalid(v, &self.port.to_string()))?;
        validate_non_empty_string("smtp_user", &self.username)
            .map_err(|v| invalid(v, &self.username))?;
        validate_email("recipient_email", &self.recipient)
            .map_err(|v| invalid(v, &self.recipient))?;
        validate_range("smtp_timeout", self.timeout_secs, 1, 300)
            .map_err(|v| invalid(v, &self.timeout_secs.to_string()))?;

        // 密碼值不放進錯誤內容
        if self.password.is_empty() {
            return Err(ConsultationError::InvalidConfigValueError {
                field: "smtp_password".to_string(),
                value: "<redacted>".to_string(),
                reason: "Value cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// 固定設定 (例如從 TOML 載入) 也可以直接當作 provider
impl ConfigProvider for MailSettings {
    fn mail_settings(&self) -> Result<MailSettings> {
        self.validate()?;
        Ok(self.clone())
    }
}
