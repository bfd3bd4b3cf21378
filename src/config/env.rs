use crate::config::{MailSettings, DEFAULT_SMTP_PORT, DEFAULT_TIMEOUT_SECS};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ConsultationError, Result};
use crate::utils::validation::Validate;
use std::env;

pub const SMTP_HOST: &str = "SMTP_HOST";
pub const SMTP_PORT: &str = "SMTP_PORT";
pub const SMTP_USER: &str = "SMTP_USER";
pub const SMTP_PASSWORD: &str = "SMTP_PASSWORD";
pub const SMTP_FROM: &str = "SMTP_FROM";
pub const SMTP_TIMEOUT: &str = "SMTP_TIMEOUT";
pub const RECIPIENT_EMAIL: &str = "RECIPIENT_EMAIL";

type Lookup = dyn Fn(&str) -> Option<String> + Send + Sync;

/// Reads mail settings from environment variables on every call, so a function instance
/// picks up the values its runtime provides at invocation time.
pub struct EnvConfig {
    lookup: Box<Lookup>,
}

impl EnvConfig {
    pub fn new() -> Self {
        Self::with_lookup(|key| env::var(key).ok())
    }

    /// 使用自訂的查詢函式 (測試時避免修改行程環境變數)
    pub fn with_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            lookup: Box::new(lookup),
        }
    }

    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.get(key).ok_or_else(|| ConsultationError::MissingConfigError {
            field: key.to_string(),
        })
    }

    fn parsed_or<T: std::str::FromStr>(&self, key: &str, default: T) -> Result<T> {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConsultationError::InvalidConfigValueError {
                    field: key.to_string(),
                    value: raw.clone(),
                    reason: "Value is not a valid number".to_string(),
                }),
        }
    }

    pub fn load(&self) -> Result<MailSettings> {
        let settings = MailSettings {
            host: self.required(SMTP_HOST)?,
            port: self.parsed_or(SMTP_PORT, DEFAULT_SMTP_PORT)?,
            username: self.required(SMTP_USER)?,
            password: self.required(SMTP_PASSWORD)?,
            recipient: self.required(RECIPIENT_EMAIL)?,
            sender: self.get(SMTP_FROM),
            timeout_secs: self.parsed_or(SMTP_TIMEOUT, DEFAULT_TIMEOUT_SECS)?,
        };
        settings.validate()?;

        tracing::debug!("Loaded mail settings from environment: {:?}", settings);
        Ok(settings)
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigProvider for EnvConfig {
    fn mail_settings(&self) -> Result<MailSettings> {
        self.load()
    }
}
