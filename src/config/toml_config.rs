use crate::config::{MailSettings, DEFAULT_SMTP_PORT, DEFAULT_TIMEOUT_SECS};
use crate::utils::error::{ConsultationError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// 本機執行用的 TOML 設定檔
///
/// ```toml
/// [smtp]
/// host = "smtp.example.com"
/// port = 587
/// username = "forms@example.com"
/// password = "${SMTP_PASSWORD}"
///
/// [notification]
/// recipient = "cfo@example.com"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub smtp: SmtpSection,
    pub notification: NotificationSection,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SmtpSection {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for SmtpSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpSection")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("from", &self.from)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSection {
    pub recipient: String,
}

fn default_port() -> u16 {
    DEFAULT_SMTP_PORT
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        let config: Self = toml::from_str(&processed_content)?;
        config.validate()?;
        Ok(config)
    }

    /// 替換環境變數 (例如 ${SMTP_PASSWORD})；找不到的變數保留原字串
    fn substitute_env_vars(content: &str) -> String {
        static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
        let re = PLACEHOLDER
            .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder regex is valid"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn mail_settings(&self) -> MailSettings {
        MailSettings {
            host: self.smtp.host.clone(),
            port: self.smtp.port,
            username: self.smtp.username.clone(),
            password: self.smtp.password.clone(),
            recipient: self.notification.recipient.clone(),
            sender: self.smtp.from.clone(),
            timeout_secs: self.smtp.timeout_secs,
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        // 未替換的佔位符代表環境變數沒有設定
        if self.smtp.password.starts_with("${") {
            return Err(ConsultationError::MissingConfigError {
                field: format!("smtp.password ({})", self.smtp.password),
            });
        }
        self.mail_settings().validate()?;
        tracing::debug!("✅ TOML configuration validation passed");
        Ok(())
    }
}

impl From<TomlConfig> for MailSettings {
    fn from(config: TomlConfig) -> Self {
        config.mail_settings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[smtp]
host = "smtp.example.com"
username = "forms@example.com"
password = "secret"

[notification]
recipient = "cfo@example.com"
"#;

    #[test]
    fn test_parse_with_defaults() {
        let config = TomlConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.smtp.port, 587);
        assert_eq!(config.smtp.timeout_secs, 10);

        let settings: MailSettings = config.into();
        assert_eq!(settings.recipient, "cfo@example.com");
        assert_eq!(settings.sender_address(), "forms@example.com");
    }

    #[test]
    fn test_unresolved_placeholder_is_missing_config() {
        let content = SAMPLE.replace(
            "\"secret\"",
            "\"${SEND_CONSULTATION_TEST_UNSET_PASSWORD}\"",
        );
        let err = TomlConfig::from_toml_str(&content).unwrap_err();
        assert!(matches!(err, ConsultationError::MissingConfigError { .. }));
    }

    #[test]
    fn test_invalid_toml() {
        let err = TomlConfig::from_toml_str("[smtp\nhost = 1").unwrap_err();
        assert!(matches!(err, ConsultationError::TomlError(_)));
    }

    #[test]
    fn test_debug_hides_password() {
        let config = TomlConfig::from_toml_str(SAMPLE).unwrap();
        assert!(!format!("{:?}", config).contains("secret"));
    }
}
