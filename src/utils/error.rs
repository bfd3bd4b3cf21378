use crate::utils::validation::FieldViolation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsultationError {
    #[error("Method not allowed: {method}")]
    MethodNotAllowed { method: String },

    #[error("Malformed request body: {message}")]
    MalformedBody { message: String },

    #[error("Validation failed: {}", summarize(.failures))]
    ValidationError { failures: Vec<FieldViolation> },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Mail transport error: {message}")]
    TransportError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// 錯誤分類，決定回應狀態碼與日誌等級
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 呼叫端送出的請求有問題 (4xx)
    Client,
    /// 郵件無法送達，包含設定缺漏 (502)
    Delivery,
    /// 其他內部錯誤 (500)
    Internal,
}

impl ConsultationError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MethodNotAllowed { .. }
            | Self::MalformedBody { .. }
            | Self::ValidationError { .. } => ErrorCategory::Client,
            Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::TransportError { .. } => ErrorCategory::Delivery,
            Self::IoError(_) | Self::TomlError(_) | Self::SerializationError(_) => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::MethodNotAllowed { .. } => 405,
            Self::MalformedBody { .. } | Self::ValidationError { .. } => 400,
            _ => match self.category() {
                ErrorCategory::Delivery => 502,
                _ => 500,
            },
        }
    }

    /// 回傳給客戶端的錯誤訊息，不含主機名稱等內部細節
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed { .. } => "Method not allowed",
            Self::MalformedBody { .. } => "Invalid request body",
            Self::ValidationError { .. } => "Validation failed",
            _ => match self.category() {
                ErrorCategory::Delivery => "Failed to send consultation request",
                _ => "Internal error",
            },
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedBody {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::TransportError {
            message: message.into(),
        }
    }
}

fn summarize(failures: &[FieldViolation]) -> String {
    failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ConsultationError>;
