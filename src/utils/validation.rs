use crate::utils::error::Result;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::OnceLock;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 單一欄位的驗證失敗
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub type FieldResult = std::result::Result<(), FieldViolation>;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(
            r"^[\p{L}\p{N}!#$%&'*+/=?^_`{|}~.-]+@[\p{L}\p{N}](?:[\p{L}\p{N}-]{0,61}[\p{L}\p{N}])?(?:\.[\p{L}\p{N}](?:[\p{L}\p{N}-]{0,61}[\p{L}\p{N}])?)+$",
        )
        .expect("email regex is valid")
    })
}

/// 檢查字串至少有 `min` 個字元 (以 Unicode 字元計算，而非位元組)
pub fn validate_min_length(field_name: &str, value: &str, min: usize) -> FieldResult {
    if value.chars().count() < min {
        let message = if min == 1 {
            "must not be empty".to_string()
        } else {
            format!("must be at least {} characters", min)
        };
        return Err(FieldViolation::new(field_name, message));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> FieldResult {
    if value.trim().is_empty() {
        return Err(FieldViolation::new(
            field_name,
            "cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_email(field_name: &str, value: &str) -> FieldResult {
    let invalid = || FieldViolation::new(field_name, "is not a valid email address");

    if !email_regex().is_match(value) {
        return Err(invalid());
    }

    // regex 無法簡潔表達 local part 的點號規則；長度以字元計算 (允許 SMTPUTF8 地址)
    let local = value.split('@').next().unwrap_or_default();
    if local.starts_with('.')
        || local.ends_with('.')
        || local.contains("..")
        || local.chars().count() > 64
    {
        return Err(invalid());
    }

    Ok(())
}

pub fn validate_range<T: PartialOrd + fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> FieldResult {
    if value < min || value > max {
        return Err(FieldViolation::new(
            field_name,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}
