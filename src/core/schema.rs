//! Request body parsing and the consultation payload schema.

use crate::domain::event::ApiEvent;
use crate::domain::model::ConsultationRequest;
use crate::utils::error::{ConsultationError, Result};
use crate::utils::validation::{validate_email, validate_min_length, FieldResult, FieldViolation};
use serde_json::{Map, Value};

pub const NAME_MIN_LENGTH: usize = 1;
pub const PHONE_MIN_LENGTH: usize = 5;
pub const MESSAGE_MIN_LENGTH: usize = 10;

/// 將 event body 解析為 JSON 物件
pub fn parse_body(event: &ApiEvent) -> Result<Map<String, Value>> {
    if event.is_base64_encoded {
        return Err(ConsultationError::malformed(
            "base64-encoded bodies are not supported",
        ));
    }

    let body = match event.body.as_deref() {
        Some(body) if !body.trim().is_empty() => body,
        _ => return Err(ConsultationError::malformed("request body is missing")),
    };

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ConsultationError::malformed(
            "request body must be a JSON object",
        )),
        Err(e) => Err(ConsultationError::malformed(format!("invalid JSON: {}", e))),
    }
}

/// Checks every field and collects all violations, so the caller can report the whole
/// set at once.
pub fn validate_payload(
    payload: &Map<String, Value>,
) -> std::result::Result<ConsultationRequest, Vec<FieldViolation>> {
    let mut failures = Vec::new();

    let name = check_field(payload, "name", &mut failures, |field, value| {
        validate_min_length(field, value, NAME_MIN_LENGTH)
    });
    let email = check_field(payload, "email", &mut failures, validate_email);
    let phone = check_field(payload, "phone", &mut failures, |field, value| {
        validate_min_length(field, value, PHONE_MIN_LENGTH)
    });
    let message = check_field(payload, "message", &mut failures, |field, value| {
        validate_min_length(field, value, MESSAGE_MIN_LENGTH)
    });

    match (name, email, phone, message) {
        (Some(name), Some(email), Some(phone), Some(message)) if failures.is_empty() => {
            Ok(ConsultationRequest {
                name,
                email,
                phone,
                message,
            })
        }
        _ => Err(failures),
    }
}

fn check_field<F>(
    payload: &Map<String, Value>,
    field: &str,
    failures: &mut Vec<FieldViolation>,
    rule: F,
) -> Option<String>
where
    F: Fn(&str, &str) -> FieldResult,
{
    let value = match payload.get(field) {
        None => {
            failures.push(FieldViolation::new(field, "field is required"));
            return None;
        }
        Some(Value::String(value)) => value,
        Some(_) => {
            failures.push(FieldViolation::new(field, "must be a string"));
            return None;
        }
    };

    match rule(field, value) {
        Ok(()) => Some(value.clone()),
        Err(violation) => {
            failures.push(violation);
            None
        }
    }
}

/// 解析並驗證 POST body
pub fn parse_request(event: &ApiEvent) -> Result<ConsultationRequest> {
    let payload = parse_body(event)?;
    validate_payload(&payload).map_err(|failures| ConsultationError::ValidationError { failures })
}
