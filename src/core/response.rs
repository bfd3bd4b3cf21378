use crate::domain::event::ApiResponse;
use crate::domain::model::InvocationContext;
use crate::utils::error::{ConsultationError, ErrorCategory};
use crate::utils::validation::FieldViolation;
use serde::Serialize;
use std::collections::HashMap;

pub const SUCCESS_MESSAGE: &str = "Заявка успешно отправлена";

pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
pub const MAX_AGE: &str = "Access-Control-Max-Age";
pub const CONTENT_TYPE: &str = "Content-Type";

/// 405 回應固定使用與既有前端相同的位元組內容
pub const METHOD_NOT_ALLOWED_BODY: &str = r#"{"error": "Method not allowed"}"#;

#[derive(Debug, Serialize)]
struct SuccessBody<'a> {
    success: bool,
    message: &'a str,
    request_id: &'a str,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a [FieldViolation]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<&'a str>,
}

fn json_headers() -> HashMap<String, String> {
    HashMap::from([
        (CONTENT_TYPE.to_string(), "application/json".to_string()),
        (ALLOW_ORIGIN.to_string(), "*".to_string()),
    ])
}

fn json_response<T: Serialize>(status_code: u16, body: &T) -> ApiResponse {
    // 只序列化自有的結構，失敗時退回固定內容
    let body = serde_json::to_string(body)
        .unwrap_or_else(|_| r#"{"error":"Internal error"}"#.to_string());
    ApiResponse {
        status_code,
        headers: json_headers(),
        body,
        is_base64_encoded: false,
    }
}

/// CORS preflight 回應
pub fn preflight() -> ApiResponse {
    let headers = HashMap::from([
        (ALLOW_ORIGIN.to_string(), "*".to_string()),
        (ALLOW_METHODS.to_string(), "POST, OPTIONS".to_string()),
        (ALLOW_HEADERS.to_string(), "Content-Type".to_string()),
        (MAX_AGE.to_string(), "86400".to_string()),
    ]);
    ApiResponse {
        status_code: 200,
        headers,
        body: String::new(),
        is_base64_encoded: false,
    }
}

pub fn success(context: &InvocationContext) -> ApiResponse {
    json_response(
        200,
        &SuccessBody {
            success: true,
            message: SUCCESS_MESSAGE,
            request_id: &context.request_id,
        },
    )
}

pub fn error(err: &ConsultationError, context: &InvocationContext) -> ApiResponse {
    if let ConsultationError::MethodNotAllowed { .. } = err {
        return ApiResponse {
            status_code: err.status_code(),
            headers: json_headers(),
            body: METHOD_NOT_ALLOWED_BODY.to_string(),
            is_base64_encoded: false,
        };
    }

    let mut body = ErrorBody {
        error: err.public_message(),
        details: None,
        fields: None,
        request_id: None,
    };

    match err {
        ConsultationError::MalformedBody { message } => {
            body.details = Some(vec![message.as_str()]);
        }
        ConsultationError::ValidationError { failures } => {
            body.fields = Some(failures.as_slice());
        }
        _ => {}
    }

    // 送達失敗時附上 request_id 方便對照日誌
    if err.category() != ErrorCategory::Client {
        body.request_id = Some(&context.request_id);
    }

    json_response(err.status_code(), &body)
}
