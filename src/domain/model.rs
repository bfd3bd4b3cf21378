use serde::Serialize;

/// A consultation request that passed schema validation.
///
/// The request handler only obtains one through [`crate::core::schema::validate_payload`],
/// so every value that reaches a [`crate::domain::ports::Mailer`] has had each field
/// constraint checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsultationRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// 準備寄出的通知郵件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub html_body: String,
    pub recipient: String,
    pub reply_to: Option<String>,
}

/// Per-invocation metadata supplied by the hosting runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    pub request_id: String,
    pub function_name: String,
}

impl InvocationContext {
    pub fn new(request_id: impl Into<String>, function_name: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            function_name: function_name.into(),
        }
    }
}
