use crate::config::MailSettings;
use crate::domain::model::{ConsultationRequest, Notification};
use chrono::{DateTime, Utc};

pub const SUBJECT_PREFIX: &str = "Новая заявка на консультацию от";
pub const SITE_LABEL: &str = "CFO Portfolio";

pub fn subject(request: &ConsultationRequest) -> String {
    format!("{} {}", SUBJECT_PREFIX, request.name)
}

/// 產生 HTML 郵件內容
///
/// Field values are inserted as-is, without HTML escaping.
pub fn html_body(request: &ConsultationRequest, submitted_at: DateTime<Utc>) -> String {
    format!(
        r#"
    <html>
      <body style="font-family: Arial, sans-serif; color: #333;">
        <h2 style="color: #1a1a2e;">Новая заявка на консультацию</h2>
        <p><strong>Имя:</strong> {name}</p>
        <p><strong>Email:</strong> {email}</p>
        <p><strong>Телефон:</strong> {phone}</p>
        <p><strong>Сообщение:</strong></p>
        <p style="background-color: #f5f5f5; padding: 15px; border-left: 4px solid #c9a96e;">
          {message}
        </p>
        <hr style="border: none; border-top: 1px solid #ddd; margin: 20px 0;">
        <p style="color: #666; font-size: 12px;">
          Заявка отправлена через форму сайта {site} ({submitted} UTC)
        </p>
      </body>
    </html>
    "#,
        name = request.name,
        email = request.email,
        phone = request.phone,
        message = request.message,
        site = SITE_LABEL,
        submitted = submitted_at.format("%Y-%m-%d %H:%M"),
    )
}

pub fn compose(
    request: &ConsultationRequest,
    settings: &MailSettings,
    submitted_at: DateTime<Utc>,
) -> Notification {
    Notification {
        subject: subject(request),
        html_body: html_body(request, submitted_at),
        recipient: settings.recipient.clone(),
        reply_to: Some(request.email.clone()),
    }
}
