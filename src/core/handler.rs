use crate::core::{notification, response, schema};
use crate::domain::event::{ApiEvent, ApiResponse};
use crate::domain::model::InvocationContext;
use crate::domain::ports::{ConfigProvider, Mailer};
use crate::utils::error::{ConsultationError, ErrorCategory, Result};
use chrono::Utc;
use tracing::Instrument;

/// Turns one HTTP-like event into one response.
///
/// The handler keeps no per-request state, so a single instance can serve concurrent
/// invocations behind an `Arc`.
pub struct RequestHandler<C: ConfigProvider, M: Mailer> {
    config: C,
    mailer: M,
}

impl<C: ConfigProvider, M: Mailer> RequestHandler<C, M> {
    pub fn new(config: C, mailer: M) -> Self {
        Self { config, mailer }
    }

    /// 處理單次呼叫；所有錯誤都轉成 JSON 回應，不會向外傳遞
    pub async fn handle(&self, event: &ApiEvent, context: &InvocationContext) -> ApiResponse {
        let span = tracing::info_span!(
            "invocation",
            request_id = %context.request_id,
            method = %event.http_method
        );

        async {
            match event.http_method.as_str() {
                "OPTIONS" => {
                    tracing::debug!("Answering CORS preflight");
                    return response::preflight();
                }
                "POST" => {}
                other => {
                    let err = ConsultationError::MethodNotAllowed {
                        method: other.to_string(),
                    };
                    log_failure(&err);
                    return response::error(&err, context);
                }
            }

            match self.submit(event).await {
                Ok(()) => {
                    tracing::info!("✅ Consultation request delivered");
                    response::success(context)
                }
                Err(err) => {
                    log_failure(&err);
                    response::error(&err, context)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn submit(&self, event: &ApiEvent) -> Result<()> {
        let request = schema::parse_request(event)?;
        tracing::debug!("Validated consultation request from {}", request.email);

        let settings = self.config.mail_settings()?;
        let notification = notification::compose(&request, &settings, Utc::now());

        tracing::info!(
            "📨 Sending consultation request to {} via {}:{}",
            notification.recipient,
            settings.host,
            settings.port
        );
        self.mailer.send(&settings, &notification).await
    }
}

fn log_failure(err: &ConsultationError) {
    match err.category() {
        ErrorCategory::Client => {
            tracing::warn!("Rejected request ({}): {}", err.status_code(), err)
        }
        ErrorCategory::Delivery | ErrorCategory::Internal => {
            tracing::error!("❌ Request failed ({}): {}", err.status_code(), err)
        }
    }
}
