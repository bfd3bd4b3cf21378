use anyhow::Result;
use async_trait::async_trait;
use send_consultation::{
    ApiEvent, ConsultationError, EnvConfig, InvocationContext, MailSettings, Mailer,
    Notification, RequestHandler,
};
use std::sync::{Arc, Mutex};

/// 記錄每次寄送內容的 Mailer (測試用)
#[derive(Clone, Default)]
struct RecordingMailer {
    sent: Arc<Mutex<Vec<Notification>>>,
    fail_with: Option<String>,
}

impl RecordingMailer {
    fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(
        &self,
        _settings: &MailSettings,
        notification: &Notification,
    ) -> send_consultation::Result<()> {
        self.sent.lock().unwrap().push(notification.clone());
        match &self.fail_with {
            Some(message) => Err(ConsultationError::transport(message.clone())),
            None => Ok(()),
        }
    }
}

fn settings() -> MailSettings {
    MailSettings {
        host: "smtp.example.com".to_string(),
        port: 587,
        username: "forms@example.com".to_string(),
        password: "secret".to_string(),
        recipient: "cfo@example.com".to_string(),
        sender: None,
        timeout_secs: 10,
    }
}

fn context(id: &str) -> InvocationContext {
    InvocationContext::new(id, "send-consultation")
}

const ANNA: &str =
    r#"{"name":"Anna","email":"anna@example.com","phone":"12345","message":"Please call me back"}"#;

#[tokio::test]
async fn test_valid_post_sends_notification() -> Result<()> {
    let mailer = RecordingMailer::default();
    let handler = RequestHandler::new(settings(), mailer.clone());

    let response = handler.handle(&ApiEvent::post(ANNA), &context("req-1")).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.header("Content-Type"), Some("application/json"));
    assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
    assert!(!response.is_base64_encoded);

    let body: serde_json::Value = serde_json::from_str(&response.body)?;
    assert_eq!(body["success"], true);
    assert_eq!(body["request_id"], "req-1");
    assert_eq!(body["message"], "Заявка успешно отправлена");

    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "cfo@example.com");
    assert!(sent[0].subject.ends_with("Anna"));
    assert!(sent[0].html_body.contains("Please call me back"));
    assert!(sent[0].html_body.contains("12345"));
    Ok(())
}

#[tokio::test]
async fn test_invalid_payload_is_rejected_without_sending() -> Result<()> {
    let mailer = RecordingMailer::default();
    let handler = RequestHandler::new(settings(), mailer.clone());

    let event = ApiEvent::post(r#"{"name":"","email":"x","phone":"1","message":"hi"}"#);
    let response = handler.handle(&event, &context("req-2")).await;

    assert_eq!(response.status_code, 400);
    assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
    let body: serde_json::Value = serde_json::from_str(&response.body)?;
    let fields: Vec<&str> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["name", "email", "phone", "message"]);
    assert!(mailer.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_each_constraint_blocks_delivery() {
    let cases = [
        r#"{"email":"anna@example.com","phone":"12345","message":"Please call me back"}"#,
        r#"{"name":"Anna","phone":"12345","message":"Please call me back"}"#,
        r#"{"name":"Anna","email":"anna@example.com","message":"Please call me back"}"#,
        r#"{"name":"Anna","email":"anna@example.com","phone":"12345"}"#,
        r#"{"name":"Anna","email":"anna.example.com","phone":"12345","message":"Please call me back"}"#,
        r#"{"name":"Anna","email":"anna@example.com","phone":"1234","message":"Please call me back"}"#,
        r#"{"name":"Anna","email":"anna@example.com","phone":"12345","message":"Call me"}"#,
    ];

    for body in cases {
        let mailer = RecordingMailer::default();
        let handler = RequestHandler::new(settings(), mailer.clone());
        let response = handler.handle(&ApiEvent::post(body), &context("req")).await;

        assert!(
            (400..500).contains(&response.status_code),
            "expected 4xx for {}",
            body
        );
        assert!(mailer.sent().is_empty(), "mailer invoked for {}", body);
    }
}

#[tokio::test]
async fn test_internationalized_emails_are_delivered() -> Result<()> {
    for email in ["иван@mail.ru", "anna@пример.рф", "анна@пример.рф"] {
        let mailer = RecordingMailer::default();
        let handler = RequestHandler::new(settings(), mailer.clone());
        let payload = serde_json::json!({
            "name": "Анна",
            "email": email,
            "phone": "12345",
            "message": "Перезвоните мне"
        });

        let response = handler
            .handle(&ApiEvent::post(payload.to_string()), &context("req-idn"))
            .await;

        assert_eq!(response.status_code, 200, "expected 200 for {}", email);
        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].reply_to.as_deref(), Some(email));
        assert!(sent[0].html_body.contains(email));
    }
    Ok(())
}

#[tokio::test]
async fn test_malformed_or_missing_body() -> Result<()> {
    let mailer = RecordingMailer::default();
    let handler = RequestHandler::new(settings(), mailer.clone());

    for event in [
        ApiEvent::new("POST", None),
        ApiEvent::post("not json"),
        ApiEvent::post("\"just a string\""),
    ] {
        let response = handler.handle(&event, &context("req-3")).await;
        assert_eq!(response.status_code, 400);
        let body: serde_json::Value = serde_json::from_str(&response.body)?;
        assert_eq!(body["error"], "Invalid request body");
    }
    assert!(mailer.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_options_preflight_ignores_body() {
    let mailer = RecordingMailer::default();
    let handler = RequestHandler::new(settings(), mailer.clone());

    for body in [None, Some("garbage".to_string()), Some(ANNA.to_string())] {
        let response = handler
            .handle(&ApiEvent::new("OPTIONS", body), &context("req-4"))
            .await;
        assert_eq!(response.status_code, 200);
        assert!(response.body.is_empty());
        assert_eq!(response.headers.len(), 4);
        assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
        assert_eq!(
            response.header("Access-Control-Allow-Methods"),
            Some("POST, OPTIONS")
        );
        assert_eq!(
            response.header("Access-Control-Allow-Headers"),
            Some("Content-Type")
        );
        assert_eq!(response.header("Access-Control-Max-Age"), Some("86400"));
    }
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_other_methods_are_not_allowed() -> Result<()> {
    let mailer = RecordingMailer::default();
    let handler = RequestHandler::new(settings(), mailer.clone());

    for method in ["GET", "PUT", "DELETE", "PATCH"] {
        let event = ApiEvent::new(method, Some(ANNA.to_string()));
        let response = handler.handle(&event, &context("req-5")).await;
        assert_eq!(response.status_code, 405);
        assert_eq!(response.body, r#"{"error": "Method not allowed"}"#);
    }

    // httpMethod 缺少時視為 GET
    let event: ApiEvent = serde_json::from_str(r#"{"body":"{}"}"#)?;
    let response = handler.handle(&event, &context("req-6")).await;
    assert_eq!(response.status_code, 405);

    assert!(mailer.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_transport_failure_becomes_502() -> Result<()> {
    let mailer = RecordingMailer::failing("535 5.7.8 authentication failed");
    let handler = RequestHandler::new(settings(), mailer.clone());

    let response = handler.handle(&ApiEvent::post(ANNA), &context("req-7")).await;

    assert_eq!(response.status_code, 502);
    assert_eq!(response.header("Access-Control-Allow-Origin"), Some("*"));
    let body: serde_json::Value = serde_json::from_str(&response.body)?;
    assert!(body.get("error").is_some());
    assert_eq!(body["request_id"], "req-7");
    assert!(!response.body.contains("535"));
    assert_eq!(mailer.sent().len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_missing_configuration_is_delivery_error() -> Result<()> {
    let mailer = RecordingMailer::default();
    let config = EnvConfig::with_lookup(|_| None);
    let handler = RequestHandler::new(config, mailer.clone());

    let response = handler.handle(&ApiEvent::post(ANNA), &context("req-8")).await;

    assert_eq!(response.status_code, 502);
    let body: serde_json::Value = serde_json::from_str(&response.body)?;
    assert_eq!(body["error"], "Failed to send consultation request");
    assert!(mailer.sent().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_identical_posts_send_twice() {
    let mailer = RecordingMailer::default();
    let handler = RequestHandler::new(settings(), mailer.clone());

    let first = handler.handle(&ApiEvent::post(ANNA), &context("a")).await;
    let second = handler.handle(&ApiEvent::post(ANNA), &context("b")).await;

    assert_eq!(first.status_code, 200);
    assert_eq!(second.status_code, 200);
    assert_eq!(mailer.sent().len(), 2);
}

#[tokio::test]
async fn test_concurrent_invocations_share_handler() {
    let mailer = RecordingMailer::default();
    let handler = Arc::new(RequestHandler::new(settings(), mailer.clone()));

    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let handler = handler.clone();
            tokio::spawn(async move {
                let response = handler
                    .handle(&ApiEvent::post(ANNA), &context(&format!("req-{}", i)))
                    .await;
                (i, response)
            })
        })
        .collect();

    for task in tasks {
        let (i, response) = task.await.unwrap();
        assert_eq!(response.status_code, 200);
        assert_eq!(
            response.json_body().unwrap()["request_id"],
            format!("req-{}", i)
        );
    }
    assert_eq!(mailer.sent().len(), 8);
}
