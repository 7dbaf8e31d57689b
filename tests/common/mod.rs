//! Shared harness: an in-memory app plus JSON request helpers.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use job_board::AppState;
use job_board::auth::TokenService;
use job_board::gateway;
use job_board::mail::{EmailMessage, EmailSender, MailError, MailFrom};
use job_board::otp::{ManualClock, OtpManager};
use job_board::store::MemoryStore;

pub const SECRET: &str = "integration-test-secret";

/// Keeps every message it is asked to send.
#[derive(Default)]
pub struct RecordingEmailSender {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingEmailSender {
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// The 6-digit code in the latest message to `to`.
    pub fn last_code_for(&self, to: &str) -> Option<String> {
        self.sent()
            .iter()
            .rev()
            .find(|m| m.to == to)
            .and_then(|m| {
                m.body
                    .split(|c: char| !c.is_ascii_digit())
                    .find(|part| part.len() == 6)
                    .map(str::to_string)
            })
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

/// Relay that always refuses.
pub struct FailingEmailSender;

#[async_trait]
impl EmailSender for FailingEmailSender {
    async fn send(&self, _message: &EmailMessage) -> Result<(), MailError> {
        Err(MailError::Rejected(503))
    }
}

pub struct TestApp {
    pub router: Router,
    pub otp: Arc<OtpManager>,
    pub clock: Arc<ManualClock>,
    pub mailbox: Arc<RecordingEmailSender>,
}

fn mail_from() -> MailFrom {
    MailFrom {
        name: "Job Board".into(),
        address: "no-reply@jobboard.local".into(),
    }
}

fn tokens() -> Arc<TokenService> {
    Arc::new(TokenService::new(SECRET, chrono::Duration::hours(1)))
}

pub fn app() -> TestApp {
    let clock = Arc::new(ManualClock::default());
    let otp = Arc::new(OtpManager::with_clock(
        chrono::Duration::minutes(5),
        clock.clone(),
    ));
    let mailbox = Arc::new(RecordingEmailSender::default());
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        tokens(),
        otp.clone(),
        mailbox.clone(),
        mail_from(),
    );
    TestApp {
        router: gateway::router(Arc::new(state)),
        otp,
        clock,
        mailbox,
    }
}

/// App whose mail relay rejects everything.
pub fn app_with_failing_mail() -> (Router, Arc<OtpManager>) {
    let otp = Arc::new(OtpManager::new(chrono::Duration::minutes(5)));
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        tokens(),
        otp.clone(),
        Arc::new(FailingEmailSender),
        mail_from(),
    );
    (gateway::router(Arc::new(state)), otp)
}

pub async fn call(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

pub fn signup_body(email: &str, mobile: &str, role: &str) -> Value {
    json!({
        "firstName": "Test",
        "lastName": "Person",
        "email": email,
        "password": "secret-pw",
        "recoveryEmail": "recovery@example.com",
        "DOB": "1995-04-21",
        "mobileNumber": mobile,
        "role": role,
    })
}

/// Register and sign in; returns (user id, token).
pub async fn register(router: &Router, email: &str, mobile: &str, role: &str) -> (String, String) {
    let (status, body) = call(
        router,
        Method::POST,
        "/api/users/signup",
        None,
        Some(signup_body(email, mobile, role)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let id = body["user"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(
        router,
        Method::POST,
        "/api/users/signin",
        None,
        Some(json!({ "email": email, "password": "secret-pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    (id, body["token"].as_str().unwrap().to_string())
}

pub fn company_body(name: &str, email: &str) -> Value {
    json!({
        "companyName": name,
        "description": "Builds things",
        "industry": "Software",
        "address": "1 Main St",
        "numberOfEmployees": "11-20",
        "companyEmail": email,
    })
}

pub fn job_body(title: &str) -> Value {
    json!({
        "jobTitle": title,
        "jobLocation": "remotely",
        "workingTime": "full-time",
        "seniorityLevel": "Junior",
        "jobDescription": "Write Rust",
        "technicalSkills": ["rust", "sql"],
        "softSkills": ["communication"],
    })
}
