//! Outbound email.
//!
//! The account service builds an [`EmailMessage`] and hands it to whichever
//! [`EmailSender`] the server was configured with:
//! - [`LogEmailSender`]: development default, writes the message to the log
//! - [`RelayEmailSender`]: POSTs the message as JSON to an HTTP mail relay,
//!   authenticating with `EMAIL_USER` / `EMAIL_PASS`

use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail relay request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mail relay answered with status {0}")]
    Rejected(u16),
}

/// Sender identity stamped on every outgoing message.
#[derive(Debug, Clone, Serialize)]
pub struct MailFrom {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailMessage {
    pub from_name: String,
    pub from_address: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    /// Password-reset mail carrying a one-time code.
    pub fn password_reset(from: &MailFrom, to: &str, code: &str, valid_minutes: i64) -> Self {
        Self {
            from_name: from.name.clone(),
            from_address: from.address.clone(),
            to: to.to_string(),
            subject: "Password Reset OTP".to_string(),
            body: format!(
                "Your OTP for password reset is {code}. It expires in {valid_minutes} minutes."
            ),
        }
    }
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError>;
}

#[derive(Debug, Clone, Default)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "email not delivered: no relay configured"
        );
        Ok(())
    }
}

pub struct RelayEmailSender {
    client: reqwest::Client,
    endpoint: String,
    username: String,
    password: String,
}

impl RelayEmailSender {
    pub fn new(
        endpoint: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

#[async_trait]
impl EmailSender for RelayEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), MailError> {
        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailError::Rejected(status.as_u16()));
        }
        tracing::debug!(to = %message.to, "email handed to relay");
        Ok(())
    }
}
