//! API error taxonomy.
//!
//! Every handler and middleware fails with [`AppError`]; its `IntoResponse`
//! impl picks the HTTP status and renders `{"error": "<message>"}`.
//! Dependency failures are logged in full and redacted for the client.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::auth::password::PasswordError;
use crate::auth::token::TokenError;
use crate::mail::MailError;
use crate::store::StoreError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No bearer credential on the request.
    #[error("Access denied. No token provided.")]
    Unauthenticated,

    /// Credential present but its signature or expiry is bad.
    #[error("Invalid token.")]
    InvalidCredential,

    #[error("Forbidden: You do not have the right permissions")]
    Forbidden,

    /// Sign-in with unknown account or wrong password.
    #[error("Invalid credentials")]
    LoginFailed,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    /// Wrong, expired or absent one-time password.
    #[error("Invalid or expired OTP")]
    OtpInvalid,

    #[error("Failed to send email")]
    Mail(#[source] MailError),

    #[error("Internal server error")]
    Store(#[source] StoreError),

    #[error("Internal server error")]
    Token(#[source] TokenError),

    #[error("Internal server error")]
    Password(#[from] PasswordError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthenticated | Self::LoginFailed => StatusCode::UNAUTHORIZED,
            Self::InvalidCredential | Self::Validation(_) | Self::OtpInvalid => {
                StatusCode::BAD_REQUEST
            }
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Mail(_) => StatusCode::BAD_GATEWAY,
            Self::Store(_) | Self::Token(_) | Self::Password(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(field) => Self::Conflict(format!("{field} already exists")),
            other => Self::Store(other),
        }
    }
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        Self::Mail(err)
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        Self::Token(err)
    }
}

/// JSON body for every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Forbidden: You do not have the right permissions")]
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            Self::Mail(source) => tracing::error!(error = %source, "email dispatch failed"),
            Self::Store(source) => tracing::error!(error = ?source, "store operation failed"),
            Self::Token(source) => tracing::error!(error = %source, "token signing failed"),
            Self::Password(source) => tracing::error!(error = %source, "password hashing failed"),
            _ => tracing::debug!(error = %self, "request rejected"),
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_statuses() {
        assert_eq!(AppError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidCredential.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Forbidden.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_domain_statuses() {
        assert_eq!(AppError::OtpInvalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::NotFound("Job not found").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("email already exists".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Mail(MailError::Rejected(503)).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_store_conflict_maps_to_conflict() {
        let err = AppError::from(StoreError::Conflict("email"));
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.to_string(), "email already exists");
    }

    #[test]
    fn test_store_failure_is_redacted() {
        let err = AppError::from(StoreError::Corrupt("role column held 'root'".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Internal server error");
    }
}
