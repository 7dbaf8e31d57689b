//! Request extractors that validate before the handler runs.
//!
//! Handlers take `ValidatedJson<T>` / `ValidatedQuery<T>` instead of the
//! plain axum extractors, so malformed bodies and rule violations are turned
//! into `400 {"error": ...}` without reaching business code.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

/// First failing rule, ordered by field name so the message is stable.
pub fn first_violation(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .into_iter()
        .find_map(|(field, errs)| {
            errs.first().map(|e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("\"{field}\" is invalid"),
            })
        })
        .unwrap_or_else(|| "invalid request".to_string())
}

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::Validation(first_violation(&e)))?;

        Ok(ValidatedJson(value))
    }
}

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        value
            .validate()
            .map_err(|e| AppError::Validation(first_violation(&e)))?;

        Ok(ValidatedQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http, http::StatusCode, routing::post};
    use http_body_util::BodyExt;
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize, Validate)]
    struct Probe {
        #[validate(email(message = "\"email\" must be a valid email"))]
        email: String,
        #[validate(length(min = 1, message = "\"name\" is not allowed to be empty"))]
        name: String,
    }

    async fn echo(ValidatedJson(probe): ValidatedJson<Probe>) -> String {
        probe.name
    }

    fn app() -> Router {
        Router::new().route("/", post(echo))
    }

    async fn send(body: &str) -> (StatusCode, String) {
        let resp = app()
            .oneshot(
                http::Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_valid_body_reaches_handler() {
        let (status, body) = send(r#"{"email":"a@b.co","name":"ada"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ada");
    }

    #[tokio::test]
    async fn test_rule_violation_is_400_with_message() {
        let (status, body) = send(r#"{"email":"a@b.co","name":""}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "\"name\" is not allowed to be empty");
    }

    #[tokio::test]
    async fn test_first_violation_is_ordered_by_field() {
        let (_, body) = send(r#"{"email":"nope","name":""}"#).await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "\"email\" must be a valid email");
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let (status, body) = send(r#"{"email":"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("error"));
    }
}
