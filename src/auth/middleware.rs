//! Bearer-token authentication middleware.
//!
//! Runs in front of every protected route. A missing credential fails with
//! 401, a credential that does not verify fails with 400. On success the
//! caller's [`Identity`] is inserted into request extensions.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};

use super::models::Identity;
use super::token::TokenService;
use crate::error::AppError;

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

pub async fn authenticate(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or(AppError::Unauthenticated)?;

    let identity: Identity = tokens.verify(token).map_err(|e| {
        tracing::debug!(error = %e, "bearer token rejected");
        AppError::InvalidCredential
    })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;
    use axum::{
        Extension, Router,
        http::{HeaderValue, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
    };
    use chrono::Duration;
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn whoami(Extension(identity): Extension<Identity>) -> String {
        identity.role.to_string()
    }

    fn app(tokens: Arc<TokenService>) -> Router {
        Router::new()
            .route("/me", get(whoami))
            .layer(from_fn_with_state(tokens, authenticate))
    }

    fn tokens(secret: &str) -> Arc<TokenService> {
        Arc::new(TokenService::new(secret, Duration::hours(24)))
    }

    async fn call(app: Router, auth: Option<&str>) -> (StatusCode, String) {
        let mut req = Request::builder().uri("/me");
        if let Some(value) = auth {
            req = req.header(header::AUTHORIZATION, value);
        }
        let resp = app.oneshot(req.body(Body::empty()).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthenticated() {
        let (status, body) = call(app(tokens("k")), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("No token provided"));
    }

    #[tokio::test]
    async fn test_foreign_signature_is_invalid_credential() {
        let forged = tokens("other").issue(Uuid::new_v4(), Role::User).unwrap();
        let (status, body) =
            call(app(tokens("k")), Some(&format!("Bearer {forged}"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Invalid token."));
    }

    #[tokio::test]
    async fn test_valid_token_exposes_role() {
        let tokens = tokens("k");
        let token = tokens.issue(Uuid::new_v4(), Role::CompanyHr).unwrap();
        let (status, body) = call(app(tokens), Some(&format!("Bearer {token}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Company_HR");
    }
}
