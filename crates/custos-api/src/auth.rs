//! # Authentication Middleware
//!
//! Static bearer-token check for every `/v1` route. User identity itself
//! comes from the upstream identity provider, which terminates the session
//! and forwards the authenticated user id in the `X-User-Id` header — this
//! service never sees credentials beyond the shared API token.

use axum::extract::Request;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use axum::Extension;

use crate::error::AppError;

/// Token configuration attached to the router as an extension.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    /// Expected bearer token. `None` disables the check.
    pub token: Option<String>,
}

/// Reject requests without the configured bearer token.
pub async fn auth_middleware(
    Extension(config): Extension<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = &config.token {
        let supplied = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        match supplied {
            Some(token) if token == expected => {}
            Some(_) => return Err(AppError::Unauthorized("invalid bearer token".into())),
            None => return Err(AppError::Unauthorized("missing bearer token".into())),
        }
    }
    Ok(next.run(request).await)
}
