//! # Request Extractors
//!
//! - [`CallerIdentity`] — the authenticated user id forwarded by the
//!   upstream identity provider in `X-User-Id`. Absent for anonymous
//!   requests (demo mode).
//! - [`DemoFlag`] — the `?demo=true` query flag that substitutes fixtures
//!   for all backend and vendor calls.
//! - [`tenant_scope`] — resolves the organization every record operation is
//!   scoped by, turning the fatal resolution states into `403`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use custos_core::{OrgId, UserId};
use custos_tenant::TenantContext;

use crate::error::AppError;
use crate::state::AppState;

/// The authenticated caller, when the identity provider forwarded one.
#[derive(Debug, Clone, Copy)]
pub struct CallerIdentity(pub Option<UserId>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.headers.get("x-user-id") {
            None => Ok(Self(None)),
            Some(value) => {
                let raw = value
                    .to_str()
                    .map_err(|_| AppError::Unauthorized("malformed X-User-Id header".into()))?;
                let user = raw
                    .parse::<UserId>()
                    .map_err(|_| AppError::Unauthorized("X-User-Id is not a UUID".into()))?;
                Ok(Self(Some(user)))
            }
        }
    }
}

/// Whether the request carries `?demo=true`.
#[derive(Debug, Clone, Copy)]
pub struct DemoFlag(pub bool);

#[axum::async_trait]
impl<S> FromRequestParts<S> for DemoFlag
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let demo = parts
            .uri
            .query()
            .map(|q| {
                q.split('&')
                    .any(|pair| pair == "demo=true" || pair == "demo=1")
            })
            .unwrap_or(false);
        Ok(Self(demo))
    }
}

/// Resolve the tenant scope for a data operation.
///
/// Demo requests scope to the fixed demo organization without touching the
/// store. Anonymous non-demo requests are `401`; a signed-in user whose
/// resolution ends in a fatal state (no active organization) is `403` with
/// the resolver's message — the access-denied page, not a silent empty
/// list.
pub async fn tenant_scope(
    state: &AppState,
    caller: CallerIdentity,
    demo: DemoFlag,
) -> Result<(OrgId, TenantContext), AppError> {
    if !demo.0 && caller.0.is_none() {
        return Err(AppError::Unauthorized("sign-in required".into()));
    }
    let context = state.resolver.resolve(caller.0, demo.0).await;
    if let Some(message) = &context.error {
        return Err(AppError::Forbidden(message.clone()));
    }
    match context.organization_id {
        Some(org) => Ok((org, context)),
        None => Err(AppError::Unauthorized("sign-in required".into())),
    }
}
