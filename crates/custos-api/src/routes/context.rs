//! # Tenant Context Routes
//!
//! The session's organization scope: resolution (with the demo-mode short
//! circuit and the self-healing fallback), the organization switcher, and
//! the list of organizations the caller may switch to.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use custos_core::{OrgId, Organization, UserProfile};
use custos_tenant::TenantContext;

use crate::error::AppError;
use crate::extractors::{CallerIdentity, DemoFlag};
use crate::state::AppState;

/// Resolved tenant context, as the dashboard consumes it.
#[derive(Debug, Serialize, ToSchema)]
pub struct ContextResponse {
    #[schema(value_type = Option<String>)]
    pub organization_id: Option<OrgId>,
    #[schema(value_type = Option<Object>)]
    pub profile: Option<UserProfile>,
    pub error: Option<String>,
}

impl From<TenantContext> for ContextResponse {
    fn from(context: TenantContext) -> Self {
        Self {
            organization_id: context.organization_id,
            profile: context.profile,
            error: context.error,
        }
    }
}

/// Request body for an organization switch.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SwitchRequest {
    #[schema(value_type = String)]
    pub organization_id: OrgId,
}

/// Build the context router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/context", get(get_context))
        .route("/v1/context/switch", post(switch_organization))
        .route("/v1/organizations", get(list_organizations))
}

/// GET /v1/context — resolve the session's organization scope.
///
/// Resolution may repair a stale profile pointer as a side effect; the
/// response always reflects the post-repair state. Fatal states (no active
/// organization) are reported in `error` with `organization_id` null — the
/// dashboard renders its access-denied page from this body, so this
/// endpoint returns 200 even then.
#[utoipa::path(
    get,
    path = "/v1/context",
    params(("demo" = Option<bool>, Query, description = "Demo mode: resolve to the fixture organization without backend calls")),
    responses((status = 200, description = "Resolved tenant context", body = ContextResponse)),
)]
pub(crate) async fn get_context(
    State(state): State<AppState>,
    caller: CallerIdentity,
    demo: DemoFlag,
) -> Json<ContextResponse> {
    let context = state.resolver.resolve(caller.0, demo.0).await;
    Json(context.into())
}

/// POST /v1/context/switch — point the session at another organization.
///
/// Returns the freshly resolved context. Callers re-fetch their
/// tenant-scoped queries with the new id; there is no page-reload step.
#[utoipa::path(
    post,
    path = "/v1/context/switch",
    request_body = SwitchRequest,
    responses(
        (status = 200, description = "Switched; the new resolved context", body = ContextResponse),
        (status = 403, description = "Caller is not a member of the target organization"),
        (status = 409, description = "Target organization is inactive"),
    ),
)]
pub(crate) async fn switch_organization(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Json(body): Json<SwitchRequest>,
) -> Result<Json<ContextResponse>, AppError> {
    let Some(user) = caller.0 else {
        return Err(AppError::Unauthorized("sign-in required".into()));
    };
    let context = state
        .resolver
        .switch_organization(user, body.organization_id)
        .await?;
    Ok(Json(context.into()))
}

/// GET /v1/organizations — the active organizations the caller may switch to.
#[utoipa::path(
    get,
    path = "/v1/organizations",
    responses((status = 200, description = "Active organizations the caller belongs to")),
)]
pub(crate) async fn list_organizations(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Result<Json<Vec<Organization>>, AppError> {
    let Some(user) = caller.0 else {
        return Err(AppError::Unauthorized("sign-in required".into()));
    };
    let organizations = state.resolver.switchable_organizations(user).await?;
    Ok(Json(organizations))
}
