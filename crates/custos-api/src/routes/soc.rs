//! # SOC Proxy Routes
//!
//! Thin proxy in front of the antivirus vendor API. The vendor key lives in
//! server configuration only; browsers never talk to the vendor directly.
//! Demo requests are served by the simulated adapter even when a live
//! vendor is configured. Scan starts are journaled into the `scan_tasks`
//! record table so the SOC page keeps its history even when the vendor
//! call fails.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use utoipa::ToSchema;

use custos_core::OrgId;
use custos_sentinel::{
    CommandAck, EndpointInfo, EndpointPatch, RemoteCommand, ScanStatus, SecurityEvent,
};
use custos_store::RecordRow;

use crate::error::AppError;
use crate::extractors::{tenant_scope, CallerIdentity, DemoFlag};
use crate::state::AppState;

/// Request body for a remote command dispatch.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CommandRequest {
    #[schema(value_type = String, example = "isolate")]
    pub command: RemoteCommand,
}

/// Build the SOC router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/soc/endpoints", get(list_endpoints))
        .route("/v1/soc/endpoints/:id", patch(update_endpoint))
        .route("/v1/soc/endpoints/:id/command", post(send_command))
        .route("/v1/soc/endpoints/:id/scan", post(start_scan))
        .route("/v1/soc/events", get(list_events))
        .route("/v1/soc/scans/:scan_id", get(scan_status))
        .route(
            "/v1/soc/scan-tasks",
            get(list_scan_tasks).post(create_scan_task),
        )
}

/// GET /v1/soc/endpoints — the vendor's endpoint inventory.
#[utoipa::path(
    get,
    path = "/v1/soc/endpoints",
    responses(
        (status = 200, description = "Endpoint inventory"),
        (status = 502, description = "Vendor unreachable or returned an error"),
        (status = 503, description = "Vendor not configured"),
    ),
)]
pub(crate) async fn list_endpoints(
    State(state): State<AppState>,
    caller: CallerIdentity,
    demo: DemoFlag,
) -> Result<Json<Vec<EndpointInfo>>, AppError> {
    tenant_scope(&state, caller, demo).await?;
    Ok(Json(state.sentinel_for(demo.0).list_endpoints().await?))
}

/// GET /v1/soc/events — the vendor's detection event feed.
#[utoipa::path(
    get,
    path = "/v1/soc/events",
    responses(
        (status = 200, description = "Security event feed"),
        (status = 502, description = "Vendor unreachable or returned an error"),
    ),
)]
pub(crate) async fn list_events(
    State(state): State<AppState>,
    caller: CallerIdentity,
    demo: DemoFlag,
) -> Result<Json<Vec<SecurityEvent>>, AppError> {
    tenant_scope(&state, caller, demo).await?;
    Ok(Json(state.sentinel_for(demo.0).list_events().await?))
}

/// PATCH /v1/soc/endpoints/{id} — update label or isolation state.
#[utoipa::path(
    patch,
    path = "/v1/soc/endpoints/{id}",
    params(("id" = String, Path, description = "Vendor endpoint id")),
    responses(
        (status = 200, description = "Updated endpoint"),
        (status = 502, description = "Vendor rejected the update"),
    ),
)]
pub(crate) async fn update_endpoint(
    State(state): State<AppState>,
    Path(id): Path<String>,
    caller: CallerIdentity,
    demo: DemoFlag,
    Json(patch): Json<EndpointPatch>,
) -> Result<Json<EndpointInfo>, AppError> {
    tenant_scope(&state, caller, demo).await?;
    let endpoint = state.sentinel_for(demo.0).update_endpoint(&id, &patch).await?;
    tracing::info!(endpoint = %id, "endpoint updated");
    Ok(Json(endpoint))
}

/// POST /v1/soc/endpoints/{id}/command — dispatch a remote command.
#[utoipa::path(
    post,
    path = "/v1/soc/endpoints/{id}/command",
    params(("id" = String, Path, description = "Vendor endpoint id")),
    request_body = CommandRequest,
    responses(
        (status = 200, description = "Command acknowledged"),
        (status = 502, description = "Vendor rejected the command"),
    ),
)]
pub(crate) async fn send_command(
    State(state): State<AppState>,
    Path(id): Path<String>,
    caller: CallerIdentity,
    demo: DemoFlag,
    Json(body): Json<CommandRequest>,
) -> Result<Json<CommandAck>, AppError> {
    tenant_scope(&state, caller, demo).await?;
    let ack = state.sentinel_for(demo.0).send_command(&id, body.command).await?;
    tracing::info!(endpoint = %id, command = body.command.as_str(), "remote command dispatched");
    Ok(Json(ack))
}

fn scan_task_fields(endpoint_id: &str, status: &str, scan_id: Option<&str>, note: Option<&str>) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("endpoint_id".into(), json!(endpoint_id));
    fields.insert("status".into(), json!(status));
    fields.insert(
        "started_at".into(),
        json!(Utc::now().date_naive().format("%Y-%m-%d").to_string()),
    );
    if let Some(scan_id) = scan_id {
        fields.insert("scan_id".into(), json!(scan_id));
    }
    if let Some(note) = note {
        fields.insert("note".into(), json!(note));
    }
    fields
}

pub(crate) async fn journal_scan_task(state: &AppState, org: OrgId, fields: Map<String, Value>) {
    if let Err(error) = state.store.insert_record("scan_tasks", org, fields).await {
        tracing::warn!(%error, "failed to journal scan task");
    }
}

/// POST /v1/soc/endpoints/{id}/scan — start an on-demand scan.
///
/// The start is journaled as a `scan_tasks` record either way: a vendor
/// failure produces a `failed` task with the error as its note, so the scan
/// history reflects the attempt.
#[utoipa::path(
    post,
    path = "/v1/soc/endpoints/{id}/scan",
    params(("id" = String, Path, description = "Vendor endpoint id")),
    responses(
        (status = 202, description = "Scan accepted by the vendor"),
        (status = 502, description = "Vendor refused the scan; a failed task was journaled"),
    ),
)]
pub(crate) async fn start_scan(
    State(state): State<AppState>,
    Path(id): Path<String>,
    caller: CallerIdentity,
    demo: DemoFlag,
) -> Result<(StatusCode, Json<ScanStatus>), AppError> {
    let (org, _) = tenant_scope(&state, caller, demo).await?;
    match state.sentinel_for(demo.0).start_scan(&id).await {
        Ok(status) => {
            let state_label = match status.state {
                custos_sentinel::ScanState::Queued => "queued",
                custos_sentinel::ScanState::Running => "running",
                custos_sentinel::ScanState::Completed => "completed",
                custos_sentinel::ScanState::Failed => "failed",
            };
            journal_scan_task(
                &state,
                org,
                scan_task_fields(&id, state_label, Some(&status.scan_id), None),
            )
            .await;
            tracing::info!(endpoint = %id, scan = %status.scan_id, "scan started");
            Ok((StatusCode::ACCEPTED, Json(status)))
        }
        Err(error) => {
            journal_scan_task(
                &state,
                org,
                scan_task_fields(&id, "failed", None, Some(&error.to_string())),
            )
            .await;
            Err(error.into())
        }
    }
}

/// GET /v1/soc/scans/{scan_id} — poll a scan's progress.
#[utoipa::path(
    get,
    path = "/v1/soc/scans/{scan_id}",
    params(("scan_id" = String, Path, description = "Vendor scan id")),
    responses(
        (status = 200, description = "Current scan status"),
        (status = 502, description = "Vendor error; unknown scans surface here"),
    ),
)]
pub(crate) async fn scan_status(
    State(state): State<AppState>,
    Path(scan_id): Path<String>,
    caller: CallerIdentity,
    demo: DemoFlag,
) -> Result<Json<ScanStatus>, AppError> {
    tenant_scope(&state, caller, demo).await?;
    Ok(Json(state.sentinel_for(demo.0).scan_status(&scan_id).await?))
}

/// POST /v1/soc/scan-tasks — record a scan task manually.
///
/// Validated against the `scan_tasks` schema like any other record; the
/// scan-start handler journals automatic entries through the same table.
#[utoipa::path(
    post,
    path = "/v1/soc/scan-tasks",
    responses(
        (status = 201, description = "Scan task recorded"),
        (status = 422, description = "Validation failed"),
    ),
)]
pub(crate) async fn create_scan_task(
    State(state): State<AppState>,
    caller: CallerIdentity,
    demo: DemoFlag,
    Json(fields): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<RecordRow>), AppError> {
    let schema = custos_registry::schema_for("scan_tasks")
        .ok_or_else(|| AppError::Internal("scan_tasks schema missing".into()))?;
    schema.validate(&fields).map_err(AppError::FieldValidation)?;
    let (org, _) = tenant_scope(&state, caller, demo).await?;
    let row = state.store.insert_record("scan_tasks", org, fields).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /v1/soc/scan-tasks — the journaled scan history, newest first.
#[utoipa::path(
    get,
    path = "/v1/soc/scan-tasks",
    responses((status = 200, description = "Journaled scan tasks")),
)]
pub(crate) async fn list_scan_tasks(
    State(state): State<AppState>,
    caller: CallerIdentity,
    demo: DemoFlag,
) -> Result<Json<Vec<RecordRow>>, AppError> {
    let (org, _) = tenant_scope(&state, caller, demo).await?;
    Ok(Json(state.store.list_records("scan_tasks", org).await?))
}
