//! # Generic Record Routes
//!
//! One set of handlers serves every record table in the schema catalog.
//! The table name in the path selects the schema; validation, filtering,
//! and persistence are all driven from it. Unknown tables are 404 before
//! anything touches the store, and a validation failure never issues a
//! store call.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use custos_core::RecordId;
use custos_registry::{schema_for, RecordSchema, RowFilter};
use custos_store::RecordRow;

use crate::error::AppError;
use crate::extractors::{tenant_scope, CallerIdentity, DemoFlag};
use crate::state::AppState;

/// Request body for record creation and update: the field map the form
/// collected. The organization id is attached server-side from the
/// resolved tenant scope, never taken from the client.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordBody {
    #[schema(value_type = Object)]
    pub fields: Map<String, Value>,
}

/// A record list response.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecordList {
    pub table: String,
    pub total: usize,
    /// Rows remaining after search/equality filters.
    #[schema(value_type = Vec<Object>)]
    pub records: Vec<RecordRow>,
}

/// Build the records router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/records/:table", get(list_records).post(create_record))
        .route("/v1/records/:table/schema", get(get_schema))
        .route(
            "/v1/records/:table/:id",
            get(get_record).put(update_record).delete(delete_record),
        )
}

fn require_schema(table: &str) -> Result<&'static RecordSchema, AppError> {
    schema_for(table).ok_or_else(|| AppError::NotFound(format!("unknown record table '{table}'")))
}

/// Parse `q` and `filter.<field>` query parameters into a row filter.
fn parse_filter(params: &HashMap<String, String>) -> RowFilter {
    RowFilter {
        q: params.get("q").filter(|v| !v.is_empty()).cloned(),
        equals: params
            .iter()
            .filter_map(|(key, value)| {
                key.strip_prefix("filter.")
                    .map(|field| (field.to_string(), value.clone()))
            })
            .collect(),
    }
}

/// GET /v1/records/{table}/schema — the field list driving the add form.
#[utoipa::path(
    get,
    path = "/v1/records/{table}/schema",
    params(("table" = String, Path, description = "Record table name")),
    responses(
        (status = 200, description = "The table's field schema"),
        (status = 404, description = "Unknown table"),
    ),
)]
pub(crate) async fn get_schema(Path(table): Path<String>) -> Result<Json<&'static RecordSchema>, AppError> {
    Ok(Json(require_schema(&table)?))
}

/// GET /v1/records/{table} — list rows, newest first, with optional
/// in-memory filters (`q`, `filter.<field>=value`).
#[utoipa::path(
    get,
    path = "/v1/records/{table}",
    params(
        ("table" = String, Path, description = "Record table name"),
        ("q" = Option<String>, Query, description = "Case-insensitive text search"),
    ),
    responses(
        (status = 200, description = "Rows for the caller's organization", body = RecordList),
        (status = 404, description = "Unknown table"),
    ),
)]
pub(crate) async fn list_records(
    State(state): State<AppState>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    caller: CallerIdentity,
    demo: DemoFlag,
) -> Result<Json<RecordList>, AppError> {
    let schema = require_schema(&table)?;
    let (org, _) = tenant_scope(&state, caller, demo).await?;

    let rows = state.store.list_records(schema.table, org).await?;
    let total = rows.len();
    let filter = parse_filter(&params);
    let records = if filter.is_empty() {
        rows
    } else {
        rows.into_iter()
            .filter(|row| filter.matches(schema, &row.fields))
            .collect()
    };

    Ok(Json(RecordList {
        table: schema.table.to_string(),
        total,
        records,
    }))
}

/// POST /v1/records/{table} — validate and insert one record.
///
/// A failed validation returns 422 with per-field messages and performs no
/// store call at all.
#[utoipa::path(
    post,
    path = "/v1/records/{table}",
    params(("table" = String, Path, description = "Record table name")),
    request_body = RecordBody,
    responses(
        (status = 201, description = "Record created"),
        (status = 404, description = "Unknown table"),
        (status = 422, description = "Validation failed; details keyed by field name"),
    ),
)]
pub(crate) async fn create_record(
    State(state): State<AppState>,
    Path(table): Path<String>,
    caller: CallerIdentity,
    demo: DemoFlag,
    Json(body): Json<RecordBody>,
) -> Result<(axum::http::StatusCode, Json<RecordRow>), AppError> {
    let schema = require_schema(&table)?;
    schema.validate(&body.fields).map_err(AppError::FieldValidation)?;
    let (org, _) = tenant_scope(&state, caller, demo).await?;

    let row = state.store.insert_record(schema.table, org, body.fields).await?;
    tracing::info!(table = schema.table, id = %row.id, org = %org, "record created");
    Ok((axum::http::StatusCode::CREATED, Json(row)))
}

/// GET /v1/records/{table}/{id}
#[utoipa::path(
    get,
    path = "/v1/records/{table}/{id}",
    params(
        ("table" = String, Path, description = "Record table name"),
        ("id" = String, Path, description = "Record id"),
    ),
    responses(
        (status = 200, description = "The record"),
        (status = 404, description = "Unknown table or record"),
    ),
)]
pub(crate) async fn get_record(
    State(state): State<AppState>,
    Path((table, id)): Path<(String, RecordId)>,
    caller: CallerIdentity,
    demo: DemoFlag,
) -> Result<Json<RecordRow>, AppError> {
    let schema = require_schema(&table)?;
    let (org, _) = tenant_scope(&state, caller, demo).await?;
    let row = state
        .store
        .get_record(schema.table, org, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no such record in '{table}'")))?;
    Ok(Json(row))
}

/// PUT /v1/records/{table}/{id} — validate and replace the field map.
#[utoipa::path(
    put,
    path = "/v1/records/{table}/{id}",
    params(
        ("table" = String, Path, description = "Record table name"),
        ("id" = String, Path, description = "Record id"),
    ),
    request_body = RecordBody,
    responses(
        (status = 200, description = "Record updated"),
        (status = 404, description = "Unknown table or record"),
        (status = 422, description = "Validation failed"),
    ),
)]
pub(crate) async fn update_record(
    State(state): State<AppState>,
    Path((table, id)): Path<(String, RecordId)>,
    caller: CallerIdentity,
    demo: DemoFlag,
    Json(body): Json<RecordBody>,
) -> Result<Json<RecordRow>, AppError> {
    let schema = require_schema(&table)?;
    schema.validate(&body.fields).map_err(AppError::FieldValidation)?;
    let (org, _) = tenant_scope(&state, caller, demo).await?;

    let updated = state
        .store
        .update_record(schema.table, org, id, body.fields)
        .await?;
    if !updated {
        return Err(AppError::NotFound(format!("no such record in '{table}'")));
    }
    let row = state
        .store
        .get_record(schema.table, org, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no such record in '{table}'")))?;
    Ok(Json(row))
}

/// DELETE /v1/records/{table}/{id} — hard delete. The browser-side
/// confirmation dialog is the only gate; there is no soft-delete.
#[utoipa::path(
    delete,
    path = "/v1/records/{table}/{id}",
    params(
        ("table" = String, Path, description = "Record table name"),
        ("id" = String, Path, description = "Record id"),
    ),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 404, description = "Unknown table or record"),
    ),
)]
pub(crate) async fn delete_record(
    State(state): State<AppState>,
    Path((table, id)): Path<(String, RecordId)>,
    caller: CallerIdentity,
    demo: DemoFlag,
) -> Result<axum::http::StatusCode, AppError> {
    let schema = require_schema(&table)?;
    let (org, _) = tenant_scope(&state, caller, demo).await?;
    let deleted = state.store.delete_record(schema.table, org, id).await?;
    if !deleted {
        return Err(AppError::NotFound(format!("no such record in '{table}'")));
    }
    tracing::info!(table = schema.table, id = %id, org = %org, "record deleted");
    Ok(axum::http::StatusCode::NO_CONTENT)
}
