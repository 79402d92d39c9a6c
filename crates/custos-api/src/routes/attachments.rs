//! # Attachment Routes
//!
//! Content-addressed file attachments for record tables that declare a
//! `file_digest` field. Uploads are raw bodies; the digest written back to
//! the record is the SHA-256 of the content, so re-uploading the same file
//! is a no-op at the blob layer.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

use custos_core::RecordId;
use custos_registry::schema_for;

use crate::error::AppError;
use crate::extractors::{tenant_scope, CallerIdentity, DemoFlag};
use crate::state::AppState;

/// Response for an attachment upload.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// SHA-256 hex digest of the stored content.
    pub digest: String,
    pub size: usize,
}

/// Build the attachments router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/records/:table/:id/attachments", post(upload_attachment))
        .route("/v1/attachments/:digest", get(download_attachment))
}

/// POST /v1/records/{table}/{id}/attachment — attach a file to a record.
///
/// The raw request body is stored as a content-addressed blob and the
/// record's `file_digest` field is set to its digest. Tables without a
/// `file_digest` field reject the upload.
#[utoipa::path(
    post,
    path = "/v1/records/{table}/{id}/attachments",
    params(
        ("table" = String, Path, description = "Record table name"),
        ("id" = String, Path, description = "Record id"),
    ),
    responses(
        (status = 200, description = "Stored; digest written to the record", body = UploadResponse),
        (status = 404, description = "Unknown table or record"),
        (status = 422, description = "Table has no attachment field, or the body is empty"),
    ),
)]
pub(crate) async fn upload_attachment(
    State(state): State<AppState>,
    Path((table, id)): Path<(String, RecordId)>,
    caller: CallerIdentity,
    demo: DemoFlag,
    body: Bytes,
) -> Result<Json<UploadResponse>, AppError> {
    let schema = schema_for(&table)
        .ok_or_else(|| AppError::NotFound(format!("unknown record table '{table}'")))?;
    if schema.field("file_digest").is_none() {
        return Err(AppError::Validation(format!(
            "table '{table}' does not accept attachments"
        )));
    }
    if body.is_empty() {
        return Err(AppError::Validation("attachment body is empty".into()));
    }
    let (org, _) = tenant_scope(&state, caller, demo).await?;

    let mut row = state
        .store
        .get_record(schema.table, org, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("no such record in '{table}'")))?;

    let digest = state.attachments.put(&body).await?;
    row.fields.insert("file_digest".into(), json!(digest));
    state
        .store
        .update_record(schema.table, org, id, row.fields)
        .await?;

    tracing::info!(table = schema.table, id = %id, digest = %digest, "attachment stored");
    Ok(Json(UploadResponse {
        digest,
        size: body.len(),
    }))
}

/// GET /v1/attachments/{digest} — fetch a stored blob by digest.
#[utoipa::path(
    get,
    path = "/v1/attachments/{digest}",
    params(("digest" = String, Path, description = "SHA-256 hex digest")),
    responses(
        (status = 200, description = "The blob", content_type = "application/octet-stream"),
        (status = 404, description = "No blob with this digest"),
    ),
)]
pub(crate) async fn download_attachment(
    State(state): State<AppState>,
    Path(digest): Path<String>,
    caller: CallerIdentity,
    demo: DemoFlag,
) -> Result<(StatusCode, HeaderMap, Vec<u8>), AppError> {
    tenant_scope(&state, caller, demo).await?;
    let bytes = state
        .attachments
        .get(&digest)
        .await?
        .ok_or_else(|| AppError::NotFound("no attachment with this digest".into()))?;
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/octet-stream"),
    );
    Ok((StatusCode::OK, headers, bytes))
}
