//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`. Maps
//! store, tenant, and vendor errors to HTTP status codes with a JSON body
//! of `{error: {code, message, details?}}`. Internal and upstream error
//! messages are logged but never exposed to clients; the two Postgres
//! constraint codes the add-record form handles specially arrive here with
//! their friendlier messages already applied.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use custos_core::ValidationError;
use custos_registry::friendly_constraint_message;
use custos_sentinel::SentinelError;
use custos_store::StoreError;
use custos_tenant::TenantError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Per-field validation errors, present only for 422 responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`].
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Field-level validation failures (422). Keyed by field name so the
    /// form can annotate each offending input.
    #[error("validation failed for {} field(s)", .0.len())]
    FieldValidation(Vec<ValidationError>),

    /// Authentication failure (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authorization failure — including the fatal "no active
    /// organization" states (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500). Logged, not returned to the client.
    #[error("internal error: {0}")]
    Internal(String),

    /// The antivirus vendor returned an error or is unreachable (502).
    #[error("upstream vendor error: {0}")]
    Upstream(String),

    /// A dependency is not configured (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) | Self::FieldValidation(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            }
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal/upstream details to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::Upstream(_) => "The security vendor could not be reached".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::Upstream(_) => tracing::error!(error = %self, "upstream vendor error"),
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            _ => {}
        }

        let details = match &self {
            Self::FieldValidation(errors) => {
                let map: serde_json::Map<String, serde_json::Value> = errors
                    .iter()
                    .map(|e| (e.field().to_string(), serde_json::json!(e.to_string())))
                    .collect();
                Some(serde_json::Value::Object(map))
            }
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::UnknownTable(table) => Self::NotFound(format!("unknown record table '{table}'")),
            StoreError::Database { sqlstate: Some(code), .. } => {
                match friendly_constraint_message(code) {
                    // Not-null → the form missed a required value.
                    Some(msg) if code == custos_registry::constraint::NOT_NULL_VIOLATION => {
                        Self::Validation(msg.to_string())
                    }
                    // Unique → the record already exists.
                    Some(msg) => Self::Conflict(msg.to_string()),
                    None => Self::Internal(err.to_string()),
                }
            }
            _ => Self::Internal(err.to_string()),
        }
    }
}

impl From<TenantError> for AppError {
    fn from(err: TenantError) -> Self {
        match err {
            TenantError::ProfileNotFound => Self::NotFound(err.to_string()),
            TenantError::NotAMember => Self::Forbidden(err.to_string()),
            TenantError::OrganizationInactive => Self::Conflict(err.to_string()),
            TenantError::Store(store) => store.into(),
        }
    }
}

impl From<SentinelError> for AppError {
    fn from(err: SentinelError) -> Self {
        match &err {
            SentinelError::NotConfigured { .. } => Self::ServiceUnavailable(err.to_string()),
            _ => Self::Upstream(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_validation_maps_to_422_with_details() {
        let err = AppError::FieldValidation(vec![ValidationError::MissingField {
            field: "title".into(),
        }]);
        let (status, code) = err.status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "VALIDATION_ERROR");
    }

    #[test]
    fn not_null_violation_becomes_validation_error() {
        let err: AppError = StoreError::Database {
            sqlstate: Some("23502".into()),
            message: "null value in column".into(),
        }
        .into();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn unique_violation_becomes_conflict() {
        let err: AppError = StoreError::Database {
            sqlstate: Some("23505".into()),
            message: "duplicate key".into(),
        }
        .into();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn other_database_errors_stay_internal() {
        let err: AppError = StoreError::Database {
            sqlstate: Some("42P01".into()),
            message: "relation does not exist".into(),
        }
        .into();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
