//! # Dashboard Metrics Route
//!
//! One endpoint feeds every card on the overview page. Rows are fetched in
//! one concurrent batch per table and aggregated with the pure functions in
//! `custos-core`; a row with malformed fields degrades to its zero value
//! instead of failing the whole dashboard.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use custos_core::{
    compliance_rate, document_counters, expiry_status, DocumentCounters, DocumentState,
    DocumentStatus, ExpiryStatus, OrgId, SupplierCompliance,
};
use custos_store::Store;

use crate::error::AppError;
use crate::extractors::{tenant_scope, CallerIdentity, DemoFlag};
use crate::state::AppState;

/// A document approaching (or past) its expiry date.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExpiringDocument {
    pub title: String,
    #[schema(value_type = String, format = Date)]
    pub expiry_date: NaiveDate,
    /// `expired` or `expiring_soon`.
    pub status: String,
}

/// Everything the overview page renders.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardMetrics {
    pub supplier_total: usize,
    /// Percentage of suppliers that are both ISO 27001 certified and
    /// data-protection compliant. 0 when there are no suppliers.
    pub supplier_compliance_rate: u32,
    #[schema(value_type = Object)]
    pub documents: DocumentCounters,
    pub open_incidents: usize,
    pub total_incidents: usize,
    pub expiring_documents: Vec<ExpiringDocument>,
}

/// Build the metrics router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/metrics/dashboard", get(dashboard))
}

fn flag(fields: &Map<String, Value>, key: &str) -> bool {
    fields.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn text<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

fn date(fields: &Map<String, Value>, key: &str) -> Option<NaiveDate> {
    text(fields, key).and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

fn document_state(fields: &Map<String, Value>) -> DocumentState {
    let status = match text(fields, "status") {
        Some("compliant") => DocumentStatus::Compliant,
        Some("needs_update") => DocumentStatus::NeedsUpdate,
        _ => DocumentStatus::UnderReview,
    };
    DocumentState {
        status,
        expiry_date: date(fields, "expiry_date"),
    }
}

/// Fetch and aggregate the dashboard numbers for one organization.
///
/// Shared with the compliance report (and the CLI report command), which
/// render the same snapshot.
pub async fn dashboard_snapshot(
    store: &Store,
    org: OrgId,
    today: NaiveDate,
) -> Result<DashboardMetrics, AppError> {
    let (suppliers, documents, incidents) = tokio::join!(
        store.list_records("suppliers", org),
        store.list_records("compliance_documents", org),
        store.list_records("incidents", org),
    );
    let (suppliers, documents, incidents) = (suppliers?, documents?, incidents?);

    let supplier_flags: Vec<SupplierCompliance> = suppliers
        .iter()
        .map(|row| SupplierCompliance {
            iso27001_certified: flag(&row.fields, "iso27001_certified"),
            data_protection_compliant: flag(&row.fields, "data_protection_compliant"),
        })
        .collect();

    let states: Vec<DocumentState> = documents
        .iter()
        .map(|row| document_state(&row.fields))
        .collect();
    let counters: DocumentCounters = document_counters(&states, today);

    let mut expiring: Vec<ExpiringDocument> = documents
        .iter()
        .filter_map(|row| {
            let expiry = date(&row.fields, "expiry_date")?;
            let status = match expiry_status(expiry, today) {
                ExpiryStatus::Expired => "expired",
                ExpiryStatus::ExpiringSoon => "expiring_soon",
                ExpiryStatus::Current => return None,
            };
            Some(ExpiringDocument {
                title: text(&row.fields, "title").unwrap_or("(untitled)").to_string(),
                expiry_date: expiry,
                status: status.to_string(),
            })
        })
        .collect();
    expiring.sort_by_key(|doc| doc.expiry_date);

    let open_incidents = incidents
        .iter()
        .filter(|row| text(&row.fields, "status").map_or(true, |s| s != "resolved"))
        .count();

    Ok(DashboardMetrics {
        supplier_total: suppliers.len(),
        supplier_compliance_rate: compliance_rate(&supplier_flags),
        documents: counters,
        open_incidents,
        total_incidents: incidents.len(),
        expiring_documents: expiring,
    })
}

/// GET /v1/metrics/dashboard — aggregate numbers for the overview page.
#[utoipa::path(
    get,
    path = "/v1/metrics/dashboard",
    responses(
        (status = 200, description = "Aggregated dashboard metrics", body = DashboardMetrics),
        (status = 401, description = "Anonymous non-demo request"),
    ),
)]
pub(crate) async fn dashboard(
    State(state): State<AppState>,
    caller: CallerIdentity,
    demo: DemoFlag,
) -> Result<Json<DashboardMetrics>, AppError> {
    let (org, _) = tenant_scope(&state, caller, demo).await?;
    let today = Utc::now().date_naive();
    let metrics = dashboard_snapshot(&state.store, org, today).await?;
    Ok(Json(metrics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn missing_flags_count_as_non_compliant() {
        let fields = map(json!({ "name": "Acme" }));
        assert!(!flag(&fields, "iso27001_certified"));
    }

    #[test]
    fn document_state_defaults_to_under_review_on_unknown_status() {
        let state = document_state(&map(json!({ "status": "banana" })));
        assert_eq!(state.status, DocumentStatus::UnderReview);
        assert_eq!(state.expiry_date, None);
    }

    #[test]
    fn malformed_date_is_ignored() {
        let fields = map(json!({ "expiry_date": "not-a-date" }));
        assert_eq!(date(&fields, "expiry_date"), None);
    }
}
