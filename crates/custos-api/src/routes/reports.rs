//! # Compliance Report Routes
//!
//! The downloadable HTML report and its `mailto:` companion. Both render
//! the same dashboard snapshot; delivery to the supervisory authority stays
//! a manual step the mail body walks the operator through.

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use custos_report::{mailto_url, render_html, ReportInput, AUTHORITY_EMAIL};

use crate::error::AppError;
use crate::extractors::{tenant_scope, CallerIdentity, DemoFlag};
use crate::routes::metrics::dashboard_snapshot;
use crate::state::AppState;

/// Response for the mailto endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct MailtoResponse {
    /// `mailto:` URL with prefilled recipient, subject, and body.
    pub mailto: String,
    pub authority_email: String,
}

/// Build the reports router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/reports/compliance", get(download_report))
        .route("/v1/reports/compliance/mailto", get(report_mailto))
}

pub(crate) async fn build_input(
    state: &AppState,
    caller: CallerIdentity,
    demo: DemoFlag,
) -> Result<ReportInput, AppError> {
    let (org, _) = tenant_scope(state, caller, demo).await?;
    let today = Utc::now().date_naive();
    let metrics = dashboard_snapshot(&state.store, org, today).await?;

    let organization_name = state
        .store
        .organization(org)
        .await?
        .map(|o| o.name)
        .unwrap_or_else(|| "Organization".to_string());

    Ok(ReportInput {
        organization_name,
        generated_on: today,
        supplier_compliance_rate: metrics.supplier_compliance_rate,
        supplier_total: metrics.supplier_total,
        documents: metrics.documents,
        open_incidents: metrics.open_incidents,
        total_incidents: metrics.total_incidents,
        expiring_documents: metrics
            .expiring_documents
            .into_iter()
            .map(|d| (d.title, d.expiry_date))
            .collect(),
    })
}

/// GET /v1/reports/compliance — the report as an HTML download.
#[utoipa::path(
    get,
    path = "/v1/reports/compliance",
    responses(
        (status = 200, description = "Self-contained HTML report", content_type = "text/html"),
        (status = 401, description = "Anonymous non-demo request"),
    ),
)]
pub(crate) async fn download_report(
    State(state): State<AppState>,
    caller: CallerIdentity,
    demo: DemoFlag,
) -> Result<(HeaderMap, Html<String>), AppError> {
    let input = build_input(&state, caller, demo).await?;
    let filename = format!(
        "compliance-report-{}.html",
        input.generated_on.format("%Y-%m-%d")
    );
    let html = render_html(&input);

    let mut headers = HeaderMap::new();
    let disposition = format!("attachment; filename=\"{filename}\"");
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|_| AppError::Internal("invalid report filename".into()))?,
    );
    tracing::info!(organization = %input.organization_name, "compliance report generated");
    Ok((headers, Html(html)))
}

/// GET /v1/reports/compliance/mailto — prefilled mail link for the
/// supervisory authority.
#[utoipa::path(
    get,
    path = "/v1/reports/compliance/mailto",
    responses(
        (status = 200, description = "Prefilled mailto URL", body = MailtoResponse),
        (status = 401, description = "Anonymous non-demo request"),
    ),
)]
pub(crate) async fn report_mailto(
    State(state): State<AppState>,
    caller: CallerIdentity,
    demo: DemoFlag,
) -> Result<Json<MailtoResponse>, AppError> {
    let input = build_input(&state, caller, demo).await?;
    Ok(Json(MailtoResponse {
        mailto: mailto_url(&input),
        authority_email: AUTHORITY_EMAIL.to_string(),
    }))
}
