//! # custos-api — HTTP API for the Custos Compliance Stack
//!
//! Axum application serving the compliance dashboard backend:
//!
//! - `/v1/context*` — tenant context resolution and organization switching
//! - `/v1/records/{table}*` — the schema-driven record engine
//! - `/v1/metrics/dashboard` — overview-page aggregation
//! - `/v1/soc/*` — antivirus vendor proxy (the API key stays server-side)
//! - `/v1/reports/*` — compliance report download and mailto payload
//! - `/v1/attachments/*` — content-addressed file blobs
//! - `/health/*` — unauthenticated liveness and readiness probes
//!
//! All `/v1` routes sit behind the static bearer-token middleware; user
//! identity arrives from the upstream identity provider via `X-User-Id`.

pub mod auth;
pub mod error;
pub mod extractors;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{Extension, Json, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Maximum accepted request body, sized for attachment uploads.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Build the complete application router.
pub fn app(state: AppState) -> Router {
    let auth = auth::AuthConfig {
        token: state.config.auth_token.clone(),
    };

    let api = Router::new()
        .merge(routes::context::router())
        .merge(routes::records::router())
        .merge(routes::metrics::router())
        .merge(routes::soc::router())
        .merge(routes::reports::router())
        .merge(routes::attachments::router())
        .layer(axum::middleware::from_fn(auth::auth_middleware))
        .layer(Extension(auth));

    Router::new()
        .merge(api)
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .route("/api-docs/openapi.json", get(openapi_spec))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn liveness() -> &'static str {
    "ok"
}

async fn readiness() -> &'static str {
    "ready"
}

async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::ApiDoc::openapi())
}
