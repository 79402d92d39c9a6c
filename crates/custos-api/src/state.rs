//! # Application State
//!
//! Shared state for the Axum application: the store front, the tenant
//! resolver, the vendor client, the attachment store, and configuration.

use std::path::PathBuf;

use custos_sentinel::{SentinelClient, SentinelConfig};
use custos_store::{AttachmentStore, DemoStore, Store, StoreError};
use custos_tenant::TenantResolver;

/// Runtime configuration, read from flags and `CUSTOS_*` environment
/// variables by the CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bearer token required on every `/v1` request. `None` disables
    /// authentication (development and tests only).
    pub auth_token: Option<String>,
    /// Postgres URL. `None` selects the in-memory demo store.
    pub database_url: Option<String>,
    /// Vendor configuration. `None` selects the simulated SOC adapter.
    pub sentinel: Option<SentinelConfig>,
    /// Root directory for content-addressed attachment blobs.
    pub attachments_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            auth_token: None,
            database_url: None,
            sentinel: None,
            attachments_dir: std::env::temp_dir().join("custos-attachments"),
        }
    }
}

/// Shared application state passed to all route handlers. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub resolver: TenantResolver,
    pub sentinel: SentinelClient,
    /// Simulated vendor adapter for `?demo=true` requests. Shared so scan
    /// state survives across requests within one process.
    pub demo_sentinel: SentinelClient,
    pub attachments: AttachmentStore,
    pub config: AppConfig,
}

impl AppState {
    /// Build state from configuration, connecting to Postgres and the
    /// vendor when configured and falling back to the demo backends
    /// otherwise.
    pub async fn from_config(config: AppConfig) -> Result<Self, StoreError> {
        let store = Store::open(config.database_url.as_deref()).await?;
        let sentinel = SentinelClient::from_config(config.sentinel.clone()).map_err(|e| {
            StoreError::Database {
                sqlstate: None,
                message: format!("sentinel configuration rejected: {e}"),
            }
        })?;
        Ok(Self::assemble(store, sentinel, config))
    }

    /// Fully in-memory state with seeded fixtures. Used by tests and demo
    /// deployments.
    pub fn demo() -> Self {
        Self::with_store(Store::Demo(DemoStore::seeded()))
    }

    /// In-memory state over a caller-controlled store. Tests use this to
    /// arrange exact rows.
    pub fn with_store(store: Store) -> Self {
        let sentinel = SentinelClient::Demo(custos_sentinel::DemoSentinelClient::new());
        Self::assemble(store, sentinel, AppConfig::default())
    }

    fn assemble(store: Store, sentinel: SentinelClient, config: AppConfig) -> Self {
        Self {
            resolver: TenantResolver::new(store.clone()),
            attachments: AttachmentStore::new(&config.attachments_dir),
            demo_sentinel: SentinelClient::Demo(custos_sentinel::DemoSentinelClient::new()),
            store,
            sentinel,
            config,
        }
    }

    /// The vendor client a request should use. Demo requests always get the
    /// simulated adapter, regardless of what is configured — a demo session
    /// must never reach the live vendor.
    pub fn sentinel_for(&self, demo: bool) -> &SentinelClient {
        if demo {
            &self.demo_sentinel
        } else {
            &self.sentinel
        }
    }
}
