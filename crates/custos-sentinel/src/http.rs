//! # Live HTTP Adapter
//!
//! Wraps a `reqwest::Client` with the vendor base URL, the static API-key
//! header, and a per-request timeout. Each operation maps one REST endpoint
//! and normalizes the camelCase wire shape into the local types.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::{excerpt, SentinelError};
use crate::types::{
    CommandAck, EndpointHealth, EndpointInfo, EndpointPatch, RemoteCommand, ScanState,
    ScanStatus, SecurityEvent,
};

/// Configuration for the live vendor adapter.
#[derive(Debug, Clone)]
pub struct SentinelConfig {
    /// Base URL of the vendor API (e.g. `https://api.sentinel.example`).
    pub base_url: String,
    /// Static API key, sent as the `X-Api-Key` header. Server-side only.
    pub api_key: String,
    /// The vendor workspace the organization's endpoints live in.
    pub workspace_id: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl SentinelConfig {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        workspace_id: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            workspace_id: workspace_id.into(),
            timeout_secs: 30,
        }
    }
}

/// Live HTTP client for the Sentinel vendor API.
#[derive(Debug, Clone)]
pub struct HttpSentinelClient {
    client: reqwest::Client,
    base_url: String,
    workspace_id: String,
}

impl HttpSentinelClient {
    /// Build the adapter from configuration.
    pub fn new(config: SentinelConfig) -> Result<Self, SentinelError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "X-Api-Key",
            reqwest::header::HeaderValue::from_str(&config.api_key).map_err(|_| {
                SentinelError::NotConfigured {
                    reason: "API key contains invalid header characters".into(),
                }
            })?,
        );
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| SentinelError::NotConfigured {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            workspace_id: config.workspace_id,
        })
    }

    /// Send a request, folding transport and server-status failures into
    /// [`SentinelError`] consistently across operations.
    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        operation: &'static str,
    ) -> Result<reqwest::Response, SentinelError> {
        let resp = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SentinelError::Timeout { operation }
            } else {
                SentinelError::Unreachable {
                    operation,
                    reason: e.to_string(),
                }
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SentinelError::Api {
                operation,
                status: status.as_u16(),
                body_excerpt: excerpt(&body),
            });
        }
        Ok(resp)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
        operation: &'static str,
    ) -> Result<T, SentinelError> {
        resp.json::<T>().await.map_err(|e| SentinelError::Decode {
            operation,
            reason: e.to_string(),
        })
    }

    /// `GET /v1/workspaces/{id}/endpoints`
    pub async fn list_endpoints(&self) -> Result<Vec<EndpointInfo>, SentinelError> {
        let op = "list_endpoints";
        let url = format!(
            "{}/v1/workspaces/{}/endpoints",
            self.base_url, self.workspace_id
        );
        let resp = self.send(self.client.get(&url), op).await?;
        let wire: WireEndpointList = Self::decode(resp, op).await?;
        Ok(wire.endpoints.into_iter().map(WireEndpoint::normalize).collect())
    }

    /// `GET /v1/workspaces/{id}/events`
    pub async fn list_events(&self) -> Result<Vec<SecurityEvent>, SentinelError> {
        let op = "list_events";
        let url = format!(
            "{}/v1/workspaces/{}/events",
            self.base_url, self.workspace_id
        );
        let resp = self.send(self.client.get(&url), op).await?;
        let wire: WireEventList = Self::decode(resp, op).await?;
        Ok(wire.events.into_iter().map(WireEvent::normalize).collect())
    }

    /// `POST /v1/endpoints/{id}/scan`
    pub async fn start_scan(&self, endpoint_id: &str) -> Result<ScanStatus, SentinelError> {
        let op = "start_scan";
        let url = format!("{}/v1/endpoints/{endpoint_id}/scan", self.base_url);
        let resp = self.send(self.client.post(&url), op).await?;
        let wire: WireScan = Self::decode(resp, op).await?;
        Ok(wire.normalize())
    }

    /// `GET /v1/scans/{id}`
    pub async fn scan_status(&self, scan_id: &str) -> Result<ScanStatus, SentinelError> {
        let op = "scan_status";
        let url = format!("{}/v1/scans/{scan_id}", self.base_url);
        let resp = self.send(self.client.get(&url), op).await?;
        let wire: WireScan = Self::decode(resp, op).await?;
        Ok(wire.normalize())
    }

    /// `PATCH /v1/endpoints/{id}`
    pub async fn update_endpoint(
        &self,
        endpoint_id: &str,
        patch: &EndpointPatch,
    ) -> Result<EndpointInfo, SentinelError> {
        let op = "update_endpoint";
        let url = format!("{}/v1/endpoints/{endpoint_id}", self.base_url);
        let resp = self.send(self.client.patch(&url).json(patch), op).await?;
        let wire: WireEndpoint = Self::decode(resp, op).await?;
        Ok(wire.normalize())
    }

    /// `POST /v1/endpoints/{id}/command`
    pub async fn send_command(
        &self,
        endpoint_id: &str,
        command: RemoteCommand,
    ) -> Result<CommandAck, SentinelError> {
        let op = "send_command";
        let url = format!("{}/v1/endpoints/{endpoint_id}/command", self.base_url);
        let body = serde_json::json!({ "command": command.as_str() });
        let resp = self.send(self.client.post(&url).json(&body), op).await?;
        let wire: WireCommandAck = Self::decode(resp, op).await?;
        Ok(CommandAck {
            endpoint_id: endpoint_id.to_string(),
            command,
            accepted: wire.accepted,
            message: wire.message,
        })
    }
}

// ── Wire shapes (vendor camelCase) ──────────────────────────────────

#[derive(Deserialize)]
struct WireEndpointList {
    endpoints: Vec<WireEndpoint>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEndpoint {
    id: String,
    hostname: String,
    #[serde(default)]
    operating_system: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    isolated: bool,
    last_seen: Option<DateTime<Utc>>,
}

impl WireEndpoint {
    fn normalize(self) -> EndpointInfo {
        EndpointInfo {
            health: EndpointHealth::from_vendor(&self.status),
            id: self.id,
            hostname: self.hostname,
            os: self.operating_system,
            isolated: self.isolated,
            last_seen: self.last_seen,
        }
    }
}

#[derive(Deserialize)]
struct WireEventList {
    events: Vec<WireEvent>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEvent {
    id: String,
    endpoint_id: String,
    event_type: String,
    #[serde(default)]
    severity: String,
    detected_at: DateTime<Utc>,
    #[serde(default)]
    description: String,
}

impl WireEvent {
    fn normalize(self) -> SecurityEvent {
        SecurityEvent {
            id: self.id,
            endpoint_id: self.endpoint_id,
            event_type: self.event_type,
            severity: self.severity,
            detected_at: self.detected_at,
            description: self.description,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireScan {
    scan_id: String,
    endpoint_id: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    progress: Option<u8>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl WireScan {
    fn normalize(self) -> ScanStatus {
        let state = match self.state.as_str() {
            "running" | "in_progress" => ScanState::Running,
            "completed" | "done" => ScanState::Completed,
            "failed" | "error" => ScanState::Failed,
            _ => ScanState::Queued,
        };
        ScanStatus {
            scan_id: self.scan_id,
            endpoint_id: self.endpoint_id,
            state,
            progress: self.progress.unwrap_or(0).min(100),
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCommandAck {
    accepted: bool,
    #[serde(default)]
    message: Option<String>,
}
