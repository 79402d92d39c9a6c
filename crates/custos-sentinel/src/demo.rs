//! # Demo Adapter
//!
//! Simulated vendor responses for demo mode. The endpoint inventory and
//! event feed are fixed; scans started here progress deterministically with
//! wall-clock time (about 25 percentage points per second) so the dashboard
//! shows movement without any network traffic.

use std::time::Instant;

use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::SentinelError;
use crate::types::{
    CommandAck, EndpointHealth, EndpointInfo, EndpointPatch, RemoteCommand, ScanState,
    ScanStatus, SecurityEvent,
};

/// Simulated scan progress rate, percentage points per second.
const SCAN_RATE: u128 = 25;

struct DemoScan {
    endpoint_id: String,
    started: Instant,
    started_at: chrono::DateTime<Utc>,
}

/// Simulated vendor client. Cheap to clone; clones share scan state.
#[derive(Clone)]
pub struct DemoSentinelClient {
    scans: Arc<DashMap<String, DemoScan>>,
    isolated: Arc<DashMap<String, bool>>,
}

impl Default for DemoSentinelClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoSentinelClient {
    pub fn new() -> Self {
        Self {
            scans: Arc::new(DashMap::new()),
            isolated: Arc::new(DashMap::new()),
        }
    }

    fn fixture_endpoints(&self) -> Vec<EndpointInfo> {
        let now = Utc::now();
        [
            ("ep-demo-01", "FIN-WS-012", "Windows 11", EndpointHealth::Protected),
            ("ep-demo-02", "HR-WS-003", "Windows 10", EndpointHealth::AtRisk),
            ("ep-demo-03", "DEV-NB-021", "Ubuntu 24.04", EndpointHealth::Protected),
            ("ep-demo-04", "RECEPTION-01", "Windows 10", EndpointHealth::Offline),
        ]
        .into_iter()
        .map(|(id, hostname, os, health)| EndpointInfo {
            id: id.to_string(),
            hostname: hostname.to_string(),
            os: os.to_string(),
            health,
            isolated: self.isolated.get(id).map(|v| *v).unwrap_or(false),
            last_seen: Some(now),
        })
        .collect()
    }

    pub async fn list_endpoints(&self) -> Result<Vec<EndpointInfo>, SentinelError> {
        Ok(self.fixture_endpoints())
    }

    pub async fn list_events(&self) -> Result<Vec<SecurityEvent>, SentinelError> {
        let now = Utc::now();
        Ok(vec![
            SecurityEvent {
                id: "ev-demo-01".into(),
                endpoint_id: "ep-demo-02".into(),
                event_type: "malware_detected".into(),
                severity: "high".into(),
                detected_at: now - chrono::Duration::hours(3),
                description: "Quarantined trojan dropper in user downloads".into(),
            },
            SecurityEvent {
                id: "ev-demo-02".into(),
                endpoint_id: "ep-demo-01".into(),
                event_type: "definition_update".into(),
                severity: "low".into(),
                detected_at: now - chrono::Duration::hours(1),
                description: "Signature database updated".into(),
            },
        ])
    }

    pub async fn start_scan(&self, endpoint_id: &str) -> Result<ScanStatus, SentinelError> {
        let scan_id = format!("scan-demo-{}", Uuid::new_v4());
        let started_at = Utc::now();
        self.scans.insert(
            scan_id.clone(),
            DemoScan {
                endpoint_id: endpoint_id.to_string(),
                started: Instant::now(),
                started_at,
            },
        );
        Ok(ScanStatus {
            scan_id,
            endpoint_id: endpoint_id.to_string(),
            state: ScanState::Queued,
            progress: 0,
            started_at: Some(started_at),
            completed_at: None,
        })
    }

    pub async fn scan_status(&self, scan_id: &str) -> Result<ScanStatus, SentinelError> {
        let scan = self.scans.get(scan_id).ok_or_else(|| SentinelError::Api {
            operation: "scan_status",
            status: 404,
            body_excerpt: format!("unknown scan {scan_id}"),
        })?;
        let progress = (scan.started.elapsed().as_millis() * SCAN_RATE / 1000).min(100) as u8;
        let state = match progress {
            0 => ScanState::Queued,
            100 => ScanState::Completed,
            _ => ScanState::Running,
        };
        Ok(ScanStatus {
            scan_id: scan_id.to_string(),
            endpoint_id: scan.endpoint_id.clone(),
            state,
            progress,
            started_at: Some(scan.started_at),
            completed_at: (state == ScanState::Completed).then(Utc::now),
        })
    }

    pub async fn update_endpoint(
        &self,
        endpoint_id: &str,
        patch: &EndpointPatch,
    ) -> Result<EndpointInfo, SentinelError> {
        if let Some(isolated) = patch.isolated {
            self.isolated.insert(endpoint_id.to_string(), isolated);
        }
        self.fixture_endpoints()
            .into_iter()
            .find(|e| e.id == endpoint_id)
            .ok_or_else(|| SentinelError::Api {
                operation: "update_endpoint",
                status: 404,
                body_excerpt: format!("unknown endpoint {endpoint_id}"),
            })
    }

    pub async fn send_command(
        &self,
        endpoint_id: &str,
        command: RemoteCommand,
    ) -> Result<CommandAck, SentinelError> {
        match command {
            RemoteCommand::Isolate => {
                self.isolated.insert(endpoint_id.to_string(), true);
            }
            RemoteCommand::Release => {
                self.isolated.insert(endpoint_id.to_string(), false);
            }
            RemoteCommand::Reboot | RemoteCommand::UpdateAgent => {}
        }
        Ok(CommandAck {
            endpoint_id: endpoint_id.to_string(),
            command,
            accepted: true,
            message: Some("simulated".into()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn started_scan_is_queryable() {
        let demo = DemoSentinelClient::new();
        let scan = demo.start_scan("ep-demo-01").await.unwrap();
        assert_eq!(scan.progress, 0);
        let status = demo.scan_status(&scan.scan_id).await.unwrap();
        assert_eq!(status.endpoint_id, "ep-demo-01");
    }

    #[tokio::test]
    async fn unknown_scan_is_a_404_shaped_error() {
        let demo = DemoSentinelClient::new();
        let err = demo.scan_status("scan-nope").await.unwrap_err();
        assert!(matches!(err, SentinelError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn isolate_command_flips_inventory_flag() {
        let demo = DemoSentinelClient::new();
        let ack = demo
            .send_command("ep-demo-01", RemoteCommand::Isolate)
            .await
            .unwrap();
        assert!(ack.accepted);
        let endpoints = demo.list_endpoints().await.unwrap();
        let ep = endpoints.iter().find(|e| e.id == "ep-demo-01").unwrap();
        assert!(ep.isolated);
    }
}
