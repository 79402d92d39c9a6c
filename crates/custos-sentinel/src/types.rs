//! # Normalized Vendor Types
//!
//! Local shapes the SOC dashboard consumes. The HTTP adapter maps the
//! vendor's camelCase wire format into these; the demo adapter produces
//! them directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health of a protected endpoint, as reported by the vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointHealth {
    Protected,
    AtRisk,
    Offline,
    /// Anything the vendor reports that we do not recognize.
    Unknown,
}

impl EndpointHealth {
    /// Normalize a vendor status string. Unrecognized values become
    /// `Unknown` rather than failing the whole listing.
    pub fn from_vendor(s: &str) -> Self {
        match s {
            "protected" | "healthy" => Self::Protected,
            "at_risk" | "atRisk" | "degraded" => Self::AtRisk,
            "offline" | "disconnected" => Self::Offline,
            _ => Self::Unknown,
        }
    }
}

/// One endpoint (workstation agent) in the vendor inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointInfo {
    pub id: String,
    pub hostname: String,
    pub os: String,
    pub health: EndpointHealth,
    pub isolated: bool,
    pub last_seen: Option<DateTime<Utc>>,
}

/// A detection or audit event from the vendor event feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityEvent {
    pub id: String,
    pub endpoint_id: String,
    pub event_type: String,
    pub severity: String,
    pub detected_at: DateTime<Utc>,
    pub description: String,
}

/// Lifecycle of an on-demand scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanState {
    Queued,
    Running,
    Completed,
    Failed,
}

/// State of one scan, as returned by start-scan and get-scan-status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanStatus {
    pub scan_id: String,
    pub endpoint_id: String,
    pub state: ScanState,
    /// 0–100. The vendor omits it for queued scans.
    pub progress: u8,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Mutable endpoint attributes (PATCH body).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isolated: Option<bool>,
}

/// A remote command dispatched to an endpoint agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteCommand {
    Isolate,
    Release,
    Reboot,
    UpdateAgent,
}

impl RemoteCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Isolate => "isolate",
            Self::Release => "release",
            Self::Reboot => "reboot",
            Self::UpdateAgent => "update_agent",
        }
    }
}

/// Acknowledgement of a dispatched remote command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandAck {
    pub endpoint_id: String,
    pub command: RemoteCommand,
    pub accepted: bool,
    pub message: Option<String>,
}
