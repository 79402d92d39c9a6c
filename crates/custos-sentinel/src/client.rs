//! # Client Front
//!
//! The handle the SOC proxy routes hold: the live HTTP adapter when the
//! vendor is configured, the simulated adapter otherwise.

use crate::demo::DemoSentinelClient;
use crate::error::SentinelError;
use crate::http::{HttpSentinelClient, SentinelConfig};
use crate::types::{
    CommandAck, EndpointInfo, EndpointPatch, RemoteCommand, ScanStatus, SecurityEvent,
};

/// Adapter-dispatching vendor client. Cheap to clone.
#[derive(Clone)]
pub enum SentinelClient {
    Http(HttpSentinelClient),
    Demo(DemoSentinelClient),
}

macro_rules! delegate {
    ($self:ident . $method:ident ( $($arg:expr),* )) => {
        match $self {
            SentinelClient::Http(client) => client.$method($($arg),*).await,
            SentinelClient::Demo(client) => client.$method($($arg),*).await,
        }
    };
}

impl SentinelClient {
    /// Build the live adapter when configuration is present, the demo
    /// adapter otherwise.
    pub fn from_config(config: Option<SentinelConfig>) -> Result<Self, SentinelError> {
        match config {
            Some(config) => Ok(Self::Http(HttpSentinelClient::new(config)?)),
            None => {
                tracing::info!("sentinel vendor not configured — using simulated SOC data");
                Ok(Self::Demo(DemoSentinelClient::new()))
            }
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, Self::Demo(_))
    }

    pub async fn list_endpoints(&self) -> Result<Vec<EndpointInfo>, SentinelError> {
        delegate!(self.list_endpoints())
    }

    pub async fn list_events(&self) -> Result<Vec<SecurityEvent>, SentinelError> {
        delegate!(self.list_events())
    }

    pub async fn start_scan(&self, endpoint_id: &str) -> Result<ScanStatus, SentinelError> {
        delegate!(self.start_scan(endpoint_id))
    }

    pub async fn scan_status(&self, scan_id: &str) -> Result<ScanStatus, SentinelError> {
        delegate!(self.scan_status(scan_id))
    }

    pub async fn update_endpoint(
        &self,
        endpoint_id: &str,
        patch: &EndpointPatch,
    ) -> Result<EndpointInfo, SentinelError> {
        delegate!(self.update_endpoint(endpoint_id, patch))
    }

    pub async fn send_command(
        &self,
        endpoint_id: &str,
        command: RemoteCommand,
    ) -> Result<CommandAck, SentinelError> {
        delegate!(self.send_command(endpoint_id, command))
    }
}
