//! # custos-sentinel — EDR Vendor API Client
//!
//! Client for the Sentinel endpoint-protection vendor's REST API, used by
//! the SOC dashboard: endpoint inventory, security events, on-demand scans,
//! endpoint updates, and remote commands.
//!
//! ## Adapters
//!
//! - [`HttpSentinelClient`] — the live adapter. Wraps a `reqwest::Client`
//!   with the vendor base URL, the static API-key header, and a per-request
//!   timeout. Responses are normalized into local types; errors carry the
//!   operation, HTTP status, and a response-body excerpt. There is no
//!   retry, backoff, or pagination handling — a failed call surfaces its
//!   error and the dashboard shows a banner.
//! - [`DemoSentinelClient`] — simulated fixtures for demo mode: a fixed
//!   endpoint inventory, canned events, and scans that progress
//!   deterministically with wall-clock time.
//!
//! The API key never leaves the server: browser clients reach the vendor
//! only through the `/v1/soc/*` proxy routes in `custos-api`.

pub mod client;
pub mod demo;
pub mod error;
pub mod http;
pub mod types;

pub use client::SentinelClient;
pub use demo::DemoSentinelClient;
pub use error::SentinelError;
pub use http::{HttpSentinelClient, SentinelConfig};
pub use types::{
    CommandAck, EndpointHealth, EndpointInfo, EndpointPatch, RemoteCommand, ScanState,
    ScanStatus, SecurityEvent,
};
