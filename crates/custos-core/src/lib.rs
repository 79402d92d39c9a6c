//! # custos-core — Foundational Types for the Custos Compliance Stack
//!
//! Shared vocabulary for every other crate in the workspace:
//!
//! - [`identity`] — UUID newtypes for tenants, users, and records. Each
//!   identifier is a distinct type; you cannot pass a [`UserId`] where an
//!   [`OrgId`] is expected.
//! - [`tenant`] — the three row shapes tenant resolution operates on:
//!   [`Organization`], [`UserProfile`], [`Membership`].
//! - [`temporal`] — expiry-status derivation for dated compliance documents
//!   (expired / expiring within 30 days / current).
//! - [`metrics`] — pure aggregation over in-memory record lists for the
//!   dashboard summary cards.
//! - [`error`] — the shared [`ValidationError`] hierarchy.
//!
//! ## Crate Policy
//!
//! - Sits at the bottom of the dependency DAG — depends on no other
//!   workspace crate.
//! - No I/O. Everything in this crate is a pure function or a plain value.

pub mod error;
pub mod identity;
pub mod metrics;
pub mod temporal;
pub mod tenant;

pub use error::ValidationError;
pub use identity::{OrgId, RecordId, UserId};
pub use metrics::{
    compliance_rate, document_counters, DocumentCounters, DocumentState, DocumentStatus,
    SupplierCompliance,
};
pub use temporal::{days_until, expiry_status, ExpiryStatus, EXPIRY_WARNING_DAYS};
pub use tenant::{demo_org_id, Membership, Organization, UserProfile, DEMO_ORG_ID};
