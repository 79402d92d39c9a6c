//! # custos-tenant — Organization-Context Resolution
//!
//! Determines which organization a signed-in user's data operations apply
//! to, self-healing when the user's stored pointer has gone stale (the
//! pointed-to organization was deleted or deactivated).
//!
//! The decision logic is a pure function, [`resolve_organization`], over
//! rows the caller has already fetched; the store-backed [`TenantResolver`]
//! fetches those inputs, applies the decision, and performs the one
//! permitted side effect: on a `Repair` outcome it rewrites the profile's
//! `organization_id` and re-resolves exactly once.
//!
//! ## Demo Mode
//!
//! A demo flag short-circuits resolution to the fixed
//! [`custos_core::DEMO_ORG_ID`] without touching the store at all.

pub mod resolve;
pub mod resolver;

pub use resolve::{resolve_organization, ResolutionOutcome};
pub use resolver::{TenantContext, TenantError, TenantResolver};
