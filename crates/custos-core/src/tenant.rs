//! # Tenant Row Types
//!
//! The three row shapes organization-context resolution operates on. These
//! mirror the backing tables one-to-one; the store crate maps database rows
//! into them and the tenant crate reasons over them without further I/O.

use serde::{Deserialize, Serialize};

use crate::identity::{OrgId, UserId};

/// The fixed organization id demo mode resolves to, bypassing the store
/// entirely. The same id seeds the demo store's fixtures.
pub const DEMO_ORG_ID: &str = "0d3a9c1e-5b72-4f08-9e4d-2c6f81a05747";

/// [`DEMO_ORG_ID`] as a typed identifier.
pub fn demo_org_id() -> OrgId {
    // The constant is a valid UUID literal; parsing cannot fail.
    DEMO_ORG_ID.parse().unwrap_or_else(|_| OrgId::from_uuid(uuid::Uuid::nil()))
}

/// An organization (tenant). Owned entirely by the backend; resolution only
/// reads `is_active` and may switch a user's profile pointer to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrgId,
    pub name: String,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

/// A user's profile row. Nominally carries a single `organization_id`
/// pointer; the membership-fallback repair step is the only writer of that
/// field outside of an explicit organization switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub organization_id: Option<OrgId>,
    pub role: String,
    pub full_name: String,
    pub email: String,
}

/// One row of the user/organization many-to-many relation. Enables
/// multi-tenant users; resolution prefers rows flagged `is_primary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: UserId,
    pub organization_id: OrgId,
    pub role: String,
    pub is_primary: bool,
}
