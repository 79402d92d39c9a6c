//! # Demo Store
//!
//! In-memory backend used by demo mode and by tests. Seeded with a demo
//! organization, a demo profile and membership, and a handful of records
//! per table so every dashboard page has something to show. Makes zero
//! network calls.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use custos_core::{
    demo_org_id, Membership, OrgId, Organization, RecordId, UserId, UserProfile,
};
use custos_registry::{schema_for, table_names};

use crate::error::StoreError;
use crate::records::RecordRow;

/// The fixed demo user that owns the seeded profile.
pub const DEMO_USER_ID: &str = "7f2b4a90-3c1d-4e65-8a07-9d5e12c3b8f6";

struct Inner {
    organizations: DashMap<Uuid, Organization>,
    profiles: DashMap<Uuid, UserProfile>,
    /// Keyed by user id; each entry holds that user's membership rows.
    memberships: DashMap<Uuid, Vec<Membership>>,
    /// One map per catalog table.
    records: DashMap<&'static str, DashMap<Uuid, RecordRow>>,
}

/// In-memory store. Cheaply cloneable via `Arc` — all clones share data.
#[derive(Clone)]
pub struct DemoStore {
    inner: Arc<Inner>,
}

impl DemoStore {
    /// An empty store with no fixtures. Used by tests that need to control
    /// every row.
    pub fn empty() -> Self {
        let records = DashMap::new();
        for table in table_names() {
            records.insert(table, DashMap::new());
        }
        Self {
            inner: Arc::new(Inner {
                organizations: DashMap::new(),
                profiles: DashMap::new(),
                memberships: DashMap::new(),
                records,
            }),
        }
    }

    /// A store seeded with the demo organization and sample records.
    pub fn seeded() -> Self {
        let store = Self::empty();
        store.seed();
        store
    }

    fn seed(&self) {
        let org = demo_org_id();
        let user: UserId = DEMO_USER_ID.parse().unwrap_or_default();

        self.put_organization(Organization {
            id: org,
            name: "Demo d.o.o.".to_string(),
            is_active: true,
            logo_url: None,
        });
        self.put_profile(UserProfile {
            id: user,
            organization_id: Some(org),
            role: "admin".to_string(),
            full_name: "Demo Administrator".to_string(),
            email: "demo@example.com".to_string(),
        });
        self.put_memberships(
            user,
            vec![Membership {
                user_id: user,
                organization_id: org,
                role: "admin".to_string(),
                is_primary: true,
            }],
        );

        let seed_rows: &[(&str, Value)] = &[
            (
                "suppliers",
                json!({
                    "name": "Nimbus Hosting d.o.o.",
                    "contact_email": "dpo@nimbus.example",
                    "country": "SI",
                    "iso27001_certified": true,
                    "data_protection_compliant": true,
                    "risk_level": "low",
                    "contract_expiry": "2027-02-01",
                }),
            ),
            (
                "suppliers",
                json!({
                    "name": "Globex Payroll",
                    "contact_email": "privacy@globex.example",
                    "country": "DE",
                    "iso27001_certified": false,
                    "data_protection_compliant": true,
                    "risk_level": "medium",
                }),
            ),
            (
                "incidents",
                json!({
                    "title": "Phishing mail reported by finance",
                    "severity": "medium",
                    "status": "resolved",
                    "occurred_at": "2026-05-11",
                    "resolved_at": "2026-05-12",
                    "reported_to_authority": false,
                }),
            ),
            (
                "compliance_documents",
                json!({
                    "title": "Records of processing activities",
                    "category": "gdpr",
                    "status": "compliant",
                    "expiry_date": "2027-01-15",
                }),
            ),
            (
                "compliance_documents",
                json!({
                    "title": "Information security policy",
                    "category": "iso27001",
                    "status": "needs_update",
                    "expiry_date": "2026-03-01",
                }),
            ),
            (
                "workstations",
                json!({
                    "hostname": "FIN-WS-012",
                    "os": "Windows 11",
                    "owner": "finance",
                    "av_status": "protected",
                    "last_seen": "2026-08-20",
                }),
            ),
        ];
        for (table, fields) in seed_rows {
            if let Some(map) = fields.as_object() {
                // Seeds must satisfy their own schemas.
                debug_assert!(schema_for(table)
                    .map(|s| s.validate(map).is_ok())
                    .unwrap_or(false));
                let _ = self.insert_record_sync(table, org, map.clone());
            }
        }
    }

    // ── Fixture/test helpers ────────────────────────────────────────

    pub fn put_organization(&self, org: Organization) {
        self.inner.organizations.insert(*org.id.as_uuid(), org);
    }

    pub fn put_profile(&self, profile: UserProfile) {
        self.inner.profiles.insert(*profile.id.as_uuid(), profile);
    }

    pub fn put_memberships(&self, user: UserId, memberships: Vec<Membership>) {
        self.inner.memberships.insert(*user.as_uuid(), memberships);
    }

    fn insert_record_sync(
        &self,
        table: &str,
        org: OrgId,
        fields: Map<String, Value>,
    ) -> Result<RecordRow, StoreError> {
        let rows = self
            .inner
            .records
            .get(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;
        let row = RecordRow::new(org, fields);
        rows.insert(*row.id.as_uuid(), row.clone());
        Ok(row)
    }

    // ── Tenant tables ───────────────────────────────────────────────

    pub async fn profile(&self, user: UserId) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.inner.profiles.get(user.as_uuid()).map(|p| p.clone()))
    }

    pub async fn organization(&self, org: OrgId) -> Result<Option<Organization>, StoreError> {
        Ok(self.inner.organizations.get(org.as_uuid()).map(|o| o.clone()))
    }

    pub async fn organizations_by_ids(
        &self,
        ids: &[OrgId],
    ) -> Result<Vec<Organization>, StoreError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.inner.organizations.get(id.as_uuid()).map(|o| o.clone()))
            .collect())
    }

    pub async fn memberships(&self, user: UserId) -> Result<Vec<Membership>, StoreError> {
        let mut rows = self
            .inner
            .memberships
            .get(user.as_uuid())
            .map(|m| m.clone())
            .unwrap_or_default();
        // Primary memberships first, matching the Postgres ordering.
        rows.sort_by_key(|m| !m.is_primary);
        Ok(rows)
    }

    pub async fn set_profile_organization(
        &self,
        user: UserId,
        org: OrgId,
    ) -> Result<bool, StoreError> {
        match self.inner.profiles.get_mut(user.as_uuid()) {
            Some(mut profile) => {
                profile.organization_id = Some(org);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ── Record tables ───────────────────────────────────────────────

    pub async fn insert_record(
        &self,
        table: &str,
        org: OrgId,
        fields: Map<String, Value>,
    ) -> Result<RecordRow, StoreError> {
        self.insert_record_sync(table, org, fields)
    }

    pub async fn list_records(
        &self,
        table: &str,
        org: OrgId,
    ) -> Result<Vec<RecordRow>, StoreError> {
        let rows = self
            .inner
            .records
            .get(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;
        let mut result: Vec<RecordRow> = rows
            .iter()
            .filter(|r| r.organization_id == org)
            .map(|r| r.clone())
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    pub async fn get_record(
        &self,
        table: &str,
        org: OrgId,
        id: RecordId,
    ) -> Result<Option<RecordRow>, StoreError> {
        let rows = self
            .inner
            .records
            .get(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;
        Ok(rows
            .get(id.as_uuid())
            .filter(|r| r.organization_id == org)
            .map(|r| r.clone()))
    }

    pub async fn update_record(
        &self,
        table: &str,
        org: OrgId,
        id: RecordId,
        fields: Map<String, Value>,
    ) -> Result<bool, StoreError> {
        let rows = self
            .inner
            .records
            .get(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;
        // The RefMut must drop before `rows` does.
        let updated = match rows.get_mut(id.as_uuid()) {
            Some(mut row) if row.organization_id == org => {
                row.fields = fields;
                true
            }
            _ => false,
        };
        Ok(updated)
    }

    pub async fn delete_record(
        &self,
        table: &str,
        org: OrgId,
        id: RecordId,
    ) -> Result<bool, StoreError> {
        let rows = self
            .inner
            .records
            .get(table)
            .ok_or_else(|| StoreError::UnknownTable(table.to_string()))?;
        let removed = rows
            .remove_if(id.as_uuid(), |_, row| row.organization_id == org)
            .is_some();
        Ok(removed)
    }
}
