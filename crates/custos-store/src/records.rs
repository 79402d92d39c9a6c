//! # Record Rows
//!
//! The uniform row shape shared by every record table: an id, the owning
//! organization, a JSONB field map, and the creation timestamp. Listing is
//! newest-first; deletion is hard — there is no soft-delete or versioning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use custos_core::{OrgId, RecordId};

/// One row of a compliance record table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordRow {
    pub id: RecordId,
    pub organization_id: OrgId,
    pub fields: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

impl RecordRow {
    /// Build a fresh row for insertion.
    pub fn new(organization_id: OrgId, fields: Map<String, Value>) -> Self {
        Self {
            id: RecordId::new(),
            organization_id,
            fields,
            created_at: Utc::now(),
        }
    }
}
