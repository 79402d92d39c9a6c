//! # Postgres Store
//!
//! SQLx repositories over the embedded migrations. Record queries address
//! their table by name; every table name is checked against the schema
//! catalog before it is spliced into SQL, so only the fixed set of
//! migration-created tables is ever reachable.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

use custos_core::{Membership, OrgId, Organization, RecordId, UserId, UserProfile};
use custos_registry::schema_for;

use crate::error::StoreError;
use crate::records::RecordRow;

/// Postgres-backed store.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to the database and apply pending migrations.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(20)
            .min_connections(2)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect(database_url)
            .await?;
        tracing::info!("connected to PostgreSQL");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Database {
                sqlstate: None,
                message: format!("migration failed: {e}"),
            })?;
        tracing::info!("database migrations applied");

        Ok(Self { pool })
    }

    /// Wrap an existing pool (tests, CLI `migrate`).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    // ── Tenant tables ───────────────────────────────────────────────

    /// Fetch a user's profile row.
    pub async fn profile(&self, user: UserId) -> Result<Option<UserProfile>, StoreError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            "SELECT id, organization_id, role, full_name, email FROM profiles WHERE id = $1",
        )
        .bind(user.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ProfileRow::into_profile))
    }

    /// Fetch one organization.
    pub async fn organization(&self, org: OrgId) -> Result<Option<Organization>, StoreError> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            "SELECT id, name, is_active, logo_url FROM organizations WHERE id = $1",
        )
        .bind(org.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(OrganizationRow::into_organization))
    }

    /// Fetch several organizations by id. Used by the resolver's fallback
    /// search, which fetches membership organizations separately rather
    /// than joining through the membership table.
    pub async fn organizations_by_ids(
        &self,
        ids: &[OrgId],
    ) -> Result<Vec<Organization>, StoreError> {
        let raw: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let rows = sqlx::query_as::<_, OrganizationRow>(
            "SELECT id, name, is_active, logo_url FROM organizations WHERE id = ANY($1)",
        )
        .bind(&raw)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(OrganizationRow::into_organization).collect())
    }

    /// Fetch a user's memberships, primary first.
    pub async fn memberships(&self, user: UserId) -> Result<Vec<Membership>, StoreError> {
        let rows = sqlx::query_as::<_, MembershipRow>(
            "SELECT user_id, organization_id, role, is_primary
             FROM memberships WHERE user_id = $1 ORDER BY is_primary DESC",
        )
        .bind(user.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(MembershipRow::into_membership).collect())
    }

    /// Point a profile at a different organization. Returns whether a row
    /// was updated.
    pub async fn set_profile_organization(
        &self,
        user: UserId,
        org: OrgId,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE profiles SET organization_id = $1 WHERE id = $2")
            .bind(org.as_uuid())
            .bind(user.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Record tables ───────────────────────────────────────────────

    /// Insert a record. The caller has already validated `fields` against
    /// the table's schema.
    pub async fn insert_record(
        &self,
        table: &str,
        org: OrgId,
        fields: Map<String, Value>,
    ) -> Result<RecordRow, StoreError> {
        let table = checked_table(table)?;
        let row = RecordRow::new(org, fields);
        sqlx::query(&format!(
            "INSERT INTO {table} (id, organization_id, fields, created_at) VALUES ($1, $2, $3, $4)"
        ))
        .bind(row.id.as_uuid())
        .bind(row.organization_id.as_uuid())
        .bind(Value::Object(row.fields.clone()))
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;
        Ok(row)
    }

    /// List all records of a table for one organization, newest first.
    pub async fn list_records(
        &self,
        table: &str,
        org: OrgId,
    ) -> Result<Vec<RecordRow>, StoreError> {
        let table = checked_table(table)?;
        let rows = sqlx::query_as::<_, RawRecordRow>(&format!(
            "SELECT id, organization_id, fields, created_at
             FROM {table} WHERE organization_id = $1 ORDER BY created_at DESC"
        ))
        .bind(org.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(RawRecordRow::into_record).collect())
    }

    /// Fetch one record, scoped by organization.
    pub async fn get_record(
        &self,
        table: &str,
        org: OrgId,
        id: RecordId,
    ) -> Result<Option<RecordRow>, StoreError> {
        let table = checked_table(table)?;
        let row = sqlx::query_as::<_, RawRecordRow>(&format!(
            "SELECT id, organization_id, fields, created_at
             FROM {table} WHERE id = $1 AND organization_id = $2"
        ))
        .bind(id.as_uuid())
        .bind(org.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(RawRecordRow::into_record))
    }

    /// Replace a record's field map. Returns whether a row was updated.
    pub async fn update_record(
        &self,
        table: &str,
        org: OrgId,
        id: RecordId,
        fields: Map<String, Value>,
    ) -> Result<bool, StoreError> {
        let table = checked_table(table)?;
        let result = sqlx::query(&format!(
            "UPDATE {table} SET fields = $1 WHERE id = $2 AND organization_id = $3"
        ))
        .bind(Value::Object(fields))
        .bind(id.as_uuid())
        .bind(org.as_uuid())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete a record. Returns whether a row was deleted.
    pub async fn delete_record(
        &self,
        table: &str,
        org: OrgId,
        id: RecordId,
    ) -> Result<bool, StoreError> {
        let table = checked_table(table)?;
        let result = sqlx::query(&format!(
            "DELETE FROM {table} WHERE id = $1 AND organization_id = $2"
        ))
        .bind(id.as_uuid())
        .bind(org.as_uuid())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Resolve a caller-supplied table name to the catalog's static name.
/// Returning the `&'static str` from the catalog (never the caller's
/// string) is what makes the `format!` splicing above safe.
fn checked_table(table: &str) -> Result<&'static str, StoreError> {
    schema_for(table)
        .map(|s| s.table)
        .ok_or_else(|| StoreError::UnknownTable(table.to_string()))
}

// ── Row types for SQLx mapping ──────────────────────────────────────

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    organization_id: Option<Uuid>,
    role: String,
    full_name: String,
    email: String,
}

impl ProfileRow {
    fn into_profile(self) -> UserProfile {
        UserProfile {
            id: UserId::from_uuid(self.id),
            organization_id: self.organization_id.map(OrgId::from_uuid),
            role: self.role,
            full_name: self.full_name,
            email: self.email,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrganizationRow {
    id: Uuid,
    name: String,
    is_active: bool,
    logo_url: Option<String>,
}

impl OrganizationRow {
    fn into_organization(self) -> Organization {
        Organization {
            id: OrgId::from_uuid(self.id),
            name: self.name,
            is_active: self.is_active,
            logo_url: self.logo_url,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MembershipRow {
    user_id: Uuid,
    organization_id: Uuid,
    role: String,
    is_primary: bool,
}

impl MembershipRow {
    fn into_membership(self) -> Membership {
        Membership {
            user_id: UserId::from_uuid(self.user_id),
            organization_id: OrgId::from_uuid(self.organization_id),
            role: self.role,
            is_primary: self.is_primary,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RawRecordRow {
    id: Uuid,
    organization_id: Uuid,
    fields: Value,
    created_at: DateTime<Utc>,
}

impl RawRecordRow {
    fn into_record(self) -> RecordRow {
        let fields = match self.fields {
            Value::Object(map) => map,
            _ => {
                tracing::warn!(id = %self.id, "record fields column is not an object; replacing with empty map");
                Map::new()
            }
        };
        RecordRow {
            id: RecordId::from_uuid(self.id),
            organization_id: OrgId::from_uuid(self.organization_id),
            fields,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checked_table_accepts_catalog_tables_only() {
        assert_eq!(checked_table("suppliers").unwrap(), "suppliers");
        assert!(matches!(
            checked_table("suppliers; DROP TABLE profiles"),
            Err(StoreError::UnknownTable(_))
        ));
    }
}
