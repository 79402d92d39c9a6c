//! # Store Front
//!
//! The single persistence handle the rest of the workspace uses. Postgres
//! when a database URL is configured, the in-memory demo store otherwise —
//! callers never branch on the backend themselves.

use serde_json::{Map, Value};

use custos_core::{Membership, OrgId, Organization, RecordId, UserId, UserProfile};

use crate::demo::DemoStore;
use crate::error::StoreError;
use crate::pg::PgStore;
use crate::records::RecordRow;

/// Backend-dispatching store handle. Cheap to clone.
#[derive(Clone)]
pub enum Store {
    Pg(PgStore),
    Demo(DemoStore),
}

macro_rules! delegate {
    ($self:ident . $method:ident ( $($arg:expr),* )) => {
        match $self {
            Store::Pg(store) => store.$method($($arg),*).await,
            Store::Demo(store) => store.$method($($arg),*).await,
        }
    };
}

impl Store {
    /// Connect to Postgres when `database_url` is present, otherwise fall
    /// back to the seeded in-memory store. State in the fallback does not
    /// survive restarts.
    pub async fn open(database_url: Option<&str>) -> Result<Self, StoreError> {
        match database_url {
            Some(url) => Ok(Self::Pg(PgStore::connect(url).await?)),
            None => {
                tracing::warn!(
                    "no database URL configured — using the in-memory demo store; \
                     state will not survive restarts"
                );
                Ok(Self::Demo(DemoStore::seeded()))
            }
        }
    }

    /// Whether this handle is backed by the in-memory demo store.
    pub fn is_demo(&self) -> bool {
        matches!(self, Self::Demo(_))
    }

    pub async fn profile(&self, user: UserId) -> Result<Option<UserProfile>, StoreError> {
        delegate!(self.profile(user))
    }

    pub async fn organization(&self, org: OrgId) -> Result<Option<Organization>, StoreError> {
        delegate!(self.organization(org))
    }

    pub async fn organizations_by_ids(
        &self,
        ids: &[OrgId],
    ) -> Result<Vec<Organization>, StoreError> {
        delegate!(self.organizations_by_ids(ids))
    }

    pub async fn memberships(&self, user: UserId) -> Result<Vec<Membership>, StoreError> {
        delegate!(self.memberships(user))
    }

    pub async fn set_profile_organization(
        &self,
        user: UserId,
        org: OrgId,
    ) -> Result<bool, StoreError> {
        delegate!(self.set_profile_organization(user, org))
    }

    pub async fn insert_record(
        &self,
        table: &str,
        org: OrgId,
        fields: Map<String, Value>,
    ) -> Result<RecordRow, StoreError> {
        delegate!(self.insert_record(table, org, fields))
    }

    pub async fn list_records(
        &self,
        table: &str,
        org: OrgId,
    ) -> Result<Vec<RecordRow>, StoreError> {
        delegate!(self.list_records(table, org))
    }

    pub async fn get_record(
        &self,
        table: &str,
        org: OrgId,
        id: RecordId,
    ) -> Result<Option<RecordRow>, StoreError> {
        delegate!(self.get_record(table, org, id))
    }

    pub async fn update_record(
        &self,
        table: &str,
        org: OrgId,
        id: RecordId,
        fields: Map<String, Value>,
    ) -> Result<bool, StoreError> {
        delegate!(self.update_record(table, org, id, fields))
    }

    pub async fn delete_record(
        &self,
        table: &str,
        org: OrgId,
        id: RecordId,
    ) -> Result<bool, StoreError> {
        delegate!(self.delete_record(table, org, id))
    }
}
