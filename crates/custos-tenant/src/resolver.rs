//! # Store-Backed Resolver
//!
//! Fetches the pure function's inputs, applies its decision, performs the
//! single repair write when told to, and re-resolves exactly once. Every
//! failure is folded into the returned [`TenantContext`] as an error string
//! — pages render the banner, they do not unwind.

use serde::Serialize;
use thiserror::Error;

use custos_core::{demo_org_id, OrgId, UserId, UserProfile};
use custos_store::{Store, StoreError};

use crate::resolve::{resolve_organization, ResolutionOutcome};

/// The resolved tenant scope handed to every page and record operation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TenantContext {
    pub organization_id: Option<OrgId>,
    pub profile: Option<UserProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TenantContext {
    fn fatal(profile: Option<UserProfile>, message: impl Into<String>) -> Self {
        Self {
            organization_id: None,
            profile,
            error: Some(message.into()),
        }
    }
}

/// Failures of an explicit organization switch. Unlike resolution (which
/// reports through the context), switching is a deliberate user action and
/// gets real error semantics.
#[derive(Debug, Error)]
pub enum TenantError {
    #[error("user profile not found")]
    ProfileNotFound,

    #[error("you are not a member of that organization")]
    NotAMember,

    #[error("that organization is inactive")]
    OrganizationInactive,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Store-backed organization-context resolver.
#[derive(Clone)]
pub struct TenantResolver {
    store: Store,
}

impl TenantResolver {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Resolve the context for a session.
    ///
    /// - No user → empty context, no error.
    /// - `demo` set → the fixed demo organization id; the store is never
    ///   touched.
    /// - Otherwise: fetch, decide, repair-and-retry at most once.
    pub async fn resolve(&self, user: Option<UserId>, demo: bool) -> TenantContext {
        if demo {
            return TenantContext {
                organization_id: Some(demo_org_id()),
                profile: None,
                error: None,
            };
        }
        let Some(user) = user else {
            return TenantContext::default();
        };

        match self.resolve_inner(user).await {
            Ok(context) => context,
            Err(e) => {
                tracing::error!(user = %user, error = %e, "organization resolution failed");
                TenantContext::fatal(None, e.to_string())
            }
        }
    }

    async fn resolve_inner(&self, user: UserId) -> Result<TenantContext, StoreError> {
        let Some(profile) = self.store.profile(user).await? else {
            return Ok(TenantContext::fatal(None, "user profile not found"));
        };

        match self.decide(&profile).await? {
            ResolutionOutcome::Current(org_id) => Ok(TenantContext {
                organization_id: Some(org_id),
                profile: Some(profile),
                error: None,
            }),
            ResolutionOutcome::Repair { org_id } => {
                tracing::info!(
                    user = %user,
                    new_org = %org_id,
                    "repairing stale organization pointer"
                );
                self.store.set_profile_organization(user, org_id).await?;

                // Re-fetch and re-decide once. A second Repair means the
                // fallback itself went stale between the two reads; that is
                // surfaced as fatal rather than looped on.
                let Some(refreshed) = self.store.profile(user).await? else {
                    return Ok(TenantContext::fatal(None, "user profile not found"));
                };
                match self.decide(&refreshed).await? {
                    ResolutionOutcome::Current(org_id) => Ok(TenantContext {
                        organization_id: Some(org_id),
                        profile: Some(refreshed),
                        error: None,
                    }),
                    outcome => Ok(TenantContext::fatal(
                        Some(refreshed),
                        outcome
                            .fatal_message()
                            .unwrap_or("organization resolution did not converge"),
                    )),
                }
            }
            outcome => Ok(TenantContext::fatal(
                Some(profile),
                outcome.fatal_message().unwrap_or("organization resolution failed"),
            )),
        }
    }

    /// Fetch the pure function's inputs and run it. Membership organizations
    /// are fetched by id in a second query — not joined through the
    /// membership table — so a row-level-security policy that cannot
    /// evaluate the self-referential join never blocks the fallback.
    async fn decide(&self, profile: &UserProfile) -> Result<ResolutionOutcome, StoreError> {
        let memberships = self.store.memberships(profile.id).await?;

        let mut org_ids: Vec<OrgId> = profile.organization_id.into_iter().collect();
        for m in &memberships {
            if !org_ids.contains(&m.organization_id) {
                org_ids.push(m.organization_id);
            }
        }
        let organizations = self.store.organizations_by_ids(&org_ids).await?;

        Ok(resolve_organization(profile, &organizations, &memberships))
    }

    /// Switch the session to another organization the user is a member of.
    /// Returns the freshly resolved context — callers re-query with the new
    /// scope instead of reloading everything.
    pub async fn switch_organization(
        &self,
        user: UserId,
        target: OrgId,
    ) -> Result<TenantContext, TenantError> {
        if self.store.profile(user).await?.is_none() {
            return Err(TenantError::ProfileNotFound);
        }
        let memberships = self.store.memberships(user).await?;
        if !memberships.iter().any(|m| m.organization_id == target) {
            return Err(TenantError::NotAMember);
        }
        match self.store.organization(target).await? {
            Some(org) if org.is_active => {}
            _ => return Err(TenantError::OrganizationInactive),
        }

        self.store.set_profile_organization(user, target).await?;
        tracing::info!(user = %user, org = %target, "organization switched");
        Ok(self.resolve(Some(user), false).await)
    }

    /// The active organizations the user may switch to.
    pub async fn switchable_organizations(
        &self,
        user: UserId,
    ) -> Result<Vec<custos_core::Organization>, StoreError> {
        let memberships = self.store.memberships(user).await?;
        let ids: Vec<OrgId> = memberships.iter().map(|m| m.organization_id).collect();
        let orgs = self.store.organizations_by_ids(&ids).await?;
        Ok(orgs.into_iter().filter(|o| o.is_active).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custos_core::{Membership, Organization};
    use custos_store::DemoStore;

    fn org(id: OrgId, active: bool) -> Organization {
        Organization {
            id,
            name: "Org".into(),
            is_active: active,
            logo_url: None,
        }
    }

    fn resolver_with(store: DemoStore) -> TenantResolver {
        TenantResolver::new(Store::Demo(store))
    }

    fn seed_user(
        store: &DemoStore,
        pointer: Option<OrgId>,
        memberships: Vec<(OrgId, bool, bool)>, // (org, active, primary)
    ) -> UserId {
        let user = UserId::new();
        store.put_profile(UserProfile {
            id: user,
            organization_id: pointer,
            role: "member".into(),
            full_name: "T".into(),
            email: "t@example.com".into(),
        });
        let rows = memberships
            .iter()
            .map(|(org_id, _, primary)| Membership {
                user_id: user,
                organization_id: *org_id,
                role: "member".into(),
                is_primary: *primary,
            })
            .collect();
        store.put_memberships(user, rows);
        for (org_id, active, _) in memberships {
            store.put_organization(org(org_id, active));
        }
        user
    }

    #[tokio::test]
    async fn valid_pointer_resolves_without_writes() {
        let store = DemoStore::empty();
        let home = OrgId::new();
        let user = seed_user(&store, Some(home), vec![(home, true, true)]);

        let context = resolver_with(store.clone()).resolve(Some(user), false).await;
        assert_eq!(context.organization_id, Some(home));
        assert!(context.error.is_none());
        // No repair happened: the stored pointer is untouched.
        let profile = store.profile(user).await.unwrap().unwrap();
        assert_eq!(profile.organization_id, Some(home));
    }

    #[tokio::test]
    async fn stale_pointer_repairs_to_primary_membership() {
        let store = DemoStore::empty();
        let stale = OrgId::new();
        let secondary = OrgId::new();
        let primary = OrgId::new();
        let user = seed_user(
            &store,
            Some(stale),
            vec![(secondary, true, false), (primary, true, true)],
        );
        store.put_organization(org(stale, false));

        let context = resolver_with(store.clone()).resolve(Some(user), false).await;
        assert_eq!(context.organization_id, Some(primary));
        assert!(context.error.is_none());
        // The repair write landed.
        let profile = store.profile(user).await.unwrap().unwrap();
        assert_eq!(profile.organization_id, Some(primary));
    }

    #[tokio::test]
    async fn no_active_membership_is_fatal_with_null_org() {
        let store = DemoStore::empty();
        let stale = OrgId::new();
        let user = seed_user(&store, Some(stale), vec![(stale, false, true)]);

        let context = resolver_with(store).resolve(Some(user), false).await;
        assert_eq!(context.organization_id, None);
        assert!(context.error.unwrap().contains("deleted or deactivated"));
    }

    #[tokio::test]
    async fn demo_flag_short_circuits_with_zero_store_calls() {
        // An empty store: any store access would find nothing and produce
        // an error or a None organization. Demo mode must not notice.
        let store = DemoStore::empty();
        let context = resolver_with(store).resolve(Some(UserId::new()), true).await;
        assert_eq!(context.organization_id, Some(demo_org_id()));
        assert!(context.error.is_none());
        assert!(context.profile.is_none());
    }

    #[tokio::test]
    async fn no_user_yields_empty_context() {
        let context = resolver_with(DemoStore::empty()).resolve(None, false).await;
        assert!(context.organization_id.is_none());
        assert!(context.profile.is_none());
        assert!(context.error.is_none());
    }

    #[tokio::test]
    async fn switch_rejects_non_member_target() {
        let store = DemoStore::empty();
        let home = OrgId::new();
        let user = seed_user(&store, Some(home), vec![(home, true, true)]);
        let elsewhere = OrgId::new();
        store.put_organization(org(elsewhere, true));

        let err = resolver_with(store)
            .switch_organization(user, elsewhere)
            .await
            .unwrap_err();
        assert!(matches!(err, TenantError::NotAMember));
    }

    #[tokio::test]
    async fn switch_updates_pointer_and_returns_new_context() {
        let store = DemoStore::empty();
        let home = OrgId::new();
        let other = OrgId::new();
        let user = seed_user(
            &store,
            Some(home),
            vec![(home, true, true), (other, true, false)],
        );

        let context = resolver_with(store.clone())
            .switch_organization(user, other)
            .await
            .unwrap();
        assert_eq!(context.organization_id, Some(other));
        let profile = store.profile(user).await.unwrap().unwrap();
        assert_eq!(profile.organization_id, Some(other));
    }

    #[tokio::test]
    async fn switch_rejects_inactive_target() {
        let store = DemoStore::empty();
        let home = OrgId::new();
        let dead = OrgId::new();
        let user = seed_user(
            &store,
            Some(home),
            vec![(home, true, true), (dead, false, false)],
        );

        let err = resolver_with(store)
            .switch_organization(user, dead)
            .await
            .unwrap_err();
        assert!(matches!(err, TenantError::OrganizationInactive));
    }
}
