//! # The Pure Resolution Function
//!
//! Given a profile, the organizations fetched for it, and the user's
//! membership rows, decide which organization scopes the session. No I/O —
//! the outcome tells the caller what to do, including whether a profile
//! repair write is needed.

use custos_core::{Membership, OrgId, Organization, UserProfile};

/// Outcome of resolving a profile against its organizations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// The profile's pointer refers to an active organization. Use it;
    /// perform no writes.
    Current(OrgId),
    /// The pointer was stale (or absent) but the user holds a membership in
    /// an active organization. The caller must repair the profile to point
    /// at `org_id`, then re-resolve once.
    Repair { org_id: OrgId },
    /// The profile pointed somewhere, but that organization is gone or
    /// inactive and no active membership exists. Fatal.
    StaleWithoutFallback,
    /// The profile had no pointer at all and no active membership exists.
    /// Fatal.
    NoMembership,
}

impl ResolutionOutcome {
    /// The user-facing message for the two fatal variants.
    pub fn fatal_message(&self) -> Option<&'static str> {
        match self {
            Self::StaleWithoutFallback => {
                Some("Your default organization was deleted or deactivated, and no other active organization is available.")
            }
            Self::NoMembership => {
                Some("Your account is not associated with any active organization.")
            }
            _ => None,
        }
    }
}

/// Decide the session's organization.
///
/// `organizations` holds every organization the caller fetched — the
/// pointer's target plus the membership targets, fetched by id rather than
/// joined through the membership table. `memberships` may arrive in any
/// order; rows flagged `is_primary` are preferred, otherwise the given
/// order is kept.
pub fn resolve_organization(
    profile: &UserProfile,
    organizations: &[Organization],
    memberships: &[Membership],
) -> ResolutionOutcome {
    let active = |id: OrgId| {
        organizations
            .iter()
            .any(|org| org.id == id && org.is_active)
    };

    if let Some(pointer) = profile.organization_id {
        if active(pointer) {
            return ResolutionOutcome::Current(pointer);
        }
    }

    // Membership fallback: primary first, then the incoming order.
    let mut ordered: Vec<&Membership> = memberships.iter().collect();
    ordered.sort_by_key(|m| !m.is_primary);
    if let Some(found) = ordered.iter().find(|m| active(m.organization_id)) {
        return ResolutionOutcome::Repair {
            org_id: found.organization_id,
        };
    }

    if profile.organization_id.is_some() {
        ResolutionOutcome::StaleWithoutFallback
    } else {
        ResolutionOutcome::NoMembership
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use custos_core::UserId;

    fn org(id: OrgId, active: bool) -> Organization {
        Organization {
            id,
            name: format!("org-{id}"),
            is_active: active,
            logo_url: None,
        }
    }

    fn profile(user: UserId, pointer: Option<OrgId>) -> UserProfile {
        UserProfile {
            id: user,
            organization_id: pointer,
            role: "member".into(),
            full_name: "Test User".into(),
            email: "user@example.com".into(),
        }
    }

    fn membership(user: UserId, org: OrgId, primary: bool) -> Membership {
        Membership {
            user_id: user,
            organization_id: org,
            role: "member".into(),
            is_primary: primary,
        }
    }

    #[test]
    fn active_pointer_resolves_unchanged() {
        let user = UserId::new();
        let home = OrgId::new();
        let outcome = resolve_organization(
            &profile(user, Some(home)),
            &[org(home, true)],
            &[membership(user, home, true)],
        );
        assert_eq!(outcome, ResolutionOutcome::Current(home));
    }

    #[test]
    fn stale_pointer_falls_back_to_primary_membership() {
        let user = UserId::new();
        let stale = OrgId::new();
        let secondary = OrgId::new();
        let primary = OrgId::new();
        let outcome = resolve_organization(
            &profile(user, Some(stale)),
            &[org(stale, false), org(secondary, true), org(primary, true)],
            &[
                membership(user, secondary, false),
                membership(user, primary, true),
            ],
        );
        assert_eq!(outcome, ResolutionOutcome::Repair { org_id: primary });
    }

    #[test]
    fn fallback_skips_inactive_membership_organizations() {
        let user = UserId::new();
        let stale = OrgId::new();
        let dead_primary = OrgId::new();
        let alive = OrgId::new();
        let outcome = resolve_organization(
            &profile(user, Some(stale)),
            &[org(dead_primary, false), org(alive, true)],
            &[
                membership(user, dead_primary, true),
                membership(user, alive, false),
            ],
        );
        assert_eq!(outcome, ResolutionOutcome::Repair { org_id: alive });
    }

    #[test]
    fn missing_pointer_org_row_counts_as_stale() {
        // The pointed-to organization is absent from the fetched set
        // entirely (deleted), not just flagged inactive.
        let user = UserId::new();
        let gone = OrgId::new();
        let alive = OrgId::new();
        let outcome = resolve_organization(
            &profile(user, Some(gone)),
            &[org(alive, true)],
            &[membership(user, alive, false)],
        );
        assert_eq!(outcome, ResolutionOutcome::Repair { org_id: alive });
    }

    #[test]
    fn stale_pointer_without_any_active_membership_is_fatal() {
        let user = UserId::new();
        let stale = OrgId::new();
        let outcome = resolve_organization(
            &profile(user, Some(stale)),
            &[org(stale, false)],
            &[membership(user, stale, true)],
        );
        assert_eq!(outcome, ResolutionOutcome::StaleWithoutFallback);
        assert!(outcome.fatal_message().unwrap().contains("deleted or deactivated"));
    }

    #[test]
    fn no_pointer_and_no_membership_is_fatal() {
        let user = UserId::new();
        let outcome = resolve_organization(&profile(user, None), &[], &[]);
        assert_eq!(outcome, ResolutionOutcome::NoMembership);
        assert!(outcome
            .fatal_message()
            .unwrap()
            .contains("not associated"));
    }

    #[test]
    fn no_pointer_with_active_membership_repairs() {
        let user = UserId::new();
        let home = OrgId::new();
        let outcome = resolve_organization(
            &profile(user, None),
            &[org(home, true)],
            &[membership(user, home, false)],
        );
        assert_eq!(outcome, ResolutionOutcome::Repair { org_id: home });
    }
}
