//! # Identity Newtypes
//!
//! Domain-primitive newtypes for identifiers throughout the stack. Each
//! identifier is a distinct type — handler signatures and store calls cannot
//! silently swap a user for an organization.
//!
//! All three are UUID-based and therefore always valid by construction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_newtype {
    ($(#[$doc:meta])* $ty:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $ty(Uuid);

        impl $ty {
            /// Create a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            pub fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// Access the underlying UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $ty {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $ty {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::from_str(s).map(Self)
            }
        }
    };
}

uuid_newtype! {
    /// Identifier of an organization — the tenant scoping unit by which all
    /// compliance records are isolated.
    OrgId
}

uuid_newtype! {
    /// Identifier of an authenticated user, as issued by the upstream
    /// identity provider.
    UserId
}

uuid_newtype! {
    /// Identifier of a single compliance record row (supplier, incident,
    /// policy, ...), regardless of which table it lives in.
    RecordId
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn org_id_roundtrips_through_display_and_from_str() {
        let id = OrgId::new();
        let parsed = OrgId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn serde_is_transparent() {
        let id = UserId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn distinct_types_do_not_compare() {
        // Compile-time property: OrgId and UserId share a UUID but are
        // different types. This test just pins the accessor behavior.
        let raw = Uuid::new_v4();
        let org = OrgId::from_uuid(raw);
        let user = UserId::from_uuid(raw);
        assert_eq!(org.as_uuid(), user.as_uuid());
    }
}
