//! # Constraint-Code Mapping
//!
//! The store surfaces Postgres errors with their SQLSTATE code. Exactly two
//! codes get friendlier messages on the form: not-null violations and unique
//! violations. Everything else passes through as the raw database message.

/// SQLSTATE for a not-null constraint violation.
pub const NOT_NULL_VIOLATION: &str = "23502";

/// SQLSTATE for a unique constraint violation.
pub const UNIQUE_VIOLATION: &str = "23505";

/// Map a Postgres SQLSTATE code to a user-facing message, if it is one of
/// the two codes the form handles specially.
pub fn friendly_constraint_message(sqlstate: &str) -> Option<&'static str> {
    match sqlstate {
        NOT_NULL_VIOLATION => Some("A required field is missing."),
        UNIQUE_VIOLATION => Some("A record with these values already exists."),
        _ => None,
    }
}
