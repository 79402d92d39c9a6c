//! # Shared Validation Errors
//!
//! The error vocabulary shared by the registry (field validation) and the
//! tenant resolver (context failures). Crates with richer failure modes
//! define their own enums and convert into these at the API boundary.

use thiserror::Error;

/// A value-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was missing or empty.
    #[error("field '{field}' is required")]
    MissingField { field: String },

    /// A field value did not parse as its declared kind.
    #[error("field '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// Two date fields violate their ordering rule.
    #[error("'{earlier}' must not be after '{later}'")]
    DateOrder { earlier: String, later: String },
}

impl ValidationError {
    /// The field name the error is keyed by, for per-field form display.
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field } => field,
            Self::InvalidValue { field, .. } => field,
            Self::DateOrder { earlier, .. } => earlier,
        }
    }
}
