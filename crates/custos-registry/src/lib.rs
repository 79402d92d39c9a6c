//! # custos-registry — Generic Record Engine
//!
//! The compliance registry stores roughly a dozen near-identical record
//! types (suppliers, incidents, policies, ...). Rather than a hand-written
//! module per table, every table is described once by a [`RecordSchema`]:
//! a field list with input kinds, required flags, and date-ordering rules.
//! The API layer drives its forms, validation, and filtering from the same
//! schema object.
//!
//! - [`schema`] — field specs and schema-level validation.
//! - [`catalog`] — the canonical schema per record table.
//! - [`constraint`] — Postgres constraint-code → friendly-message mapping.
//! - [`filter`] — single-pass text search and equality filtering over
//!   already-fetched rows.
//!
//! ## Canonical Field Naming
//!
//! The source data mixed localized and English names for the same logical
//! fields. The catalog defines exactly one canonical English snake_case key
//! per field; labels carry the human-readable form.

pub mod catalog;
pub mod constraint;
pub mod filter;
pub mod schema;

pub use catalog::{schema_for, table_names};
pub use constraint::friendly_constraint_message;
pub use filter::RowFilter;
pub use schema::{FieldKind, FieldSpec, RecordSchema};
