//! # Route Modules
//!
//! One module per dashboard surface. Handlers stay thin: extract, resolve
//! the tenant scope, delegate to the domain crates, map errors.

pub mod attachments;
pub mod context;
pub mod metrics;
pub mod records;
pub mod reports;
pub mod soc;
