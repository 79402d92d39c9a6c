//! # custos-store — Persistence Layer
//!
//! Postgres persistence via SQLx, with an in-memory fallback for demo mode
//! and development. The rest of the workspace talks to the [`Store`] enum
//! front and never sees which backend is live.
//!
//! ## Backends
//!
//! - [`PgStore`]: SQLx `PgPool` against the embedded migrations in
//!   `migrations/`. Record tables share one row shape — schema-declared and
//!   free-form fields live in a JSONB column, scoped by organization.
//! - [`DemoStore`]: DashMap fixtures seeded with a demo organization,
//!   profile, memberships, and a handful of records per table. Makes zero
//!   network calls.
//!
//! ## Attachments
//!
//! Uploaded files are content-addressed: the SHA-256 digest of the bytes is
//! the object key, and record fields reference the digest. See
//! [`attachments::AttachmentStore`].

pub mod attachments;
pub mod demo;
pub mod error;
pub mod pg;
pub mod records;
pub mod store;

pub use attachments::AttachmentStore;
pub use demo::DemoStore;
pub use error::StoreError;
pub use pg::PgStore;
pub use records::RecordRow;
pub use store::Store;
