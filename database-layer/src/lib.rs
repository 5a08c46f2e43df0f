//! Document persistence for MediLink records
//!
//! Hospitals, appointments and billing records are stored as whole
//! documents, one collection per record type. [`DocumentStore`] is the
//! seam the HTTP layer talks to; two backends implement it:
//!
//! - [`MemoryStore`]: insertion-ordered, in-process, for development and tests
//! - [`PgDocumentStore`]: PostgreSQL, one JSONB row per document in a shared
//!   `documents` table keyed by `(collection, id)`
//!
//! Every write stamps a version. A replace can carry the version it was
//! based on; a mismatch fails with [`StoreError::VersionConflict`] instead
//! of silently overwriting a newer revision.
//!
//! # Example
//!
//! ```rust,ignore
//! use database_layer::{DatabasePool, DocumentStore, PgDocumentStore};
//!
//! let pool = DatabasePool::new("postgresql://localhost/medilink", 10).await?;
//! pool.ensure_schema().await?;
//! let bills: PgDocumentStore<BillingRecord> = PgDocumentStore::new(pool);
//! let stored = bills.insert(record).await?;
//! ```

pub mod connection;
pub mod context;
pub mod document;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use connection::*;
pub use context::*;
pub use document::*;
pub use error::*;
pub use memory::*;
pub use postgres::*;
pub use store::*;
