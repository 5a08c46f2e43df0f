// Document store interface
use async_trait::async_trait;
use uuid::Uuid;

use crate::document::Document;
use crate::error::StoreResult;

/// CRUD over one collection of documents.
///
/// Listings return documents in insertion order.
#[async_trait]
pub trait DocumentStore<T: Document>: Send + Sync {
    /// Persist a new document, stamping its store-managed fields
    async fn insert(&self, doc: T) -> StoreResult<T>;

    async fn get(&self, id: Uuid) -> StoreResult<Option<T>>;

    /// All documents whose scope equals `scope`
    async fn list_by_scope(&self, scope: &str) -> StoreResult<Vec<T>>;

    async fn list_all(&self) -> StoreResult<Vec<T>>;

    /// Replace the whole stored document with `doc`.
    ///
    /// With `expected_version` set, the write only happens if the stored
    /// version still matches; otherwise `StoreError::VersionConflict`.
    /// Without it the write is last-write-wins.
    async fn replace(&self, doc: T, expected_version: Option<u64>) -> StoreResult<T>;

    /// Hard delete. Returns whether a document was removed.
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}
