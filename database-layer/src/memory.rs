// In-memory document store
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::store::DocumentStore;

/// Insertion-ordered in-process store. Used for development and tests.
pub struct MemoryStore<T> {
    docs: RwLock<Vec<T>>,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(Vec::new()),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fails when a document other than `doc` already holds its unique key
fn check_unique_key<T: Document>(docs: &[T], doc: &T) -> StoreResult<()> {
    let Some(key) = doc.unique_key() else {
        return Ok(());
    };
    let taken = docs.iter().any(|existing| {
        existing.id() != doc.id() && existing.unique_key().as_deref() == Some(key.as_str())
    });
    if taken {
        return Err(StoreError::DuplicateKey {
            collection: T::COLLECTION,
            key,
        });
    }
    Ok(())
}

#[async_trait]
impl<T: Document> DocumentStore<T> for MemoryStore<T> {
    async fn insert(&self, mut doc: T) -> StoreResult<T> {
        let mut docs = self.docs.write();
        if docs.iter().any(|existing| existing.id() == doc.id()) {
            return Err(StoreError::DuplicateId {
                collection: T::COLLECTION,
                id: doc.id(),
            });
        }
        check_unique_key(&docs, &doc)?;
        doc.stamp_created(Utc::now());
        docs.push(doc.clone());
        debug!(collection = T::COLLECTION, id = %doc.id(), "Document inserted");
        Ok(doc)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<T>> {
        Ok(self.docs.read().iter().find(|doc| doc.id() == id).cloned())
    }

    async fn list_by_scope(&self, scope: &str) -> StoreResult<Vec<T>> {
        Ok(self
            .docs
            .read()
            .iter()
            .filter(|doc| doc.scope() == scope)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> StoreResult<Vec<T>> {
        Ok(self.docs.read().clone())
    }

    async fn replace(&self, mut doc: T, expected_version: Option<u64>) -> StoreResult<T> {
        let mut docs = self.docs.write();
        let id = doc.id();
        check_unique_key(&docs, &doc)?;
        let slot = docs
            .iter_mut()
            .find(|existing| existing.id() == id)
            .ok_or(StoreError::NotFound {
                collection: T::COLLECTION,
                id,
            })?;

        if let Some(expected) = expected_version {
            if slot.version() != expected {
                return Err(StoreError::VersionConflict {
                    collection: T::COLLECTION,
                    id,
                    expected,
                    actual: slot.version(),
                });
            }
        }

        doc.stamp_replaced(slot, Utc::now());
        *slot = doc.clone();
        debug!(collection = T::COLLECTION, id = %id, version = doc.version(), "Document replaced");
        Ok(doc)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let mut docs = self.docs.write();
        let before = docs.len();
        docs.retain(|doc| doc.id() != id);
        Ok(docs.len() != before)
    }
}
