// Stored document contract
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// A record kept in a [`crate::DocumentStore`] collection.
///
/// Every document carries store-managed metadata: identity, a scope key
/// (the owning hospital) used for listings, a version stamp bumped on
/// every replace, and creation/update timestamps.
pub trait Document: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Collection name, used as the partition key in persistent backends
    const COLLECTION: &'static str;

    fn id(&self) -> Uuid;

    /// Key that listings are filtered by
    fn scope(&self) -> &str;

    fn version(&self) -> u64;

    fn created_at(&self) -> DateTime<Utc>;

    /// Natural key that no two documents of the collection may share.
    /// Stores reject a write that would duplicate it.
    fn unique_key(&self) -> Option<String> {
        None
    }

    /// Set the store-managed fields of a new document: `version = 1`,
    /// `created_at = updated_at = at`.
    fn stamp_created(&mut self, at: DateTime<Utc>);

    /// Carry metadata over from the stored `previous` revision: keep its
    /// creation time, bump its version, set `updated_at = at`.
    fn stamp_replaced(&mut self, previous: &Self, at: DateTime<Utc>);
}
