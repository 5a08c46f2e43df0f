use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("{collection} document {id} not found")]
    NotFound { collection: &'static str, id: Uuid },

    #[error("{collection} document {id} is at version {actual}, write expected {expected}")]
    VersionConflict {
        collection: &'static str,
        id: Uuid,
        expected: u64,
        actual: u64,
    },

    #[error("{collection} document {id} already exists")]
    DuplicateId { collection: &'static str, id: Uuid },

    #[error("{collection} document with key {key} already exists")]
    DuplicateKey { collection: &'static str, key: String },

    #[error("Corrupt document: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),
}

impl StoreError {
    /// Whether the store itself is unreachable rather than the request being wrong
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            StoreError::ConnectionFailed(_) | StoreError::SqlxError(sqlx::Error::PoolTimedOut)
        )
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
