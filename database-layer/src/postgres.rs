// PostgreSQL document store: one JSONB row per document
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, Row};
use std::marker::PhantomData;
use tracing::debug;
use uuid::Uuid;

use crate::connection::{DatabasePool, UNIQUE_KEY_INDEX};
use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::store::DocumentStore;

const UNIQUE_VIOLATION: &str = "23505";

pub struct PgDocumentStore<T> {
    pool: DatabasePool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PgDocumentStore<T> {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }
}

fn decode<T: Document>(row: &PgRow) -> StoreResult<T> {
    let body: serde_json::Value = row.try_get("body")?;
    Ok(serde_json::from_value(body)?)
}

fn version_param(version: u64) -> i64 {
    i64::try_from(version).unwrap_or(i64::MAX)
}

/// Translate a unique violation on write into the matching store error
fn write_error<T: Document>(error: sqlx::Error, doc: &T) -> StoreError {
    match error {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            match (db.constraint(), doc.unique_key()) {
                (Some(UNIQUE_KEY_INDEX), Some(key)) => StoreError::DuplicateKey {
                    collection: T::COLLECTION,
                    key,
                },
                _ => StoreError::DuplicateId {
                    collection: T::COLLECTION,
                    id: doc.id(),
                },
            }
        }
        other => other.into(),
    }
}

#[async_trait]
impl<T: Document> DocumentStore<T> for PgDocumentStore<T> {
    async fn insert(&self, mut doc: T) -> StoreResult<T> {
        let now = Utc::now();
        doc.stamp_created(now);
        let body = serde_json::to_value(&doc)?;

        sqlx::query(
            "INSERT INTO documents \
             (collection, id, scope, version, unique_key, body, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(T::COLLECTION)
        .bind(doc.id())
        .bind(doc.scope())
        .bind(version_param(doc.version()))
        .bind(doc.unique_key())
        .bind(body)
        .bind(doc.created_at())
        .bind(now)
        .execute(self.pool.pool())
        .await
        .map_err(|e| write_error(e, &doc))?;

        debug!(collection = T::COLLECTION, id = %doc.id(), "Document inserted");
        Ok(doc)
    }

    async fn get(&self, id: Uuid) -> StoreResult<Option<T>> {
        let row = sqlx::query("SELECT body FROM documents WHERE collection = $1 AND id = $2")
            .bind(T::COLLECTION)
            .bind(id)
            .fetch_optional(self.pool.pool())
            .await?;
        row.as_ref().map(decode::<T>).transpose()
    }

    async fn list_by_scope(&self, scope: &str) -> StoreResult<Vec<T>> {
        let rows = sqlx::query(
            "SELECT body FROM documents WHERE collection = $1 AND scope = $2 ORDER BY seq",
        )
        .bind(T::COLLECTION)
        .bind(scope)
        .fetch_all(self.pool.pool())
        .await?;
        rows.iter().map(decode::<T>).collect()
    }

    async fn list_all(&self) -> StoreResult<Vec<T>> {
        let rows = sqlx::query("SELECT body FROM documents WHERE collection = $1 ORDER BY seq")
            .bind(T::COLLECTION)
            .fetch_all(self.pool.pool())
            .await?;
        rows.iter().map(decode::<T>).collect()
    }

    async fn replace(&self, mut doc: T, expected_version: Option<u64>) -> StoreResult<T> {
        let id = doc.id();
        let mut tx = self.pool.pool().begin().await?;

        let row = sqlx::query(
            "SELECT body FROM documents WHERE collection = $1 AND id = $2 FOR UPDATE",
        )
        .bind(T::COLLECTION)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let previous: T = match row {
            Some(row) => decode(&row)?,
            None => {
                return Err(StoreError::NotFound {
                    collection: T::COLLECTION,
                    id,
                })
            }
        };

        if let Some(expected) = expected_version {
            if previous.version() != expected {
                return Err(StoreError::VersionConflict {
                    collection: T::COLLECTION,
                    id,
                    expected,
                    actual: previous.version(),
                });
            }
        }

        let now = Utc::now();
        doc.stamp_replaced(&previous, now);
        let body = serde_json::to_value(&doc)?;

        sqlx::query(
            "UPDATE documents SET scope = $3, version = $4, unique_key = $5, body = $6, updated_at = $7 \
             WHERE collection = $1 AND id = $2",
        )
        .bind(T::COLLECTION)
        .bind(id)
        .bind(doc.scope())
        .bind(version_param(doc.version()))
        .bind(doc.unique_key())
        .bind(body)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| write_error(e, &doc))?;

        tx.commit().await?;
        debug!(collection = T::COLLECTION, id = %id, version = doc.version(), "Document replaced");
        Ok(doc)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let rows_affected = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(T::COLLECTION)
            .bind(id)
            .execute(self.pool.pool())
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }
}
