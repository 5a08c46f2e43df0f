// Database connection management
use crate::error::{StoreError, StoreResult};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const CREATE_DOCUMENTS_TABLE: &str = "\
CREATE TABLE IF NOT EXISTS documents (
    seq BIGSERIAL,
    collection TEXT NOT NULL,
    id UUID NOT NULL,
    scope TEXT NOT NULL,
    version BIGINT NOT NULL,
    unique_key TEXT,
    body JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL,
    PRIMARY KEY (collection, id)
)";

const CREATE_SCOPE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS documents_scope_idx ON documents (collection, scope, seq)";

const ADD_UNIQUE_KEY_COLUMN: &str =
    "ALTER TABLE documents ADD COLUMN IF NOT EXISTS unique_key TEXT";

pub(crate) const UNIQUE_KEY_INDEX: &str = "documents_unique_key_idx";

const CREATE_UNIQUE_KEY_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS documents_unique_key_idx ON documents (collection, unique_key)";

/// Shared PostgreSQL connection pool
#[derive(Clone)]
pub struct DatabasePool {
    pool: Arc<PgPool>,
}

impl DatabasePool {
    /// Create a new database pool from connection string
    pub async fn new(connection_string: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(connection_string)
            .await
            .map_err(|e| StoreError::ConnectionFailed(e.to_string()))?;

        info!(max_connections, "Database connection pool created successfully");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Get the underlying PgPool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the documents table and its indexes if missing
    pub async fn ensure_schema(&self) -> StoreResult<()> {
        for statement in [
            CREATE_DOCUMENTS_TABLE,
            ADD_UNIQUE_KEY_COLUMN,
            CREATE_SCOPE_INDEX,
            CREATE_UNIQUE_KEY_INDEX,
        ] {
            sqlx::query(statement)
                .execute(self.pool())
                .await
                .map_err(|e| StoreError::QueryFailed(format!("Schema setup failed: {e}")))?;
        }
        info!("Document schema ready");
        Ok(())
    }

    /// Check if the pool is healthy
    pub async fn is_healthy(&self) -> bool {
        match sqlx::query("SELECT 1").fetch_one(self.pool()).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Database health check failed: {}", e);
                false
            }
        }
    }
}
