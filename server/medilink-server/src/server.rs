use anyhow::{Context, Result};
use appointment_service::Appointment;
use billing_service::BillingRecord;
use chrono::{FixedOffset, Offset, Utc};
use database_layer::{DatabasePool, DocumentStore, MemoryStore, PgDocumentStore};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::config::{ServerConfig, StoreBackend};
use crate::handlers::hospitals::Hospital;

/// Main MediLink server state
#[derive(Clone)]
pub struct MedilinkServer {
    /// Server configuration
    pub config: ServerConfig,
    pub billing: Arc<dyn DocumentStore<BillingRecord>>,
    pub appointments: Arc<dyn DocumentStore<Appointment>>,
    pub hospitals: Arc<dyn DocumentStore<Hospital>>,
    /// Present only with the postgres backend
    pub database: Option<DatabasePool>,
    pub started_at: Instant,
}

impl MedilinkServer {
    /// Create a server with the store backend named in `config`
    pub async fn new(config: ServerConfig) -> Result<Self> {
        match config.store {
            StoreBackend::Memory => Ok(Self::in_memory(config)),
            StoreBackend::Postgres => {
                let url = config
                    .database_url
                    .clone()
                    .context("database_url is required for the postgres store")?;
                let pool = DatabasePool::new(&url, config.max_connections).await?;
                pool.ensure_schema().await?;
                info!("Using PostgreSQL document store");
                Ok(Self::with_pool(config, pool))
            }
        }
    }

    /// In-process stores; used in development and tests
    pub fn in_memory(config: ServerConfig) -> Self {
        info!("Using in-memory document store");
        Self {
            config,
            billing: Arc::new(MemoryStore::new()),
            appointments: Arc::new(MemoryStore::new()),
            hospitals: Arc::new(MemoryStore::new()),
            database: None,
            started_at: Instant::now(),
        }
    }

    pub fn with_pool(config: ServerConfig, pool: DatabasePool) -> Self {
        Self {
            config,
            billing: Arc::new(PgDocumentStore::new(pool.clone())),
            appointments: Arc::new(PgDocumentStore::new(pool.clone())),
            hospitals: Arc::new(PgDocumentStore::new(pool.clone())),
            database: Some(pool),
            started_at: Instant::now(),
        }
    }

    /// Offset for dates printed in reports; UTC if misconfigured
    pub fn report_offset(&self) -> FixedOffset {
        self.config
            .report_offset()
            .unwrap_or_else(|| Utc.fix())
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
