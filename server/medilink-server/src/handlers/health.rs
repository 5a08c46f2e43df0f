use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

use crate::config::StoreBackend;
use crate::server::MedilinkServer;

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Overall system health status
    #[schema(example = "healthy")]
    pub status: String,
    /// Current timestamp in RFC3339 format
    #[schema(example = "2024-01-15T10:30:00Z")]
    pub timestamp: String,
    /// API version
    #[schema(example = "0.1.0")]
    pub version: String,
    /// System uptime in seconds
    #[schema(example = 3600)]
    pub uptime: u64,
    /// Individual service health checks
    pub checks: BTreeMap<String, String>,
}

/// Version information response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VersionResponse {
    /// Application name
    #[schema(example = "MediLink")]
    pub name: String,
    /// Application version
    #[schema(example = "0.1.0")]
    pub version: String,
    /// Active store backend
    #[schema(example = "memory")]
    pub store: String,
    /// Enabled features
    pub features: Vec<String>,
}

/// Health check handler
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "System is healthy", body = HealthResponse),
        (status = 503, description = "System is unhealthy", body = HealthResponse)
    )
)]
pub async fn health_check(State(server): State<MedilinkServer>) -> (StatusCode, Json<HealthResponse>) {
    let mut checks = BTreeMap::new();

    let store_healthy = match &server.database {
        Some(pool) => pool.is_healthy().await,
        None => true,
    };
    let store_status = if store_healthy { "healthy" } else { "unhealthy" };
    checks.insert("document_store".to_string(), store_status.to_string());

    let response = HealthResponse {
        status: store_status.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: server.uptime_seconds(),
        checks,
    };

    let status = if store_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}

/// Version information handler
#[utoipa::path(
    get,
    path = "/version",
    tag = "health",
    responses(
        (status = 200, description = "Version information retrieved successfully", body = VersionResponse)
    )
)]
pub async fn version_info(State(server): State<MedilinkServer>) -> Json<VersionResponse> {
    let store = match server.config.store {
        StoreBackend::Memory => "memory",
        StoreBackend::Postgres => "postgres",
    };

    Json(VersionResponse {
        name: server.config.name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store.to_string(),
        features: vec![
            "billing".to_string(),
            "billing-report-pdf".to_string(),
            "appointments".to_string(),
            "hospitals".to_string(),
            "optimistic-concurrency".to_string(),
        ],
    })
}
