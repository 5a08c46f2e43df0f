//! MediLink Server - hospital records API
//!
//! This library provides the HTTP layer over the MediLink document stores:
//! billing records with their totals and PDF report, channeling and clinic
//! appointments, and hospital reference records.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod validation;

// Re-export commonly used types
pub use config::{ServerConfig, StoreBackend};
pub use error::*;
pub use server::MedilinkServer;

use axum::{middleware::from_fn, Router};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Create the main application router with all routes and middleware
pub fn create_app(server: MedilinkServer) -> Router {
    let timeout = Duration::from_secs(server.config.request_timeout);
    let cors = middleware::create_cors_layer(&server.config.cors_origins);

    routes::create_routes()
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(TimeoutLayer::new(timeout))
                .layer(from_fn(middleware::request_timing_middleware)),
        )
        .with_state(server)
}
