use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use tracing::info;

use error_common::{log_error, MedilinkError};
use logger_redacted::init_tracing;
use medilink_server::{create_app, MedilinkServer, ServerConfig, StoreBackend};

/// MediLink HTTP Server
#[derive(Parser, Debug)]
#[command(name = "medilink-server")]
#[command(about = "Hospital, appointment and billing records HTTP API server")]
struct Args {
    /// Server bind address
    #[arg(long)]
    host: Option<String>,

    /// Server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Configuration file path (YAML or TOML)
    #[arg(short, long, default_value = "medilink-server")]
    config: String,

    /// Record store backend
    #[arg(long, value_enum)]
    store: Option<StoreBackend>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(store) = self.store {
            config.store = store;
        }
        if let Some(url) = self.database_url {
            config.database_url = Some(url);
        }
        if self.verbose {
            config.logging.level = "debug".to_string();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = ServerConfig::load(Some(&args.config)).context("Failed to load configuration")?;
    config.apply_environment(env::var("MEDILINK_ENV").ok().as_deref());
    args.apply(&mut config);

    init_tracing(&config.logging).context("Failed to initialise tracing")?;
    config.validate().map_err(|e| fatal("configuration", e))?;

    info!("Starting MediLink HTTP Server");
    info!(version = env!("CARGO_PKG_VERSION"), store = ?config.store, "Configuration loaded");

    let addr = config.bind_address();
    let server = MedilinkServer::new(config)
        .await
        .map_err(|e| fatal("store", MedilinkError::StoreError(format!("{e:#}"))))?;
    let app = create_app(server);

    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        fatal("listener", MedilinkError::ServerError(format!("Failed to bind to {addr}: {e}")))
    })?;

    info!("MediLink server running on http://{}", addr);
    info!("Health check available at: http://{}/health", addr);
    info!("OpenAPI document at: http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| fatal("serve", MedilinkError::ServerError(e.to_string())))?;

    info!("MediLink server stopped");
    Ok(())
}

/// Log a startup or serving failure with its code before exiting
fn fatal(context: &str, error: MedilinkError) -> anyhow::Error {
    log_error(context, &error);
    error.into()
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
