//! Server configuration.
//!
//! Layers, lowest to highest precedence: built-in defaults, an optional
//! YAML/TOML file, `MEDILINK__*` environment variables (a `.env` file is
//! loaded first), then command line flags applied by the binary.

use chrono::FixedOffset;
use config::{Config, ConfigError, Environment, File};
use error_common::MedilinkError;
use logger_redacted::{LogFormat, LoggerConfig};
use serde::{Deserialize, Serialize};

/// Where records are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process memory; lost on restart
    #[default]
    Memory,
    /// PostgreSQL `documents` table
    Postgres,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server name
    pub name: String,
    pub host: String,
    pub port: u16,
    /// Request timeout in seconds
    pub request_timeout: u64,
    pub store: StoreBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    /// Allowed browser origins; `*` allows any
    pub cors_origins: Vec<String>,
    /// Offset applied to dates printed in billing reports, in minutes east
    /// of UTC
    pub report_utc_offset_minutes: i32,
    pub logging: LoggerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "MediLink".to_string(),
            host: "0.0.0.0".to_string(),
            port: 5000,
            request_timeout: 30,
            store: StoreBackend::Memory,
            database_url: None,
            max_connections: 20,
            cors_origins: vec!["http://localhost:3000".to_string()],
            report_utc_offset_minutes: 330,
            logging: LoggerConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Build the configuration from defaults, `path` (if it exists) and the
    /// environment.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&ServerConfig::default())?);
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(false));
        }
        let config: ServerConfig = builder
            .add_source(
                Environment::with_prefix("MEDILINK")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_origins"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// `MEDILINK_ENV=production` switches logs to JSON
    pub fn apply_environment(&mut self, environment: Option<&str>) {
        if environment == Some("production") {
            self.logging.format = LogFormat::Json;
        }
    }

    /// Checks that need the fully merged configuration, including CLI flags
    pub fn validate(&self) -> error_common::Result<()> {
        if self.report_offset().is_none() {
            return Err(MedilinkError::ConfigError(format!(
                "report_utc_offset_minutes out of range: {}",
                self.report_utc_offset_minutes
            )));
        }
        if self.store == StoreBackend::Postgres && self.database_url.is_none() {
            return Err(MedilinkError::ConfigError(
                "database_url is required for the postgres store".to_string(),
            ));
        }
        Ok(())
    }

    pub fn report_offset(&self) -> Option<FixedOffset> {
        self.report_utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
