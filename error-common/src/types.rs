use thiserror::Error;

use crate::codes;

/// Top-level error for MediLink binaries: why startup or serving stopped
#[derive(Error, Debug)]
pub enum MedilinkError {
    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The record store could not be opened or prepared
    #[error("Store error: {0}")]
    StoreError(String),

    /// Binding or serving the HTTP listener failed
    #[error("Server error: {0}")]
    ServerError(String),
}

impl MedilinkError {
    /// Stable code for logs and error bodies
    pub fn code(&self) -> &'static str {
        match self {
            MedilinkError::ConfigError(_) => codes::config::INVALID_CONFIG,
            MedilinkError::StoreError(_) => codes::store::CONNECTION_FAILED,
            MedilinkError::ServerError(_) => codes::server::LISTENER_FAILED,
        }
    }
}

/// Result type alias for MediLink operations
pub type Result<T> = std::result::Result<T, MedilinkError>;

/// Log an error with its code and the operation it interrupted
pub fn log_error(context: &str, error: &MedilinkError) {
    tracing::error!(
        context = context,
        error_code = error.code(),
        error = %error,
        "MediLink error occurred"
    );
}
