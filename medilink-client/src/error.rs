use appointment_service::AppointmentError;
use billing_service::BillingError;
use error_common::FieldErrors;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// The parts of an API error body the client cares about. Every field is
/// optional so bodies from proxies or older servers still parse.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error_type: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub field_errors: Option<FieldErrors>,
}

impl ErrorBody {
    /// Parse a response body, keeping raw text as the message when it is
    /// not JSON
    pub fn parse(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_else(|_| ErrorBody {
            message: (!text.trim().is_empty()).then(|| text.trim().to_string()),
            ..ErrorBody::default()
        })
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to build HTTP client: {0}")]
    Setup(String),

    #[error("Request error: {0}")]
    Request(String),

    #[error("API error {status}: {}", .body.message.as_deref().unwrap_or("no details"))]
    Status { status: StatusCode, body: ErrorBody },

    #[error("Response parse error: {0}")]
    Decode(String),
}

impl ClientError {
    fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            ClientError::Status { body, .. } => body.field_errors.clone().filter(|e| !e.is_empty()),
            _ => None,
        }
    }

    fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

impl From<ClientError> for BillingError {
    fn from(err: ClientError) -> Self {
        if let Some(errors) = err.field_errors() {
            return BillingError::Validation(errors);
        }
        match err.status() {
            Some(StatusCode::NOT_FOUND) => BillingError::NotFound(err.to_string()),
            Some(StatusCode::CONFLICT) => BillingError::Conflict(err.to_string()),
            _ => BillingError::Network(err.to_string()),
        }
    }
}

impl From<ClientError> for AppointmentError {
    fn from(err: ClientError) -> Self {
        if let Some(errors) = err.field_errors() {
            return AppointmentError::Validation(errors);
        }
        match err.status() {
            Some(StatusCode::NOT_FOUND) => AppointmentError::NotFound(err.to_string()),
            Some(StatusCode::CONFLICT) => AppointmentError::Conflict(err.to_string()),
            _ => AppointmentError::Network(err.to_string()),
        }
    }
}
