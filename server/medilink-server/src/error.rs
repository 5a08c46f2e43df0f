use appointment_service::AppointmentError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use billing_service::BillingError;
use database_layer::StoreError;
use error_common::{codes, FieldErrors};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Standard API error response structure
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Error type/code
    pub error_type: String,
    /// Stable error code such as `VALIDATION_1001`
    pub error_code: String,
    /// Human-readable error message
    pub message: String,
    /// Field-specific validation errors, keyed by wire field name
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub field_errors: Option<FieldErrors>,
    /// Timestamp when error occurred
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Suggested actions for resolving the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
}

/// Main API error enum
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field_errors: Option<FieldErrors>,
    },

    #[error("Resource not found: {resource_type}")]
    NotFound { resource_type: String },

    #[error("Resource conflict: {message}")]
    Conflict { message: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },
}

impl ApiError {
    /// Create a validation error with field-specific errors
    pub fn validation_with_fields(message: impl Into<String>, field_errors: FieldErrors) -> Self {
        Self::Validation {
            message: message.into(),
            field_errors: Some(field_errors),
        }
    }

    pub fn not_found(resource_type: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Store(store_err) => match store_err {
                StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                StoreError::VersionConflict { .. }
                | StoreError::DuplicateId { .. }
                | StoreError::DuplicateKey { .. } => StatusCode::CONFLICT,
                err if err.is_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "validation_error",
            ApiError::NotFound { .. } => "not_found",
            ApiError::Conflict { .. } => "conflict",
            ApiError::Store(StoreError::NotFound { .. }) => "not_found",
            ApiError::Store(
                StoreError::VersionConflict { .. }
                | StoreError::DuplicateId { .. }
                | StoreError::DuplicateKey { .. },
            ) => "conflict",
            ApiError::Store(err) if err.is_unavailable() => "service_unavailable",
            ApiError::Store(_) => "store_error",
            ApiError::Internal { .. } => "internal_error",
            ApiError::BadRequest { .. } => "bad_request",
        }
    }

    /// Stable code carried in the error body and logs
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => codes::validation::INVALID_INPUT,
            ApiError::BadRequest { .. } => codes::validation::INVALID_FORMAT,
            ApiError::NotFound { .. } | ApiError::Store(StoreError::NotFound { .. }) => {
                codes::resource::NOT_FOUND
            }
            ApiError::Conflict { .. } | ApiError::Store(StoreError::VersionConflict { .. }) => {
                codes::resource::VERSION_CONFLICT
            }
            ApiError::Store(StoreError::DuplicateId { .. } | StoreError::DuplicateKey { .. }) => {
                codes::resource::DUPLICATE_KEY
            }
            ApiError::Store(err) if err.is_unavailable() => codes::store::CONNECTION_FAILED,
            ApiError::Store(_) => codes::store::QUERY_FAILED,
            ApiError::Internal { .. } => "INTERNAL_9001",
        }
    }

    /// Get suggested actions for resolving the error
    pub fn suggestions(&self) -> Option<Vec<String>> {
        match self {
            ApiError::Validation { .. } => Some(vec![
                "Check the request payload for invalid fields".to_string(),
                "Ensure all required fields are provided".to_string(),
            ]),
            ApiError::NotFound { .. } | ApiError::Store(StoreError::NotFound { .. }) => Some(vec![
                "Verify the resource ID is correct".to_string(),
                "Reload the list; the record may have been deleted".to_string(),
            ]),
            ApiError::Conflict { .. } | ApiError::Store(StoreError::VersionConflict { .. }) => {
                Some(vec![
                    "Reload the record and apply your changes again".to_string(),
                ])
            }
            ApiError::Store(err) if err.is_unavailable() => Some(vec![
                "Try again in a few moments".to_string(),
                "Contact support if the issue persists".to_string(),
            ]),
            _ => None,
        }
    }

    /// Store errors rewritten for API consumers
    pub fn format_store_error(store_error: &StoreError) -> String {
        match store_error {
            StoreError::NotFound { collection, id } => {
                format!("No {collection} record with id {id}.")
            }
            StoreError::VersionConflict { expected, actual, .. } => format!(
                "The record was changed by someone else (version {actual}, you edited version {expected})."
            ),
            StoreError::DuplicateId { .. } => "A record with this id already exists.".to_string(),
            StoreError::DuplicateKey { key, .. } => format!("{key} is already in use."),
            err if err.is_unavailable() => "The record store is currently unavailable.".to_string(),
            _ => "Store operation failed. Please try again.".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();
        let status_code = self.status_code();

        if status_code.is_server_error() {
            error!(
                error_id = %error_id,
                error_type = %self.error_type(),
                status_code = %status_code.as_u16(),
                error = %self,
                "API error occurred"
            );
        } else {
            warn!(
                error_id = %error_id,
                error_type = %self.error_type(),
                status_code = %status_code.as_u16(),
                error = %self,
                "Request rejected"
            );
        }

        let suggestions = self.suggestions();
        let error_type = self.error_type().to_string();
        let error_code = self.error_code().to_string();
        let (message, field_errors) = match self {
            ApiError::Validation { message, field_errors } => (message, field_errors),
            ApiError::Store(ref store_err) => (ApiError::format_store_error(store_err), None),
            other => (other.to_string(), None),
        };

        let error_response = ApiErrorResponse {
            error_id,
            error_type,
            error_code,
            message,
            field_errors,
            timestamp: chrono::Utc::now(),
            suggestions,
        };

        (status_code, Json(error_response)).into_response()
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        ApiError::validation_with_fields("One or more fields are invalid", errors)
    }
}

impl From<BillingError> for ApiError {
    fn from(error: BillingError) -> Self {
        match error {
            BillingError::Validation(errors) => errors.into(),
            BillingError::NotFound(what) => ApiError::not_found(format!("billing record {what}")),
            BillingError::Conflict(message) => ApiError::conflict(message),
            other => ApiError::internal(other.to_string()),
        }
    }
}

impl From<AppointmentError> for ApiError {
    fn from(error: AppointmentError) -> Self {
        match error {
            AppointmentError::Validation(errors) => errors.into(),
            AppointmentError::NotFound(what) => ApiError::not_found(format!("appointment {what}")),
            AppointmentError::Conflict(message) => ApiError::conflict(message),
            err @ AppointmentError::InvalidTransition { .. } => ApiError::conflict(err.to_string()),
            other => ApiError::internal(other.to_string()),
        }
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
