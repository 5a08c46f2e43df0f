use error_common::FieldErrors;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum BillingError {
    /// One or more fields failed validation
    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    /// Transport failure or unexpected response from the billing API
    #[error("Network error: {0}")]
    Network(String),

    #[error("Billing record not found: {0}")]
    NotFound(String),

    /// The record changed since it was read
    #[error("Billing record conflict: {0}")]
    Conflict(String),

    #[error("No billing record is being edited")]
    NoActiveEdit,

    #[error("Billing record {0} is already being edited")]
    EditInProgress(Uuid),

    #[error("Billing record {0} is not in the loaded collection")]
    UnknownRecord(Uuid),

    /// A total left the representable decimal range
    #[error("Amount overflow while computing {0}")]
    AmountOverflow(&'static str),

    #[error("Report generation error: {0}")]
    Report(String),
}

impl From<FieldErrors> for BillingError {
    fn from(errors: FieldErrors) -> Self {
        BillingError::Validation(errors)
    }
}

pub type BillingResult<T> = Result<T, BillingError>;
