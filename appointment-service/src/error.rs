use error_common::FieldErrors;
use thiserror::Error;
use uuid::Uuid;

use crate::models::AppointmentStatus;

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Appointment not found: {0}")]
    NotFound(String),

    #[error("Appointment conflict: {0}")]
    Conflict(String),

    /// Status may only move forward: pending, approved, completed
    #[error("Cannot move appointment from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Appointment {0} is not in the loaded collection")]
    UnknownRecord(Uuid),
}

impl From<FieldErrors> for AppointmentError {
    fn from(errors: FieldErrors) -> Self {
        AppointmentError::Validation(errors)
    }
}

pub type AppointmentResult<T> = Result<T, AppointmentError>;
