//! Request validation shared by the handlers.
//!
//! Request types collect every failing field into a [`FieldErrors`] map and
//! the handler turns a non-empty map into a 400 response carrying it.

use appointment_service::NewAppointment;
use axum::extract::{rejection::JsonRejection, FromRequest};
use billing_service::BillingDraft;
use error_common::FieldErrors;

use crate::error::ApiError;

/// JSON body extractor whose rejections are [`ApiError`] responses, so a
/// malformed body gets the same 400 error shape as a failed rule.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

/// Trait for validating request payloads
///
/// Implement this trait for all create/update request types to ensure
/// consistent validation across the API.
pub trait RequestValidation {
    /// Every rule that failed, keyed by field
    fn field_errors(&self) -> FieldErrors;

    /// Returns `Ok(())` if validation passes, or a validation `ApiError`
    /// carrying the field map.
    fn validate_request(&self) -> Result<(), ApiError> {
        ensure_valid(self.field_errors())
    }
}

pub fn ensure_valid(errors: FieldErrors) -> Result<(), ApiError> {
    errors.into_result().map_err(ApiError::from)
}

/// Billing bodies on update; creation adds the owning hospital rule
/// through [`BillingDraft::validate_new`].
impl RequestValidation for BillingDraft {
    fn field_errors(&self) -> FieldErrors {
        BillingDraft::validate(self)
    }
}

impl RequestValidation for NewAppointment {
    fn field_errors(&self) -> FieldErrors {
        NewAppointment::validate(self)
    }
}
