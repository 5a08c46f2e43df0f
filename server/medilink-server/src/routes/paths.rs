//! Centralized API route path constants
//!
//! Runtime routes use these constants. utoipa `#[path(...)]` attributes need
//! literals in `{param}` form and must be kept in sync by hand.

/// API base path
pub const API: &str = "/api";

/// Health check endpoints
pub mod health {
    pub const HEALTH: &str = "/health";
    pub const VERSION: &str = "/version";
}

/// Billing endpoints
pub mod billing {
    pub const BILLING: &str = "/api/payment/billing";
    pub const BILLING_BY_ID: &str = "/api/payment/billing/:id";
    pub const HOSPITAL_BILLING: &str = "/api/payment/billing/hospital/:hospital_id";
    pub const HOSPITAL_SUMMARY: &str = "/api/payment/billing/hospital/:hospital_id/summary";
    pub const HOSPITAL_REPORT: &str = "/api/payment/billing/hospital/:hospital_id/report";
}

/// Appointment endpoints
pub mod appointments {
    pub const APPOINTMENTS: &str = "/api/appointment";
    pub const HOSPITAL_APPOINTMENTS: &str =
        "/api/appointment/hospitalappointments/:kind/:hospital_id";
    pub const APPOINTMENT_STATUS: &str = "/api/appointment/:id/status";
}

/// Hospital endpoints
pub mod hospitals {
    pub const HOSPITALS: &str = "/api/hospital";
    pub const HOSPITAL_BY_REGISTRATION: &str = "/api/hospital/:registration_id";
}

/// OpenAPI document
pub mod docs {
    pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";
}
