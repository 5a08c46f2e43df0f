pub mod paths;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::{
    handlers::{appointments, billing, health, hospitals},
    openapi,
    server::MedilinkServer,
};

/// Create health check routes
pub fn health_routes() -> Router<MedilinkServer> {
    Router::new()
        .route(paths::health::HEALTH, get(health::health_check))
        .route(paths::health::VERSION, get(health::version_info))
}

/// Create billing routes
pub fn billing_routes() -> Router<MedilinkServer> {
    Router::new()
        .route(paths::billing::BILLING, post(billing::create_billing))
        .route(
            paths::billing::BILLING_BY_ID,
            get(billing::get_billing)
                .put(billing::update_billing)
                .delete(billing::delete_billing),
        )
        .route(paths::billing::HOSPITAL_BILLING, get(billing::list_hospital_billing))
        .route(paths::billing::HOSPITAL_SUMMARY, get(billing::hospital_billing_summary))
        .route(paths::billing::HOSPITAL_REPORT, get(billing::hospital_billing_report))
}

/// Create appointment routes
pub fn appointment_routes() -> Router<MedilinkServer> {
    Router::new()
        .route(paths::appointments::APPOINTMENTS, post(appointments::create_appointment))
        .route(
            paths::appointments::HOSPITAL_APPOINTMENTS,
            get(appointments::list_hospital_appointments),
        )
        .route(
            paths::appointments::APPOINTMENT_STATUS,
            patch(appointments::update_appointment_status),
        )
}

/// Create hospital routes
pub fn hospital_routes() -> Router<MedilinkServer> {
    Router::new()
        .route(
            paths::hospitals::HOSPITALS,
            get(hospitals::list_hospitals).post(hospitals::create_hospital),
        )
        .route(
            paths::hospitals::HOSPITAL_BY_REGISTRATION,
            get(hospitals::get_hospital)
                .put(hospitals::update_hospital)
                .delete(hospitals::delete_hospital),
        )
}

/// Create all application routes
pub fn create_routes() -> Router<MedilinkServer> {
    Router::new()
        .merge(health_routes())
        .merge(billing_routes())
        .merge(appointment_routes())
        .merge(hospital_routes())
        .route(paths::docs::OPENAPI_JSON, get(openapi::openapi_json))
}
