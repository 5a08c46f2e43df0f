use axum::Json;
use utoipa::OpenApi;

/// Main OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health endpoints
        crate::handlers::health::health_check,
        crate::handlers::health::version_info,

        // Billing endpoints
        crate::handlers::billing::list_hospital_billing,
        crate::handlers::billing::hospital_billing_summary,
        crate::handlers::billing::hospital_billing_report,
        crate::handlers::billing::create_billing,
        crate::handlers::billing::get_billing,
        crate::handlers::billing::update_billing,
        crate::handlers::billing::delete_billing,

        // Appointment endpoints
        crate::handlers::appointments::list_hospital_appointments,
        crate::handlers::appointments::create_appointment,
        crate::handlers::appointments::update_appointment_status,

        // Hospital endpoints
        crate::handlers::hospitals::create_hospital,
        crate::handlers::hospitals::list_hospitals,
        crate::handlers::hospitals::get_hospital,
        crate::handlers::hospitals::update_hospital,
        crate::handlers::hospitals::delete_hospital,
    ),
    components(
        schemas(
            crate::error::ApiErrorResponse,
            crate::handlers::health::HealthResponse,
            crate::handlers::health::VersionResponse,
            crate::handlers::billing::DeleteResponse,
            billing_service::BillingRecord,
            billing_service::BillingDraft,
            billing_service::BillingType,
            billing_service::ServiceLine,
            billing_service::BillingSummary,
            appointment_service::Appointment,
            appointment_service::AppointmentKind,
            appointment_service::AppointmentStatus,
            appointment_service::NewAppointment,
            appointment_service::StatusChange,
            crate::handlers::hospitals::Hospital,
            crate::handlers::hospitals::HospitalType,
            crate::handlers::hospitals::ServiceEntry,
            crate::handlers::hospitals::HospitalRequest,
        )
    ),
    tags(
        (name = "health", description = "System health and version endpoints"),
        (name = "billing", description = "Patient billing records, totals and reports"),
        (name = "appointments", description = "Channeling and clinic appointments"),
        (name = "hospitals", description = "Hospital reference records"),
    ),
    info(
        title = "MediLink API",
        version = "0.1.0",
        description = "Hospital, appointment and billing records for MediLink front desks.",
        license(name = "AGPL-3.0-only"),
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server"),
    ),
)]
pub struct ApiDoc;

/// Serve the OpenAPI document as JSON
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
