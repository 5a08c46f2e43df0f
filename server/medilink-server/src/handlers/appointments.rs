use appointment_service::{partition, Appointment, AppointmentKind, NewAppointment, StatusChange};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::server::MedilinkServer;
use crate::validation::{ApiJson, RequestValidation};

/// Optional status tab for appointment listings
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AppointmentListParams {
    /// Tab key such as `Pending`; compared in lowercase
    pub status: Option<String>,
}

/// List a hospital's appointments of one kind
#[utoipa::path(
    get,
    path = "/api/appointment/hospitalappointments/{kind}/{hospitalId}",
    responses(
        (status = 200, description = "Appointments in creation order", body = Vec<Appointment>),
        (status = 400, description = "Unknown appointment kind", body = ApiErrorResponse)
    ),
    params(
        ("kind" = String, Path, description = "channeling or clinic"),
        ("hospitalId" = String, Path, description = "Hospital registration ID"),
        AppointmentListParams
    ),
    tag = "appointments"
)]
pub async fn list_hospital_appointments(
    State(server): State<MedilinkServer>,
    Path((kind, hospital_id)): Path<(String, String)>,
    Query(params): Query<AppointmentListParams>,
) -> ApiResult<Json<Vec<Appointment>>> {
    let kind: AppointmentKind = kind.parse().map_err(ApiError::bad_request)?;

    let records: Vec<Appointment> = server
        .appointments
        .list_by_scope(&hospital_id)
        .await?
        .into_iter()
        .filter(|a| a.kind == kind)
        .collect();

    match params.status.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(tab) => Ok(Json(partition(&records, tab).into_iter().cloned().collect())),
        None => Ok(Json(records)),
    }
}

/// Book an appointment; it starts out pending
#[utoipa::path(
    post,
    path = "/api/appointment",
    request_body = NewAppointment,
    responses(
        (status = 201, description = "Appointment created", body = Appointment),
        (status = 400, description = "Invalid fields", body = ApiErrorResponse)
    ),
    tag = "appointments"
)]
pub async fn create_appointment(
    State(server): State<MedilinkServer>,
    ApiJson(request): ApiJson<NewAppointment>,
) -> ApiResult<(StatusCode, Json<Appointment>)> {
    request.validate_request()?;

    let appointment = request.into_appointment(Utc::now())?;
    let stored = server.appointments.insert(appointment).await?;

    info!(id = %stored.id, kind = %stored.kind, hospital_id = %stored.hospital_id, "Appointment created");
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Move an appointment forward: pending, approved, completed
#[utoipa::path(
    patch,
    path = "/api/appointment/{id}/status",
    request_body = StatusChange,
    responses(
        (status = 200, description = "Updated appointment", body = Appointment),
        (status = 404, description = "Appointment not found", body = ApiErrorResponse),
        (status = 409, description = "Backward move or stale version", body = ApiErrorResponse)
    ),
    params(("id" = Uuid, Path, description = "Appointment ID")),
    tag = "appointments"
)]
pub async fn update_appointment_status(
    State(server): State<MedilinkServer>,
    Path(id): Path<Uuid>,
    ApiJson(change): ApiJson<StatusChange>,
) -> ApiResult<Json<Appointment>> {
    let existing = server
        .appointments
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("appointment {id}")))?;

    let next = existing.transition(change.status)?;
    let stored = server.appointments.replace(next, change.version).await?;

    info!(id = %id, from = %existing.status, to = %stored.status, "Appointment status changed");
    Ok(Json(stored))
}
