use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use billing_service::{summarize, BillingDraft, BillingFilter, BillingRecord, BillingReport, BillingSummary};
use chrono::Utc;
use logger_redacted::Redacted;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::server::MedilinkServer;
use crate::validation::{ensure_valid, ApiJson, RequestValidation};

/// Confirmation body returned by deletes
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    #[schema(example = "Billing record deleted successfully")]
    pub message: String,
    pub id: Uuid,
}

async fn load_billing(server: &MedilinkServer, id: Uuid) -> ApiResult<BillingRecord> {
    server
        .billing
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("billing record {id}")))
}

/// List a hospital's billing records
#[utoipa::path(
    get,
    path = "/api/payment/billing/hospital/{hospitalID}",
    responses(
        (status = 200, description = "Billing records in creation order", body = Vec<BillingRecord>),
        (status = 500, description = "Internal server error", body = ApiErrorResponse)
    ),
    params(
        ("hospitalID" = String, Path, description = "Hospital registration ID"),
        BillingFilter
    ),
    tag = "billing"
)]
pub async fn list_hospital_billing(
    State(server): State<MedilinkServer>,
    Path(hospital_id): Path<String>,
    Query(filter): Query<BillingFilter>,
) -> ApiResult<Json<Vec<BillingRecord>>> {
    let records = server.billing.list_by_scope(&hospital_id).await?;
    if filter.is_empty() {
        return Ok(Json(records));
    }
    Ok(Json(filter.apply_cloned(&records)))
}

/// Payment totals over a hospital's billing records
#[utoipa::path(
    get,
    path = "/api/payment/billing/hospital/{hospitalID}/summary",
    responses(
        (status = 200, description = "Paid, pending and total amounts", body = BillingSummary)
    ),
    params(("hospitalID" = String, Path, description = "Hospital registration ID")),
    tag = "billing"
)]
pub async fn hospital_billing_summary(
    State(server): State<MedilinkServer>,
    Path(hospital_id): Path<String>,
) -> ApiResult<Json<BillingSummary>> {
    let records = server.billing.list_by_scope(&hospital_id).await?;
    Ok(Json(summarize(&records)?))
}

/// Billing summary report as a PDF download
#[utoipa::path(
    get,
    path = "/api/payment/billing/hospital/{hospitalID}/report",
    responses(
        (status = 200, description = "PDF report", content_type = "application/pdf", body = Vec<u8>)
    ),
    params(("hospitalID" = String, Path, description = "Hospital registration ID")),
    tag = "billing"
)]
pub async fn hospital_billing_report(
    State(server): State<MedilinkServer>,
    Path(hospital_id): Path<String>,
) -> ApiResult<Response> {
    let records = server.billing.list_by_scope(&hospital_id).await?;
    let offset = server.report_offset();

    let pdf = tokio::task::spawn_blocking(move || BillingReport::build(&records, offset)?.to_pdf())
        .await
        .map_err(|e| ApiError::internal(format!("Report task failed: {e}")))??;

    info!(hospital_id = %hospital_id, bytes = pdf.len(), "Billing report generated");

    let disposition = format!("attachment; filename=\"billing-report-{hospital_id}.pdf\"");
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    )
        .into_response())
}

/// Create a billing record
#[utoipa::path(
    post,
    path = "/api/payment/billing",
    request_body = BillingDraft,
    responses(
        (status = 201, description = "Billing record created", body = BillingRecord),
        (status = 400, description = "Invalid fields", body = ApiErrorResponse),
        (status = 409, description = "Bill number already used", body = ApiErrorResponse)
    ),
    tag = "billing"
)]
pub async fn create_billing(
    State(server): State<MedilinkServer>,
    ApiJson(draft): ApiJson<BillingDraft>,
) -> ApiResult<(StatusCode, Json<BillingRecord>)> {
    ensure_valid(draft.validate_new())?;

    if let Some(bill_no) = draft.bill_no.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
        let existing = server.billing.list_by_scope(draft.hospital_id.trim()).await?;
        if existing.iter().any(|r| r.bill_no == bill_no) {
            return Err(ApiError::conflict(format!("Bill number {bill_no} is already in use")));
        }
    }

    let record = draft.into_record(Utc::now())?;
    let stored = server.billing.insert(record).await?;

    info!(
        id = %stored.id,
        bill_no = %stored.bill_no,
        hospital_id = %stored.hospital_id,
        contact = %Redacted(&stored.contact_number),
        "Billing record created"
    );
    Ok((StatusCode::CREATED, Json(stored)))
}

/// Get a billing record
#[utoipa::path(
    get,
    path = "/api/payment/billing/{id}",
    responses(
        (status = 200, description = "Billing record", body = BillingRecord),
        (status = 404, description = "Billing record not found", body = ApiErrorResponse)
    ),
    params(("id" = Uuid, Path, description = "Billing record ID")),
    tag = "billing"
)]
pub async fn get_billing(
    State(server): State<MedilinkServer>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BillingRecord>> {
    Ok(Json(load_billing(&server, id).await?))
}

/// Replace a billing record with the full body.
///
/// A body carrying `version` only succeeds while the stored record is at
/// that version.
#[utoipa::path(
    put,
    path = "/api/payment/billing/{id}",
    request_body = BillingDraft,
    responses(
        (status = 200, description = "Updated billing record", body = BillingRecord),
        (status = 400, description = "Invalid fields", body = ApiErrorResponse),
        (status = 404, description = "Billing record not found", body = ApiErrorResponse),
        (status = 409, description = "Record changed since it was read", body = ApiErrorResponse)
    ),
    params(("id" = Uuid, Path, description = "Billing record ID")),
    tag = "billing"
)]
pub async fn update_billing(
    State(server): State<MedilinkServer>,
    Path(id): Path<Uuid>,
    ApiJson(draft): ApiJson<BillingDraft>,
) -> ApiResult<Json<BillingRecord>> {
    draft.validate_request()?;

    let existing = load_billing(&server, id).await?;
    let updated = existing.apply_draft(&draft)?;
    let stored = server.billing.replace(updated, draft.version).await?;

    info!(id = %stored.id, version = stored.version, status = %stored.payment_status, "Billing record updated");
    Ok(Json(stored))
}

/// Delete a billing record
#[utoipa::path(
    delete,
    path = "/api/payment/billing/{id}",
    responses(
        (status = 200, description = "Billing record deleted", body = DeleteResponse),
        (status = 404, description = "Billing record not found", body = ApiErrorResponse)
    ),
    params(("id" = Uuid, Path, description = "Billing record ID")),
    tag = "billing"
)]
pub async fn delete_billing(
    State(server): State<MedilinkServer>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    if !server.billing.delete(id).await? {
        return Err(ApiError::not_found(format!("billing record {id}")));
    }

    info!(id = %id, "Billing record deleted");
    Ok(Json(DeleteResponse {
        message: "Billing record deleted successfully".to_string(),
        id,
    }))
}
