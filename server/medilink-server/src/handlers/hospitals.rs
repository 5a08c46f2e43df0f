use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use billing_service::is_valid_email;
use chrono::{DateTime, Utc};
use database_layer::Document;
use error_common::{check_field, check_required, FieldErrors};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::handlers::billing::DeleteResponse;
use crate::server::MedilinkServer;
use crate::validation::{ApiJson, RequestValidation};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HospitalType {
    Government,
    Private,
    Medicenter,
    /// Older clients send the misspelt `labarotary`
    #[serde(alias = "labarotary")]
    Laboratory,
}

/// A service the hospital advertises
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct ServiceEntry {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub description: String,
}

/// Hospital reference record, addressed by its registration ID
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Hospital {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub hospital_name: String,
    #[serde(rename = "registrationID")]
    pub registration_id: String,
    pub address: String,
    pub contact_number: String,
    pub hospital_email: String,
    pub hospital_type: HospitalType,
    #[serde(rename = "imageURL", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub service_details: Vec<ServiceEntry>,
    #[serde(default)]
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Hospital {
    const COLLECTION: &'static str = "hospitals";

    fn id(&self) -> Uuid {
        self.id
    }

    fn scope(&self) -> &str {
        &self.registration_id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.registration_id.clone())
    }

    fn stamp_created(&mut self, at: DateTime<Utc>) {
        self.version = 1;
        self.created_at = at;
        self.updated_at = at;
    }

    fn stamp_replaced(&mut self, previous: &Self, at: DateTime<Utc>) {
        self.version = previous.version + 1;
        self.created_at = previous.created_at;
        self.updated_at = at;
    }
}

/// Create or replace hospital request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HospitalRequest {
    #[serde(default)]
    pub hospital_name: String,
    #[serde(rename = "registrationID", default)]
    pub registration_id: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub hospital_email: String,
    /// government, private, medicenter or laboratory
    #[serde(default)]
    pub hospital_type: String,
    #[serde(rename = "imageURL", default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub service_details: Vec<ServiceEntry>,
    #[serde(default)]
    pub version: Option<u64>,
}

impl HospitalRequest {
    fn hospital_type(&self) -> Option<HospitalType> {
        serde_json::from_value(serde_json::Value::String(self.hospital_type.trim().to_lowercase())).ok()
    }

    fn into_hospital(self, id: Uuid, now: DateTime<Utc>) -> ApiResult<Hospital> {
        let hospital_type = self
            .hospital_type()
            .ok_or_else(|| ApiError::bad_request("Unknown hospital type"))?;
        Ok(Hospital {
            id,
            hospital_name: self.hospital_name.trim().to_string(),
            registration_id: self.registration_id.trim().to_string(),
            address: self.address,
            contact_number: self.contact_number,
            hospital_email: self.hospital_email,
            hospital_type,
            image_url: self.image_url.filter(|url| !url.trim().is_empty()),
            service_details: self.service_details,
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }
}

impl RequestValidation for HospitalRequest {
    fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_required!(errors, "hospitalName", self.hospital_name, "Hospital name is required");
        check_required!(errors, "registrationID", self.registration_id, "Registration ID is required");
        check_required!(errors, "address", self.address, "Address is required");
        check_required!(errors, "contactNumber", self.contact_number, "Contact number is required");
        check_field!(
            errors,
            "hospitalEmail",
            is_valid_email(&self.hospital_email),
            "Email is not valid"
        );
        check_field!(
            errors,
            "hospitalType",
            self.hospital_type().is_some(),
            "Hospital type must be one of: government, private, medicenter, laboratory"
        );
        errors
    }
}

async fn find_hospital(server: &MedilinkServer, registration_id: &str) -> ApiResult<Option<Hospital>> {
    Ok(server
        .hospitals
        .list_by_scope(registration_id)
        .await?
        .into_iter()
        .next())
}

async fn load_hospital(server: &MedilinkServer, registration_id: &str) -> ApiResult<Hospital> {
    find_hospital(server, registration_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("hospital {registration_id}")))
}

// ============================================================================
// HANDLERS
// ============================================================================

/// Register a hospital
#[utoipa::path(
    post,
    path = "/api/hospital",
    request_body = HospitalRequest,
    responses(
        (status = 201, description = "Hospital created", body = Hospital),
        (status = 400, description = "Invalid fields", body = ApiErrorResponse),
        (status = 409, description = "Registration ID already used", body = ApiErrorResponse)
    ),
    tag = "hospitals"
)]
pub async fn create_hospital(
    State(server): State<MedilinkServer>,
    ApiJson(request): ApiJson<HospitalRequest>,
) -> ApiResult<(StatusCode, Json<Hospital>)> {
    request.validate_request()?;

    let registration_id = request.registration_id.trim().to_string();
    if find_hospital(&server, &registration_id).await?.is_some() {
        return Err(ApiError::conflict(format!(
            "Hospital {registration_id} is already registered"
        )));
    }

    let hospital = request.into_hospital(Uuid::new_v4(), Utc::now())?;
    let stored = server.hospitals.insert(hospital).await?;

    info!(registration_id = %stored.registration_id, "Hospital registered");
    Ok((StatusCode::CREATED, Json(stored)))
}

/// List every hospital
#[utoipa::path(
    get,
    path = "/api/hospital",
    responses((status = 200, description = "All hospitals", body = Vec<Hospital>)),
    tag = "hospitals"
)]
pub async fn list_hospitals(State(server): State<MedilinkServer>) -> ApiResult<Json<Vec<Hospital>>> {
    Ok(Json(server.hospitals.list_all().await?))
}

/// Get a hospital by registration ID
#[utoipa::path(
    get,
    path = "/api/hospital/{registrationID}",
    responses(
        (status = 200, description = "Hospital", body = Hospital),
        (status = 404, description = "Hospital not found", body = ApiErrorResponse)
    ),
    params(("registrationID" = String, Path, description = "Hospital registration ID")),
    tag = "hospitals"
)]
pub async fn get_hospital(
    State(server): State<MedilinkServer>,
    Path(registration_id): Path<String>,
) -> ApiResult<Json<Hospital>> {
    Ok(Json(load_hospital(&server, &registration_id).await?))
}

/// Replace a hospital record. The registration ID cannot change.
#[utoipa::path(
    put,
    path = "/api/hospital/{registrationID}",
    request_body = HospitalRequest,
    responses(
        (status = 200, description = "Updated hospital", body = Hospital),
        (status = 400, description = "Invalid fields", body = ApiErrorResponse),
        (status = 404, description = "Hospital not found", body = ApiErrorResponse),
        (status = 409, description = "Record changed since it was read", body = ApiErrorResponse)
    ),
    params(("registrationID" = String, Path, description = "Hospital registration ID")),
    tag = "hospitals"
)]
pub async fn update_hospital(
    State(server): State<MedilinkServer>,
    Path(registration_id): Path<String>,
    ApiJson(request): ApiJson<HospitalRequest>,
) -> ApiResult<Json<Hospital>> {
    let mut errors = request.field_errors();
    if !request.registration_id.trim().is_empty() && request.registration_id.trim() != registration_id {
        errors.add("registrationID", "Registration ID cannot be changed");
    }
    crate::validation::ensure_valid(errors)?;

    let existing = load_hospital(&server, &registration_id).await?;
    let expected_version = request.version;
    let replacement = request.into_hospital(existing.id, existing.created_at)?;
    let stored = server.hospitals.replace(replacement, expected_version).await?;

    info!(registration_id = %stored.registration_id, version = stored.version, "Hospital updated");
    Ok(Json(stored))
}

/// Delete a hospital by registration ID
#[utoipa::path(
    delete,
    path = "/api/hospital/{registrationID}",
    responses(
        (status = 200, description = "Hospital deleted", body = DeleteResponse),
        (status = 404, description = "Hospital not found", body = ApiErrorResponse)
    ),
    params(("registrationID" = String, Path, description = "Hospital registration ID")),
    tag = "hospitals"
)]
pub async fn delete_hospital(
    State(server): State<MedilinkServer>,
    Path(registration_id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let existing = load_hospital(&server, &registration_id).await?;
    if !server.hospitals.delete(existing.id).await? {
        return Err(ApiError::not_found(format!("hospital {registration_id}")));
    }

    info!(registration_id = %registration_id, "Hospital deleted");
    Ok(Json(DeleteResponse {
        message: "Hospital deleted successfully".to_string(),
        id: existing.id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> HospitalRequest {
        HospitalRequest {
            hospital_name: "Lanka Medicenter".to_string(),
            registration_id: "H001".to_string(),
            address: "12 Galle Road, Colombo".to_string(),
            contact_number: "0112345678".to_string(),
            hospital_email: "info@lankamedi.lk".to_string(),
            hospital_type: "medicenter".to_string(),
            ..HospitalRequest::default()
        }
    }

    #[test]
    fn test_legacy_laboratory_spelling() {
        let parsed: HospitalType = serde_json::from_str("\"labarotary\"").unwrap();
        assert_eq!(parsed, HospitalType::Laboratory);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"laboratory\"");

        let mut req = request();
        req.hospital_type = "Labarotary".to_string();
        assert!(req.field_errors().is_empty());
    }

    #[test]
    fn test_request_validation() {
        assert!(request().field_errors().is_empty());

        let errors = HospitalRequest::default().field_errors();
        assert_eq!(errors.len(), 6);

        let mut req = request();
        req.hospital_type = "clinic".to_string();
        assert!(req.field_errors().contains("hospitalType"));
    }

    #[test]
    fn test_into_hospital_keeps_identity() {
        let id = Uuid::new_v4();
        let hospital = request().into_hospital(id, Utc::now()).unwrap();
        assert_eq!(hospital.id, id);
        assert_eq!(hospital.hospital_type, HospitalType::Medicenter);
        assert_eq!(hospital.scope(), "H001");
    }
}
