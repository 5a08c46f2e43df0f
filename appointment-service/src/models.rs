use chrono::{DateTime, Utc};
use database_layer::Document;
use error_common::{check_field, check_required, FieldErrors};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppointmentError, AppointmentResult};

lazy_static! {
    static ref CONTACT_NUMBER_REGEX: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentKind {
    Channeling,
    Clinic,
}

impl AppointmentKind {
    pub const ALL: [AppointmentKind; 2] = [AppointmentKind::Channeling, AppointmentKind::Clinic];

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentKind::Channeling => "channeling",
            AppointmentKind::Clinic => "clinic",
        }
    }
}

impl fmt::Display for AppointmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        AppointmentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| format!("unknown appointment kind '{s}'"))
    }
}

/// Appointment progress. The order of the variants is the only order a
/// status may move in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Completed,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 3] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Approved,
        AppointmentStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Approved => "approved",
            AppointmentStatus::Completed => "completed",
        }
    }

    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        next > self
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        AppointmentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| format!("unknown appointment status '{s}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub kind: AppointmentKind,
    pub status: AppointmentStatus,
    #[serde(rename = "hospitalID")]
    pub hospital_id: String,
    pub patient_name: String,
    #[serde(rename = "patientID")]
    pub patient_id: String,
    pub contact_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    pub appointment_date: DateTime<Utc>,
    #[serde(default)]
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Copy of this appointment moved to `next`, if that is a step forward
    pub fn transition(&self, next: AppointmentStatus) -> AppointmentResult<Appointment> {
        if !self.status.can_transition_to(next) {
            return Err(AppointmentError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        Ok(Appointment {
            status: next,
            ..self.clone()
        })
    }
}

impl Document for Appointment {
    const COLLECTION: &'static str = "appointments";

    fn id(&self) -> Uuid {
        self.id
    }

    fn scope(&self) -> &str {
        &self.hospital_id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
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

/// Booking request. New appointments always start out pending.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    #[serde(default)]
    pub kind: String,
    #[serde(rename = "hospitalID", default)]
    pub hospital_id: String,
    #[serde(default)]
    pub patient_name: String,
    #[serde(rename = "patientID", default)]
    pub patient_id: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub appointment_date: Option<DateTime<Utc>>,
}

impl NewAppointment {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        if self.kind.trim().is_empty() {
            errors.add("kind", "Appointment kind is required");
        } else if self.kind.parse::<AppointmentKind>().is_err() {
            errors.add("kind", "Appointment kind must be one of: channeling, clinic");
        }
        check_required!(errors, "hospitalID", self.hospital_id, "Hospital ID is required");
        check_required!(errors, "patientName", self.patient_name, "Patient name is required");
        check_required!(errors, "patientID", self.patient_id, "Patient ID is required");
        check_field!(
            errors,
            "contactNumber",
            CONTACT_NUMBER_REGEX.is_match(&self.contact_number),
            "Contact number must be a valid 10-digit number"
        );
        check_field!(
            errors,
            "appointmentDate",
            self.appointment_date.is_some(),
            "Appointment date is required"
        );
        errors
    }

    pub fn into_appointment(self, now: DateTime<Utc>) -> AppointmentResult<Appointment> {
        self.validate().into_result()?;
        let kind = self
            .kind
            .parse()
            .map_err(|e: String| AppointmentError::Validation(single("kind", e)))?;
        let appointment_date = self
            .appointment_date
            .ok_or_else(|| AppointmentError::Validation(single("appointmentDate", "Appointment date is required")))?;

        Ok(Appointment {
            id: Uuid::new_v4(),
            kind,
            status: AppointmentStatus::Pending,
            hospital_id: self.hospital_id.trim().to_string(),
            patient_name: self.patient_name.trim().to_string(),
            patient_id: self.patient_id.trim().to_string(),
            contact_number: self.contact_number,
            doctor_name: self.doctor_name.filter(|d| !d.trim().is_empty()),
            appointment_date,
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }
}

fn single(field: &str, message: impl Into<String>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.add(field, message);
    errors
}

/// Body of a status change request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
}
