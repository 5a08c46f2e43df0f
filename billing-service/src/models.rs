use chrono::{DateTime, Utc};
use database_layer::Document;
use error_common::FieldErrors;
use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::validation::validate_billing;

/// Payment status that marks a bill as settled. Compared by exact equality.
pub const PAID_STATUS: &str = "Paid";

/// Kind of service a bill was raised for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum BillingType {
    Channeling,
    Admission,
    Scan,
    #[serde(rename = "Lab Test")]
    LabTest,
}

impl BillingType {
    pub const ALL: [BillingType; 4] = [
        BillingType::Channeling,
        BillingType::Admission,
        BillingType::Scan,
        BillingType::LabTest,
    ];

    /// Wire and display name
    pub fn as_str(self) -> &'static str {
        match self {
            BillingType::Channeling => "Channeling",
            BillingType::Admission => "Admission",
            BillingType::Scan => "Scan",
            BillingType::LabTest => "Lab Test",
        }
    }
}

impl fmt::Display for BillingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        BillingType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| format!("unknown billing type '{wanted}'"))
    }
}

/// One itemised service line on a bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLine {
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "lenient_amount")]
    #[schema(value_type = String, example = "1500.00")]
    pub cost: Decimal,
}

fn default_quantity() -> u32 {
    1
}

/// Amount as a form sends it: a number, a numeric string, `""` or `null`.
/// Anything that is not a number reads as zero.
fn lenient_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FormAmount {
        Number(Decimal),
        Other(#[allow(dead_code)] IgnoredAny),
    }

    Ok(match Option::<FormAmount>::deserialize(deserializer)? {
        Some(FormAmount::Number(amount)) => amount,
        Some(FormAmount::Other(_)) | None => Decimal::ZERO,
    })
}

impl ServiceLine {
    /// The empty line a form appends: no description, quantity 1, cost 0
    pub fn blank() -> Self {
        Self {
            description: String::new(),
            quantity: 1,
            cost: Decimal::ZERO,
        }
    }

    /// `cost * quantity`, or `None` when the product overflows
    pub fn line_total(&self) -> Option<Decimal> {
        self.cost.checked_mul(Decimal::from(self.quantity))
    }
}

/// A stored patient invoice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BillingRecord {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Display key, fixed at creation
    pub bill_no: String,
    #[serde(rename = "hospitalID")]
    pub hospital_id: String,
    pub billing_type: BillingType,
    pub patient_name: String,
    #[serde(rename = "patientID")]
    pub patient_id: String,
    pub contact_number: String,
    pub patient_email: String,
    /// Entered by staff. Not derived from `service_details`.
    #[schema(value_type = String, example = "1500.50")]
    pub total_amount: Decimal,
    pub payment_method: String,
    pub payment_status: String,
    #[serde(default)]
    pub service_details: Vec<ServiceLine>,
    #[serde(rename = "downloadURL", default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    #[serde(default)]
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BillingRecord {
    pub fn is_paid(&self) -> bool {
        self.payment_status == PAID_STATUS
    }

    /// Sum of `cost * quantity` over the service lines, `None` on overflow
    pub fn line_item_total(&self) -> Option<Decimal> {
        self.service_details
            .iter()
            .try_fold(Decimal::ZERO, |sum, line| sum.checked_add(line.line_total()?))
    }

    /// Whether the entered total differs from the itemised lines.
    ///
    /// Bills without lines never disagree. Lines whose sum overflows always
    /// disagree.
    pub fn totals_disagree(&self) -> bool {
        !self.service_details.is_empty() && self.line_item_total() != Some(self.total_amount)
    }

    /// Editable copy of this record, carrying the version it was read at
    pub fn to_draft(&self) -> BillingDraft {
        BillingDraft {
            bill_no: Some(self.bill_no.clone()),
            hospital_id: self.hospital_id.clone(),
            billing_type: self.billing_type.as_str().to_string(),
            patient_name: self.patient_name.clone(),
            patient_id: self.patient_id.clone(),
            contact_number: self.contact_number.clone(),
            patient_email: self.patient_email.clone(),
            total_amount: self.total_amount,
            payment_method: self.payment_method.clone(),
            payment_status: self.payment_status.clone(),
            service_details: self.service_details.clone(),
            download_url: self.download_url.clone(),
            version: Some(self.version),
        }
    }

    /// Full replacement of this record from an edited draft.
    ///
    /// Identity, bill number, owning hospital and store metadata are kept;
    /// every editable field comes from the draft. A draft that tries to
    /// change the bill number is rejected.
    pub fn apply_draft(&self, draft: &BillingDraft) -> Result<BillingRecord, FieldErrors> {
        let mut errors = validate_billing(draft);
        if let Some(bill_no) = draft.bill_no.as_deref() {
            if bill_no != self.bill_no {
                errors.add("billNo", "Bill number cannot be changed");
            }
        }
        errors.into_result()?;

        let billing_type = parse_billing_type(&draft.billing_type)?;
        Ok(BillingRecord {
            id: self.id,
            bill_no: self.bill_no.clone(),
            hospital_id: self.hospital_id.clone(),
            billing_type,
            patient_name: draft.patient_name.trim().to_string(),
            patient_id: draft.patient_id.trim().to_string(),
            contact_number: draft.contact_number.clone(),
            patient_email: draft.patient_email.clone(),
            total_amount: draft.total_amount,
            payment_method: draft.payment_method.clone(),
            payment_status: draft.payment_status.clone(),
            service_details: draft.service_details.clone(),
            download_url: draft.download_url.clone(),
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl Document for BillingRecord {
    const COLLECTION: &'static str = "billing";

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

    /// Bill numbers are unique within a hospital
    fn unique_key(&self) -> Option<String> {
        Some(format!("{}/{}", self.hospital_id, self.bill_no))
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

/// A candidate billing record as a form submits it.
///
/// Fields are loose (plain strings, defaults for anything missing) so that
/// validation can report every problem instead of failing on the first
/// one during deserialization. Unknown fields, such as `_id` or
/// `createdAt` on a re-sent record, are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BillingDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_no: Option<String>,
    #[serde(rename = "hospitalID", default)]
    pub hospital_id: String,
    #[serde(default)]
    pub billing_type: String,
    #[serde(default)]
    pub patient_name: String,
    #[serde(rename = "patientID", default)]
    pub patient_id: String,
    #[serde(default)]
    pub contact_number: String,
    #[serde(default)]
    pub patient_email: String,
    /// Blank, null and non-numeric input read as zero and fail validation
    #[serde(default, deserialize_with = "lenient_amount")]
    #[schema(value_type = String, example = "1500.50")]
    pub total_amount: Decimal,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub payment_status: String,
    #[serde(default)]
    pub service_details: Vec<ServiceLine>,
    #[serde(rename = "downloadURL", default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Version the draft was based on; enables conflict detection on replace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
}

impl BillingDraft {
    pub fn validate(&self) -> FieldErrors {
        validate_billing(self)
    }

    /// Validate a draft for creation: the billing rules plus an owning
    /// hospital.
    pub fn validate_new(&self) -> FieldErrors {
        let mut errors = validate_billing(self);
        error_common::check_required!(errors, "hospitalID", self.hospital_id, "Hospital ID is required");
        errors
    }

    /// Build a new record. The bill number from the draft is used when
    /// given, otherwise one is generated. Store metadata is left for the
    /// store to stamp.
    pub fn into_record(self, now: DateTime<Utc>) -> Result<BillingRecord, FieldErrors> {
        self.validate_new().into_result()?;
        let billing_type = parse_billing_type(&self.billing_type)?;
        let bill_no = match self.bill_no {
            Some(bill_no) if !bill_no.trim().is_empty() => bill_no.trim().to_string(),
            _ => generate_bill_no(now),
        };

        Ok(BillingRecord {
            id: Uuid::new_v4(),
            bill_no,
            hospital_id: self.hospital_id.trim().to_string(),
            billing_type,
            patient_name: self.patient_name.trim().to_string(),
            patient_id: self.patient_id.trim().to_string(),
            contact_number: self.contact_number,
            patient_email: self.patient_email,
            total_amount: self.total_amount,
            payment_method: self.payment_method,
            payment_status: self.payment_status,
            service_details: self.service_details,
            download_url: self.download_url,
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }
}

fn parse_billing_type(value: &str) -> Result<BillingType, FieldErrors> {
    value.parse().map_err(|_| {
        let mut errors = FieldErrors::new();
        errors.add("billingType", "Billing type is not recognised");
        errors
    })
}

/// `BN-<yyyymmdd>-<6 hex>`, e.g. `BN-20241019-3FA2C1`
pub fn generate_bill_no(now: DateTime<Utc>) -> String {
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(6)
        .collect();
    format!("BN-{}-{}", now.format("%Y%m%d"), suffix.to_uppercase())
}
