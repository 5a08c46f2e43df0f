use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use crate::models::BillingRecord;

/// Client-side filter over a loaded billing collection.
///
/// Each criterion is inactive when absent or blank. Active criteria are
/// combined with AND, so the order they are applied in never matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BillingFilter {
    /// Exact billing type, e.g. "Lab Test"
    #[serde(default)]
    pub billing_type: Option<String>,
    /// Exact payment method
    #[serde(default)]
    pub payment_method: Option<String>,
    /// Case-insensitive substring of bill number, patient name or patient ID
    #[serde(default)]
    pub search: Option<String>,
}

fn active(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}

impl BillingFilter {
    pub fn is_empty(&self) -> bool {
        active(self.billing_type.as_ref()).is_none()
            && active(self.payment_method.as_ref()).is_none()
            && active(self.search.as_ref()).is_none()
    }

    pub fn with_billing_type(mut self, billing_type: impl Into<String>) -> Self {
        self.billing_type = Some(billing_type.into());
        self
    }

    pub fn with_payment_method(mut self, payment_method: impl Into<String>) -> Self {
        self.payment_method = Some(payment_method.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn matches(&self, record: &BillingRecord) -> bool {
        if let Some(billing_type) = active(self.billing_type.as_ref()) {
            if record.billing_type.as_str() != billing_type {
                return false;
            }
        }

        if let Some(method) = active(self.payment_method.as_ref()) {
            if record.payment_method != method {
                return false;
            }
        }

        if let Some(search) = active(self.search.as_ref()) {
            let needle = search.to_lowercase();
            let hit = [&record.bill_no, &record.patient_name, &record.patient_id]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        true
    }

    /// Matching records, in their original order
    pub fn apply<'a>(&self, records: &'a [BillingRecord]) -> Vec<&'a BillingRecord> {
        records.iter().filter(|record| self.matches(record)).collect()
    }

    pub fn apply_cloned(&self, records: &[BillingRecord]) -> Vec<BillingRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}
