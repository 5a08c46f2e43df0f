//! Shared fixtures for unit tests.

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{BillingDraft, BillingRecord, BillingType};

pub fn sample_draft() -> BillingDraft {
    BillingDraft {
        bill_no: None,
        hospital_id: "HOS-001".to_string(),
        billing_type: "Channeling".to_string(),
        patient_name: "Nimal Perera".to_string(),
        patient_id: "P-100".to_string(),
        contact_number: "0711234567".to_string(),
        patient_email: "nimal@example.lk".to_string(),
        total_amount: Decimal::new(150_050, 2),
        payment_method: "Cash".to_string(),
        payment_status: "Paid".to_string(),
        service_details: Vec::new(),
        download_url: None,
        version: None,
    }
}

pub fn sample_record() -> BillingRecord {
    let now = Utc::now();
    BillingRecord {
        id: Uuid::new_v4(),
        bill_no: "BN-20240101-000001".to_string(),
        hospital_id: "HOS-001".to_string(),
        billing_type: BillingType::Channeling,
        patient_name: "Nimal Perera".to_string(),
        patient_id: "P-100".to_string(),
        contact_number: "0711234567".to_string(),
        patient_email: "nimal@example.lk".to_string(),
        total_amount: Decimal::new(150_050, 2),
        payment_method: "Cash".to_string(),
        payment_status: "Paid".to_string(),
        service_details: Vec::new(),
        download_url: None,
        version: 1,
        created_at: now,
        updated_at: now,
    }
}

pub fn record_with(status: &str, amount: Decimal) -> BillingRecord {
    BillingRecord {
        id: Uuid::new_v4(),
        payment_status: status.to_string(),
        total_amount: amount,
        ..sample_record()
    }
}
