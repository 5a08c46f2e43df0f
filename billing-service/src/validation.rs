//! Billing record validation.
//!
//! Every rule is checked independently so a form can show all of its
//! problems at once. An empty [`FieldErrors`] means the draft is valid.

use error_common::{check_field, check_required, FieldErrors};
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

use crate::models::{BillingDraft, BillingType};

lazy_static! {
    static ref CONTACT_NUMBER_REGEX: Regex = Regex::new(r"^[0-9]{10}$").unwrap();
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Largest accepted total or service line cost, in rupees
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Exactly ten ASCII digits, nothing else
pub fn is_valid_contact_number(value: &str) -> bool {
    CONTACT_NUMBER_REGEX.is_match(value)
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

pub fn validate_billing(draft: &BillingDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if draft.billing_type.trim().is_empty() {
        errors.add("billingType", "Billing type is required");
    } else if draft.billing_type.parse::<BillingType>().is_err() {
        let allowed: Vec<&str> = BillingType::ALL.iter().map(|kind| kind.as_str()).collect();
        errors.add(
            "billingType",
            format!("Billing type must be one of: {}", allowed.join(", ")),
        );
    }

    check_required!(errors, "patientName", draft.patient_name, "Patient name is required");
    check_required!(errors, "patientID", draft.patient_id, "Patient ID is required");
    check_field!(
        errors,
        "contactNumber",
        is_valid_contact_number(&draft.contact_number),
        "Contact number must be a valid 10-digit number"
    );
    check_field!(
        errors,
        "patientEmail",
        is_valid_email(&draft.patient_email),
        "Email is not valid"
    );
    check_field!(
        errors,
        "totalAmount",
        draft.total_amount > Decimal::ZERO,
        "Total amount must be greater than zero"
    );
    check_field!(
        errors,
        "totalAmount",
        draft.total_amount <= MAX_AMOUNT,
        format!("Total amount must not exceed {MAX_AMOUNT}")
    );
    if draft.service_details.iter().any(|line| line.cost > MAX_AMOUNT) {
        errors.add(
            "serviceDetails",
            format!("Service cost must not exceed {MAX_AMOUNT}"),
        );
    }
    check_required!(errors, "paymentMethod", draft.payment_method, "Payment method is required");
    check_required!(errors, "paymentStatus", draft.payment_status, "Payment status is required");

    errors
}
