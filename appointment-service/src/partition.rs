use crate::models::Appointment;

/// Tab shown when an appointment page opens
pub const DEFAULT_TAB: &str = "pending";

/// Appointments whose status equals the tab key, compared in lowercase.
///
/// Relative order is kept. A key that names no status selects nothing.
pub fn partition<'a>(records: &'a [Appointment], tab: &str) -> Vec<&'a Appointment> {
    let key = tab.trim().to_lowercase();
    records
        .iter()
        .filter(|appointment| appointment.status.as_str() == key)
        .collect()
}
