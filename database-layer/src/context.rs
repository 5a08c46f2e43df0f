use serde::{Deserialize, Serialize};

/// The staff session a controller or request acts for.
///
/// Passed explicitly to whatever needs it; nothing reads a global session.
/// `registration_id` is the hospital registration ID and scopes every
/// hospital-owned listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffContext {
    pub registration_id: String,
}

impl StaffContext {
    pub fn new<S: Into<String>>(registration_id: S) -> Self {
        Self {
            registration_id: registration_id.into(),
        }
    }

    /// The hospital scope used for store listings
    pub fn hospital_id(&self) -> &str {
        &self.registration_id
    }
}
