//! Channeling and clinic appointments
//!
//! Appointment records, their forward-only status flow, and the status tab
//! partitioning used by the hospital appointment pages.

pub mod board;
pub mod error;
pub mod models;
pub mod partition;

pub use board::*;
pub use error::*;
pub use models::*;
pub use partition::*;
