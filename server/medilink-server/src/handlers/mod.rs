pub mod appointments;
pub mod billing;
pub mod health;
pub mod hospitals;
