//! HTTP gateways for the MediLink staff boards
//!
//! [`BillingClient`] and [`AppointmentClient`] implement the gateway traits
//! the billing and appointment boards drive, against a running MediLink
//! API. Error bodies from the API are mapped back onto the domain errors so
//! field validation messages reach the form that caused them.
//!
//! ```rust,no_run
//! use billing_service::BillingBoard;
//! use database_layer::StaffContext;
//! use medilink_client::{BillingClient, ClientConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = BillingClient::new(ClientConfig::new("http://localhost:5000"))?;
//! let mut board = BillingBoard::new(client, StaffContext::new("H001"));
//! board.load().await?;
//! println!("{} records", board.records().len());
//! # Ok(())
//! # }
//! ```

pub mod appointments;
pub mod billing;
pub mod config;
pub mod error;
mod http;

pub use appointments::AppointmentClient;
pub use billing::BillingClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ErrorBody};
