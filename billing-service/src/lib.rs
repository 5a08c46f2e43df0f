//! Billing records for hospital front desks
//!
//! Provides the billing record lifecycle:
//! - Record and draft types with validation of every field rule at once
//! - Payment aggregation (paid, pending, total)
//! - List filtering by type, payment method and free-text search
//! - The PDF billing summary report
//! - [`BillingBoard`], the page controller driving the edit and delete flow

pub mod board;
pub mod error;
pub mod filter;
pub mod models;
pub mod report;
pub mod summary;
pub mod validation;

#[cfg(test)]
mod testing;

pub use board::*;
pub use error::*;
pub use filter::*;
pub use models::*;
pub use report::*;
pub use summary::*;
pub use validation::*;
