//! Common error handling utilities for MediLink
//!
//! Standardized error types and codes shared by every MediLink crate.
//!
//! # Error Categories
//!
//! - [`FieldErrors`]: field-level input errors, surfaced next to the
//!   offending field and recoverable by correcting the input
//! - [`MedilinkError`]: why a binary could not start or keep serving
//!   (configuration, record store, HTTP listener)
//!
//! # Example
//!
//! ```rust
//! use error_common::FieldErrors;
//!
//! fn check_name(name: &str) -> Result<(), FieldErrors> {
//!     let mut errors = FieldErrors::new();
//!     if name.trim().is_empty() {
//!         errors.add("patientName", "Patient name is required");
//!     }
//!     errors.into_result()
//! }
//!
//! assert!(check_name("").is_err());
//! assert!(check_name("Nimal Perera").is_ok());
//! ```

pub mod codes;
pub mod fields;
pub mod macros;
pub mod types;

pub use fields::*;
pub use types::*;
