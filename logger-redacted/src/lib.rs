//! Logging setup for MediLink with redaction of patient contact data
//!
//! Billing and appointment records carry patient emails and phone numbers.
//! Anything logged from those fields goes through [`Redacted`] (or the
//! `redacted_*` macros) so log output never carries them in the clear.
//!
//! # Detected Data Types
//!
//! - **Email Addresses**: `nimal@example.lk` → `EMAIL[hash]` or `n***@e***`
//! - **Phone Numbers**: `0711234567`, `071-123-4567`, `+94 71 123 4567`
//! - **Card Numbers**: 16-digit card numbers with optional separators
//!
//! # Example
//!
//! ```rust,no_run
//! use logger_redacted::{init_tracing, LoggerConfig, Redacted};
//!
//! init_tracing(&LoggerConfig::default()).ok();
//! tracing::info!(contact = %Redacted("0711234567"), "appointment booked");
//! ```

pub mod config;
pub mod macros;
pub mod redactor;
pub mod subscriber;

pub use config::*;
pub use redactor::*;
pub use subscriber::*;
