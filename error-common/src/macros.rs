//! Field-checking macros that collect into a [`crate::FieldErrors`].
//!
//! Unlike early-return validation, every rule runs, so a form can show all
//! of its problems at once.
//!
//! ```rust
//! use error_common::{check_field, check_required, FieldErrors};
//!
//! let name = "";
//! let age = 200;
//! let mut errors = FieldErrors::new();
//! check_required!(errors, "patientName", name, "Patient name is required");
//! check_field!(errors, "age", age <= 150, "Age must be at most 150");
//! assert_eq!(errors.len(), 2);
//! ```

/// Record `$message` against `$field` when `$predicate` is false
#[macro_export]
macro_rules! check_field {
    ($errors:expr, $field:expr, $predicate:expr, $message:expr) => {
        if !$predicate {
            $errors.add($field, $message);
        }
    };
}

/// Record `$message` against `$field` when `$value` is blank
#[macro_export]
macro_rules! check_required {
    ($errors:expr, $field:expr, $value:expr, $message:expr) => {
        $crate::check_field!($errors, $field, !$value.trim().is_empty(), $message)
    };
}
