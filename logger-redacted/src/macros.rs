// Logging macros

/// `tracing::info!` that redacts the formatted message
#[macro_export]
macro_rules! redacted_info {
    ($($arg:tt)*) => {
        tracing::info!("{}", $crate::Redacted(&format!($($arg)*)))
    };
}

/// `tracing::error!` that redacts the formatted message
#[macro_export]
macro_rules! redacted_error {
    ($($arg:tt)*) => {
        tracing::error!("{}", $crate::Redacted(&format!($($arg)*)))
    };
}
