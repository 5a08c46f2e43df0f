// Global tracing subscriber setup
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggerConfig};
use crate::redactor::set_redaction_enabled;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `config.level`. Returns an error if a global
/// subscriber was already installed.
pub fn init_tracing(config: &LoggerConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    set_redaction_enabled(config.redaction_enabled);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&config.level)));

    match config.format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).json())
            .try_init(),
    }
}

fn default_directives(level: &str) -> String {
    format!("{level},tower_http=info,sqlx=warn,hyper=info,reqwest=info")
}
