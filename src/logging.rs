//! Logging setup for the command line tools.

use std::{fs::OpenOptions, io, path::Path, sync::Arc};

use tracing_subscriber::{
    EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// The filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Install the global tracing subscriber.
///
/// Logs are written to stderr so they do not mix with command output on
/// stdout. The level is taken from the `RUST_LOG` environment variable and
/// defaults to [DEFAULT_LOG_FILTER]. If `debug_log_path` is given, debug
/// level logs are also appended to that file.
///
/// # Errors
/// Returns an error if the debug log file cannot be opened.
pub fn setup_logging(debug_log_path: Option<&Path>) -> Result<(), io::Error> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let stderr_log = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(env_filter);

    let debug_log = match debug_log_path {
        Some(path) => {
            let log_file = OpenOptions::new().create(true).append(true).open(path)?;

            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(log_file))
                    .with_filter(filter::LevelFilter::DEBUG),
            )
        }
        None => None,
    };

    // Ignore the error when a subscriber is already installed, e.g. in tests.
    let _ = tracing_subscriber::registry()
        .with(stderr_log)
        .with(debug_log)
        .try_init();

    Ok(())
}
