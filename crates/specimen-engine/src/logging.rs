use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;

use crate::errors::ConfigError;

/// Installs a global `fmt` subscriber writing through the test harness.
///
/// `RUST_LOG` takes precedence over `default_filter`. Fails when a global
/// subscriber is already installed, so callers that may run more than once
/// should ignore the error.
pub fn init_test_logging(default_filter: &str) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|err| ConfigError::Logging(err.to_string()))?;

    let layer = tracing_subscriber::fmt::layer()
        .with_test_writer()
        .with_timer(UtcTime::rfc_3339())
        .with_target(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|err| ConfigError::Logging(err.to_string()))?;

    Ok(())
}
