use crate::errors::OracleError;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Converts a verbosity level from the command line to a level filter. `0`
/// disables the default directive and leaves filtering to `RUST_LOG`.
pub fn level_filter_from_verbosity(verbose: u8) -> Option<LevelFilter> {
    match verbose {
        0 => None,
        other => Some(LevelFilter::from_level(
            Level::from_str(&other.to_string()).unwrap_or(Level::INFO),
        )),
    }
}

/// Initializes `tracing` as the logger.
///
/// # Parameters
///
/// - `level`: `None` defaults to no logs but can be overwritten with `RUST_LOG`
///   env var. Otherwise sets the default log level. Use `None` in tests and a
///   user supplied value for binaries.
///
/// Logs are JSON formatted if the `JSON_LOGS` env var is set.
///
/// # Returns
///
/// Returns `Err` if `tracing` can't be initialized. Multiple subscription error
/// is ignored and will return `Ok(())`.
pub fn initialize_logger(level: Option<LevelFilter>) -> Result<(), OracleError> {
    let layer = fmt::layer().with_test_writer();
    let json_layer = fmt::layer::<Registry>().with_test_writer().json();

    let filter = match level {
        Some(level) => EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy(),
        None => EnvFilter::from_default_env(),
    };

    let res = if std::env::var("JSON_LOGS").is_ok() {
        tracing_subscriber::util::SubscriberInitExt::try_init(
            tracing_subscriber::registry().with(json_layer).with(filter),
        )
    } else {
        tracing_subscriber::util::SubscriberInitExt::try_init(
            tracing_subscriber::registry().with(layer).with(filter),
        )
    };

    if let Err(e) = res {
        // Re-initialization is fine, e.g. when several tests set up logging.
        if e.to_string() != "a global default trace dispatcher has already been set" {
            return Err(OracleError::ConfigError(e.to_string()));
        }
    }

    tracing::trace!("Tracing initialized successfully.");
    Ok(())
}
