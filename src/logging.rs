//! Logging setup
//!
//! Diagnostics go through `tracing`. The subscriber writes to stderr so that
//! stdout carries nothing but the result CSV.

use crate::types::MiningError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter: `RUST_LOG` when set, otherwise `default_level`
///
/// # Errors
///
/// Returns a `Runtime` error when `default_level` is not a valid filter
/// directive and `RUST_LOG` is unset.
pub fn env_filter(default_level: &str) -> Result<EnvFilter, MiningError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| MiningError::runtime(format!("Invalid log level '{}': {}", default_level, e)))
}

/// Install the global subscriber
///
/// # Examples
///
/// ```rust,no_run
/// haui_miner::logging::init_logging("debug").unwrap();
/// ```
pub fn init_logging(default_level: &str) -> Result<(), MiningError> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter(default_level)?)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| MiningError::runtime(format!("Failed to install logger: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_filter_accepts_levels() {
        // RUST_LOG, when set in the test environment, takes precedence and is valid
        assert!(env_filter("debug").is_ok());
        assert!(env_filter("haui_miner=trace,warn").is_ok());
    }
}
