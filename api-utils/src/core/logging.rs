//! Logging setup

use tracing_subscriber::EnvFilter;

use super::constants::{DEFAULT_LOG_FILTER, ENV_LOG, ENV_LOG_FORMAT};

/// Resolve the log filter: `API_LOG`, then `RUST_LOG`, then `default_filter`
/// (or `info` when none is given)
pub fn log_filter(default_filter: Option<&str>) -> String {
    std::env::var(ENV_LOG)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_filter.unwrap_or(DEFAULT_LOG_FILTER).to_string())
}

/// Install the global `tracing` subscriber: compact text, or JSON lines
/// when `API_LOG_FORMAT=json`.
///
/// Calling it twice (or after another subscriber was installed) is a no-op.
pub fn init_logging(default_filter: Option<&str>) {
    let filter = log_filter(default_filter);
    let env_filter =
        EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let json = std::env::var(ENV_LOG_FORMAT).is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let result = if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(env_filter)
            .try_init()
    };
    if result.is_ok() {
        tracing::debug!(filter = %filter, json, "Logging initialized");
    }
}
