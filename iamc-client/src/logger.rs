//! Logging Infrastructure
//!
//! Console subscriber for applications embedding the client. `RUST_LOG`
//! overrides the level passed in.

use tracing_subscriber::EnvFilter;

/// Initialize the logger at `info`
pub fn init_logger() -> bool {
    init_logger_with_level(None, false)
}

/// Initialize the logger. Returns `false` when a global subscriber was
/// already installed.
pub fn init_logger_with_level(log_level: Option<&str>, json: bool) -> bool {
    let level = log_level.unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.is_ok()
}
