//! Logging setup.
//!
//! Uses `tracing` with `tracing-subscriber`. All output goes to standard
//! error so that standard output carries only the result document.

use tracing_subscriber::{fmt, EnvFilter};

/// Initializes logging for the binary.
///
/// # Environment
/// - `RUST_LOG`: filter directive (default: `info`),
///   e.g. `RUST_LOG=debug` or `RUST_LOG=u_meeting::solver=trace`
///
/// # Example
/// ```no_run
/// u_meeting::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .try_init();
}

/// Initializes verbose logging for tests; later calls are no-ops.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
