//! Logging infrastructure for Titan.
//!
//! All diagnostics go to stderr through `tracing`; stdout is reserved for
//! command output so it can be piped.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Map a `-v` count to a default filter level.
///
/// Quiet by default: only recovered-corruption warnings and errors show up
/// unless the user asks for more.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Initialize logging for the CLI from a `-v` count.
pub fn init(verbose: u8) {
    init_with_level(level_for_verbosity(verbose))
}

/// Initialize logging with a specific default level
///
/// # Arguments
/// * `default_level` - Default log level (debug, info, warn, error)
///
/// This can still be overridden by RUST_LOG environment variable.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Initialize logging for testing (captures logs for test output)
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
