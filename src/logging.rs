//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "TASKDECK_LOG";

/// Default level for a given `-v` count.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Build the filter: `TASKDECK_LOG`, then `RUST_LOG`, then `-v`.
pub fn env_filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbose)))
}

/// Install a stderr fmt subscriber. Safe to call more than once; later
/// calls are no-ops.
pub fn init(verbose: u8) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
