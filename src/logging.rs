//! Logging initialization for the reference CLI demo.
//!
//! Out of scope for the core itself, but every host needs it, so the demo
//! binary wires up `tracing_subscriber` the way a real deployment would.

use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Initialize the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence when set; otherwise every target logs at
/// `default_level`.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .compact()
        .init();
}
