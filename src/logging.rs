//! Logging setup for the binary
//!
//! Diagnostics go to stderr through `tracing`; stdout is left for results.
//! The level comes from `RUST_LOG`, falling back to the level passed in.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber. Calling it twice is harmless: the second
/// call leaves the first subscriber in place.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr).with_target(false));

    let _ = tracing::subscriber::set_global_default(subscriber);
}
