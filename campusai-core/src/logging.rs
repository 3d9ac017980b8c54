//! Logging initialization
//!
//! `RUST_LOG` wins when set; otherwise the provided default filter applies.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber. Call once at process start.
pub fn init_logging(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}
