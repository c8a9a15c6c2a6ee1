//! Opt-in logging setup for binaries and tests
//!
//! The library itself only emits `tracing` events and never installs a
//! subscriber. Call [`init`] from application code when stdout logging
//! is wanted.

use tracing_subscriber::Layer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install a stdout subscriber filtered by `RUST_LOG`
///
/// Defaults to "info" level if RUST_LOG is not set. Safe to call more
/// than once; later calls keep the first subscriber.
pub fn init() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(env_filter),
        )
        .try_init();
}
