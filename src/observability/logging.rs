//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing for structured logging throughout the pipeline
//! - Level configurable via RUST_LOG; the binary supplies the default
//! - Credential material is never logged at any level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber. Called once by the binary; library
/// consumers bring their own subscriber.
pub fn init_logging(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
