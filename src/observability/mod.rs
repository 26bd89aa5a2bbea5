//! Observability utilities.

pub mod logging;

pub use logging::init_logging;
