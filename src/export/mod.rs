//! Address export subsystem.

pub mod writer;

pub use writer::{write_export, ExportError};
