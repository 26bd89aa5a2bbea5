//! Execution result parsing subsystem.

pub mod parser;

pub use parser::{parse_publish_effects, ParseError};
