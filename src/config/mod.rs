//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in registry (+ optional TOML overlay)
//!     → schema.rs (parse & deserialize)
//!     → resolver.rs (name → endpoint + credential, env lookup)
//!     → ResolvedNetwork (validated, immutable for the run)
//! ```
//!
//! # Design Decisions
//! - A network name resolves to exactly one endpoint + credential pair
//! - Credential material comes only from the environment, never from files
//! - Resolution fails fast, before any network I/O

pub mod resolver;
pub mod schema;

pub use resolver::{ConfigError, ConfigResolver, Credential, ResolvedNetwork};
pub use schema::{NetworkConfig, PublisherConfig, SubmitConfig};
