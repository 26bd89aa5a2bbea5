//! Sui Package Publisher Library
//!
//! Publishes a compiled Move package bundle to a Sui network and records
//! the resulting on-chain addresses for downstream tooling.

pub mod artifact;
pub mod config;
pub mod effects;
pub mod export;
pub mod lifecycle;
pub mod observability;
pub mod publish;
pub mod resilience;
pub mod rpc;
pub mod tx;

pub use config::{ConfigResolver, NetworkConfig};
pub use lifecycle::{CancelHandle, CancelToken};
pub use publish::{publish_package, PublishError, PublishOptions, PublishReceipt};
