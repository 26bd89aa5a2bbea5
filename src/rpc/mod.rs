//! Network submission subsystem.
//!
//! # Data Flow
//! ```text
//! SignedTransaction + ResolvedNetwork
//!     → client.rs (JSON-RPC round trips, timeout, error classification)
//!     → submitter.rs (retry, backoff, finality polling, cancellation)
//!     → ExecutionResult
//! ```
//!
//! # Constraints
//! - Client only; this system never serves RPC
//! - Publish is not idempotent: an ambiguous outcome is surfaced as
//!   `SubmitError::Indeterminate`, never silently retried past the budget

pub mod client;
pub mod submitter;
pub mod types;

pub use client::RpcClient;
pub use submitter::Submitter;
pub use types::{
    ChangeKind, ExecutionResult, ExecutionStatus, GasUsed, ObjectChange, SubmitError,
    TxBlockResponse,
};
