//! Resilience primitives for the submission path.
//!
//! # Design Decisions
//! - Only transient transport failures are retried; definitive chain
//!   rejections are terminal
//! - Jittered backoff prevents thundering herd against a recovering node

pub mod backoff;

pub use backoff::RetryPolicy;
