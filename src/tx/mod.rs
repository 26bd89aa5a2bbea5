//! Transaction construction and signing subsystem.
//!
//! # Data Flow
//! ```text
//! ArtifactBundle + ResolvedNetwork
//!     → builder.rs (gas budget, BCS encode, limit checks)
//!     → signer.rs (intent digest, Ed25519, self-verify)
//!     → SignedTransaction (owned by the submitter from here on)
//! ```

pub mod builder;
pub mod signer;
pub mod types;

pub use builder::{build_publish, default_gas_budget};
pub use signer::Keypair;
pub use types::{
    Address, BuildError, PublishRequest, SignedTransaction, SigningError, TransactionData,
    TransactionKind, UnsignedTransaction,
};
