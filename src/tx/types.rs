//! Transaction schema, protocol limits, and error definitions.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::artifact::ArtifactBundle;
use crate::config::NetworkConfig;

/// Protocol cap on the encoded transaction size.
pub const MAX_TX_BYTES: usize = 128 * 1024;

/// Protocol cap on modules per publish.
pub const MAX_MODULES: usize = 64;

/// Smallest accepted gas budget, in MIST.
pub const MIN_GAS_BUDGET: u64 = 1_000_000;

/// Largest accepted gas budget, in MIST.
pub const MAX_GAS_BUDGET: u64 = 50_000_000_000;

/// A 32-byte on-chain address or object/package identifier.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// Parse a hex address, with or without `0x`, left-padding short forms
    /// (so `0x2` is the 32-byte address ending in 02).
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        if stripped.is_empty() || stripped.len() > 64 {
            return Err(format!("invalid address '{}'", s));
        }
        let padded = format!("{:0>64}", stripped);
        let bytes = hex::decode(&padded).map_err(|e| format!("invalid address '{}': {}", s, e))?;
        let mut out = [0u8; 32];
        out.copy_from_slice(&bytes);
        Ok(Self(out))
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

/// Unsigned transaction payload, BCS-encoded for signing and submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionData {
    pub sender: Address,
    pub gas_price: u64,
    pub gas_budget: u64,
    pub kind: TransactionKind,
}

/// The transaction payload variants this client can build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransactionKind {
    /// Register new bytecode modules as an on-chain package.
    Publish {
        /// Compiled module blobs, in compiler dependency-resolved order.
        modules: Vec<Vec<u8>>,
        /// Packages the modules link against.
        dependencies: Vec<Address>,
    },
}

/// Everything needed to build one publish transaction. Created once per
/// invocation and consumed read-only.
#[derive(Debug, Clone)]
pub struct PublishRequest {
    pub bundle: ArtifactBundle,
    pub network: NetworkConfig,
    /// Caller override; `None` means compute a default from bundle size.
    pub gas_budget: Option<u64>,
    pub sender: Address,
}

/// Built but not yet signed transaction: the typed payload plus its
/// canonical encoding.
#[derive(Debug, Clone)]
pub struct UnsignedTransaction {
    pub data: TransactionData,
    pub bytes: Vec<u8>,
}

/// Signed transaction, ready for submission. Never mutated after creation.
#[derive(Clone)]
pub struct SignedTransaction {
    /// BCS-encoded unsigned payload.
    pub tx_bytes: Vec<u8>,
    /// Serialized signature: scheme flag || signature || public key.
    pub signature: Vec<u8>,
    /// Sender address derived from the signing key.
    pub sender: Address,
}

impl SignedTransaction {
    pub fn tx_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.tx_bytes)
    }

    pub fn signature_base64(&self) -> String {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD.encode(&self.signature)
    }
}

impl fmt::Debug for SignedTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignedTransaction")
            .field("sender", &self.sender)
            .field("tx_bytes_len", &self.tx_bytes.len())
            .field("signature_len", &self.signature.len())
            .finish()
    }
}

/// Errors that can occur while building the publish transaction.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("artifact bundle contains no modules")]
    EmptyBundle,

    #[error("artifact bundle declares no dependency packages")]
    NoDependencies,

    #[error("bundle has {0} modules, protocol limit is {MAX_MODULES}")]
    TooManyModules(usize),

    #[error("encoded transaction is {actual} bytes, protocol limit is {limit}")]
    OversizeTransaction { actual: usize, limit: usize },

    #[error("gas budget {0} is outside protocol bounds [{MIN_GAS_BUDGET}, {MAX_GAS_BUDGET}]")]
    GasBudgetOutOfRange(u64),

    #[error("transaction encoding failed: {0}")]
    Encode(String),
}

/// Errors that can occur while signing.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("signing key is neither valid hex nor base64")]
    MalformedKey,

    #[error("signing key must be a 32-byte Ed25519 seed, got {0} bytes")]
    WrongKeyLength(usize),

    #[error("signature failed self-verification")]
    Verification,
}
