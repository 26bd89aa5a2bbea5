//! Transaction signing and sender address derivation.
//!
//! # Security
//! - Key material is loaded only from the resolved credential, which comes
//!   from the environment
//! - Keys are never logged, serialized, or persisted
//!
//! # Design Decisions
//! - Ed25519 over the Blake2b-256 digest of the intent-prefixed payload;
//!   deterministic per (payload, key) pair
//! - Serialized signature is `flag || signature || public key`, base64 on
//!   the wire
//! - Every signature is self-verified before it leaves this module

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use ed25519_dalek::{Signer as _, SigningKey, VerifyingKey};

use crate::config::Credential;
use crate::tx::types::{Address, SignedTransaction, SigningError, UnsignedTransaction};

type Blake2b256 = Blake2b<U32>;

/// Signature scheme flag for Ed25519.
const ED25519_FLAG: u8 = 0x00;

/// Intent prefix for transaction data (scope, version, app id).
const INTENT_PREFIX: [u8; 3] = [0, 0, 0];

/// Ed25519 signing identity for one publish invocation.
pub struct Keypair {
    signing: SigningKey,
}

fn blake2b256(chunks: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for chunk in chunks {
        hasher.update(chunk);
    }
    hasher.finalize().into()
}

/// Decode credential material: hex (with or without `0x`) or base64.
fn decode_key_material(material: &str) -> Result<Vec<u8>, SigningError> {
    use base64::Engine;

    let trimmed = material.trim();
    let hex_candidate = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if let Ok(bytes) = hex::decode(hex_candidate) {
        return Ok(bytes);
    }
    base64::engine::general_purpose::STANDARD
        .decode(trimmed)
        .map_err(|_| SigningError::MalformedKey)
}

impl Keypair {
    /// Build a keypair from a resolved credential (32-byte Ed25519 seed).
    pub fn from_credential(credential: &Credential) -> Result<Self, SigningError> {
        let bytes = decode_key_material(credential.expose())?;
        let seed: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| SigningError::WrongKeyLength(bytes.len()))?;
        Ok(Self {
            signing: SigningKey::from_bytes(&seed),
        })
    }

    pub fn public_key(&self) -> VerifyingKey {
        self.signing.verifying_key()
    }

    /// Sender address: Blake2b-256 of `flag || public key`.
    pub fn address(&self) -> Address {
        let pk = self.public_key();
        Address(blake2b256(&[&[ED25519_FLAG], pk.as_bytes()]))
    }

    /// Sign an unsigned transaction, producing the submit-ready form.
    pub fn sign(&self, unsigned: &UnsignedTransaction) -> Result<SignedTransaction, SigningError> {
        let digest = blake2b256(&[&INTENT_PREFIX, unsigned.bytes.as_slice()]);
        let signature = self.signing.sign(&digest);

        self.public_key()
            .verify_strict(&digest, &signature)
            .map_err(|_| SigningError::Verification)?;

        let mut serialized = Vec::with_capacity(1 + 64 + 32);
        serialized.push(ED25519_FLAG);
        serialized.extend_from_slice(&signature.to_bytes());
        serialized.extend_from_slice(self.public_key().as_bytes());

        tracing::debug!(
            sender = %self.address(),
            tx_bytes = unsigned.bytes.len(),
            "Transaction signed"
        );

        Ok(SignedTransaction {
            tx_bytes: unsigned.bytes.clone(),
            signature: serialized,
            sender: self.address(),
        })
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair")
            .field("address", &self.address())
            .finish()
    }
}
