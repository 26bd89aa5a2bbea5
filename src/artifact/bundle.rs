//! Compiled package bundle representation and structural validation.

use serde::Deserialize;
use thiserror::Error;

use crate::tx::types::Address;

/// First four bytes of every compiled Move module.
pub const MOVE_MAGIC: [u8; 4] = [0xa1, 0x1c, 0xeb, 0x0b];

/// Smallest blob we accept as a module (magic + version).
const MIN_MODULE_BYTES: usize = 8;

/// Errors raised while loading or validating a bundle.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// Path or expected compiled output does not exist.
    #[error("compiled package not found at '{0}' (expected bundle manifest publish.json)")]
    NotFound(String),

    /// Bundle exists but fails structural validation.
    #[error("compiled package at '{path}' is corrupt: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("failed to read compiled package: {0}")]
    Io(#[from] std::io::Error),
}

/// On-disk manifest emitted by the build toolchain: ordered base64 module
/// blobs plus the addresses of the packages they link against.
#[derive(Debug, Deserialize)]
pub struct BundleManifest {
    pub modules: Vec<String>,
    pub dependencies: Vec<String>,
}

/// Compiled package bundle, validated and ready for transaction building.
///
/// Module order is the compiler's dependency-resolved order and must be
/// preserved end to end.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub modules: Vec<Vec<u8>>,
    pub dependencies: Vec<Address>,
}

impl ArtifactBundle {
    /// Decode and structurally validate a manifest.
    pub fn from_manifest(manifest: BundleManifest, path: &str) -> Result<Self, ArtifactError> {
        use base64::Engine;

        let corrupt = |reason: String| ArtifactError::Corrupt {
            path: path.to_string(),
            reason,
        };

        if manifest.modules.is_empty() {
            return Err(corrupt("manifest lists no modules".to_string()));
        }

        let mut modules = Vec::with_capacity(manifest.modules.len());
        for (i, encoded) in manifest.modules.iter().enumerate() {
            let blob = base64::engine::general_purpose::STANDARD
                .decode(encoded.trim())
                .map_err(|e| corrupt(format!("module {} is not valid base64: {}", i, e)))?;
            if blob.len() < MIN_MODULE_BYTES || blob[..4] != MOVE_MAGIC {
                return Err(corrupt(format!(
                    "module {} does not look like compiled Move bytecode",
                    i
                )));
            }
            modules.push(blob);
        }

        let mut dependencies = Vec::with_capacity(manifest.dependencies.len());
        for dep in &manifest.dependencies {
            let addr = Address::from_hex(dep)
                .map_err(|e| corrupt(format!("unresolved dependency address: {}", e)))?;
            dependencies.push(addr);
        }

        Ok(Self {
            modules,
            dependencies,
        })
    }

    /// Total bytes across all module blobs.
    pub fn total_module_bytes(&self) -> usize {
        self.modules.iter().map(Vec::len).sum()
    }
}
