//! Compiled artifact discovery and loading.
//!
//! # Responsibilities
//! - Locate the bundle manifest under a package path
//! - Parse and validate it into an `ArtifactBundle`
//!
//! # Design Decisions
//! - The loader consumes the build toolchain's base64 dump manifest rather
//!   than scanning `bytecode_modules/`; the dump preserves the compiler's
//!   dependency-resolved module order, a directory scan cannot
//! - Pure read: never mutates anything under the package path

use std::path::{Path, PathBuf};

use crate::artifact::bundle::{ArtifactBundle, ArtifactError, BundleManifest};

/// Manifest file name produced by the build toolchain.
const MANIFEST_NAME: &str = "publish.json";

/// Locate the manifest for a package path.
///
/// Accepts either a direct path to the manifest file, or a package
/// directory containing `build/publish.json` (or `publish.json` at its
/// root).
fn find_manifest(package_path: &Path) -> Result<PathBuf, ArtifactError> {
    if package_path.is_file() {
        return Ok(package_path.to_path_buf());
    }
    if package_path.is_dir() {
        for candidate in [
            package_path.join("build").join(MANIFEST_NAME),
            package_path.join(MANIFEST_NAME),
        ] {
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }
    Err(ArtifactError::NotFound(package_path.display().to_string()))
}

/// Load and validate the compiled bundle for a package path.
pub fn load_bundle(package_path: &Path) -> Result<ArtifactBundle, ArtifactError> {
    let manifest_path = find_manifest(package_path)?;
    let content = std::fs::read_to_string(&manifest_path)?;

    let manifest: BundleManifest =
        serde_json::from_str(&content).map_err(|e| ArtifactError::Corrupt {
            path: manifest_path.display().to_string(),
            reason: format!("manifest is not valid JSON: {}", e),
        })?;

    let bundle = ArtifactBundle::from_manifest(manifest, &manifest_path.display().to_string())?;

    tracing::info!(
        manifest = %manifest_path.display(),
        modules = bundle.modules.len(),
        dependencies = bundle.dependencies.len(),
        total_bytes = bundle.total_module_bytes(),
        "Artifact bundle loaded"
    );

    Ok(bundle)
}
