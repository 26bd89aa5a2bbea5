//! Compiled artifact loading.
//!
//! # Data Flow
//! ```text
//! package path
//!     → loader.rs (manifest discovery)
//!     → bundle.rs (base64 decode, bytecode magic check)
//!     → ArtifactBundle (module order preserved)
//! ```

pub mod bundle;
pub mod loader;

pub use bundle::{ArtifactBundle, ArtifactError, BundleManifest, MOVE_MAGIC};
pub use loader::load_bundle;
