//! The publish pipeline.
//!
//! # Data Flow
//! ```text
//! PublishOptions
//!     → config   (resolve network + credential)
//!     → artifact (load compiled bundle)
//!     → tx       (build + sign)
//!     → rpc      (submit, retry, await finality)
//!     → effects  (extract identifiers)
//!     → export   (persist export record)
//! ```
//!
//! Stages run strictly sequentially; each consumes the previous stage's
//! output. Success is signaled only after the export record is durably
//! written. Every failure carries the stage it happened in.

use std::path::PathBuf;

use thiserror::Error;

use crate::artifact::{self, ArtifactError};
use crate::config::{ConfigError, ConfigResolver};
use crate::effects::{self, ParseError};
use crate::export::{self, ExportError};
use crate::lifecycle::CancelToken;
use crate::rpc::{RpcClient, SubmitError, Submitter};
use crate::tx::{self, BuildError, Keypair, PublishRequest, SignedTransaction, SigningError};

/// Caller-supplied parameters for one publish invocation.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Package directory (or bundle manifest file).
    pub package_path: PathBuf,
    /// Registered network name.
    pub network: String,
    /// Export file name stem; also the package's logical name.
    pub export_name: String,
    /// Gas budget override in MIST; `None` computes a default.
    pub gas_budget: Option<u64>,
    /// Directory the export record is written to.
    pub export_dir: PathBuf,
}

/// What a successful publish produced.
#[derive(Debug, Clone)]
pub struct PublishReceipt {
    pub digest: String,
    pub gas_used: u64,
    /// Ordered (logical name, identifier) pairs, package first.
    pub addresses: Vec<(String, String)>,
    pub export_path: PathBuf,
}

/// Pipeline stage, used to tag errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Config,
    Artifact,
    Build,
    Sign,
    Submit,
    Parse,
    Export,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Config => "config",
            Stage::Artifact => "artifact",
            Stage::Build => "build",
            Stage::Sign => "sign",
            Stage::Submit => "submit",
            Stage::Parse => "parse",
            Stage::Export => "export",
        };
        f.write_str(name)
    }
}

/// Any failure along the pipeline, tagged with its stage.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    #[error("artifact: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("build: {0}")]
    Build(#[from] BuildError),

    #[error("sign: {0}")]
    Signing(#[from] SigningError),

    #[error("submit: {0}")]
    Submit(#[from] SubmitError),

    #[error("parse: {0}")]
    Parse(#[from] ParseError),

    #[error("export: {0}")]
    Export(#[from] ExportError),
}

impl PublishError {
    /// The stage this error occurred in.
    pub fn stage(&self) -> Stage {
        match self {
            PublishError::Config(_) => Stage::Config,
            PublishError::Artifact(_) => Stage::Artifact,
            PublishError::Build(_) => Stage::Build,
            PublishError::Signing(_) => Stage::Sign,
            PublishError::Submit(_) => Stage::Submit,
            PublishError::Parse(_) => Stage::Parse,
            PublishError::Export(_) => Stage::Export,
        }
    }

    /// True when the outcome is ambiguous: the transaction may have landed
    /// even though the run failed. Callers must not blindly resubmit.
    pub fn is_indeterminate(&self) -> bool {
        matches!(
            self,
            PublishError::Submit(SubmitError::Indeterminate { .. })
        )
    }
}

/// Resolve, load, build, and sign without touching the network. Shared by
/// the full pipeline and dry runs.
pub fn prepare_transaction(
    resolver: &ConfigResolver,
    options: &PublishOptions,
) -> Result<(crate::config::ResolvedNetwork, SignedTransaction), PublishError> {
    let resolved = resolver.resolve(&options.network)?;
    let bundle = artifact::load_bundle(&options.package_path)?;
    let keypair = Keypair::from_credential(&resolved.credential)?;

    let request = PublishRequest {
        bundle,
        network: resolved.config.clone(),
        gas_budget: options.gas_budget,
        sender: keypair.address(),
    };
    let unsigned = tx::build_publish(&request)?;
    let signed = keypair.sign(&unsigned)?;

    Ok((resolved, signed))
}

/// Publish one compiled package and record its on-chain addresses.
///
/// `cancel` stops finality polling when fired; the submission itself
/// cannot be withdrawn, so a cancelled run reports indeterminate.
pub async fn publish_package(
    resolver: &ConfigResolver,
    options: PublishOptions,
    cancel: Option<CancelToken>,
) -> Result<PublishReceipt, PublishError> {
    tracing::info!(
        package = %options.package_path.display(),
        network = %options.network,
        export_name = %options.export_name,
        "Publishing package"
    );

    let (resolved, signed) = prepare_transaction(resolver, &options)?;

    let client = RpcClient::new(&resolved, resolver.submit_config())?;
    let submitter = Submitter::new(client, resolver.submit_config());
    let result = submitter.submit(&signed, cancel).await?;

    let addresses = effects::parse_publish_effects(&options.export_name, &result)?;
    let export_path = export::write_export(
        &options.export_dir,
        &options.export_name,
        &resolved.config.name,
        &addresses,
    )?;

    tracing::info!(
        digest = %result.digest,
        package_id = %addresses[0].1,
        export = %export_path.display(),
        "Publish complete"
    );

    Ok(PublishReceipt {
        digest: result.digest,
        gas_used: result.gas_used,
        addresses,
        export_path,
    })
}
