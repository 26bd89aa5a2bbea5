//! Sui Package Publisher
//!
//! Command-line entry point: deploy a compiled Move package bundle to a
//! configured network and record the resulting addresses.
//!
//! ```text
//! sui-publisher --package-path contracts/music_copyright \
//!               --network testnet \
//!               --export-name music-copyright
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use sui_publisher::config::ConfigResolver;
use sui_publisher::lifecycle::CancelHandle;
use sui_publisher::observability::init_logging;
use sui_publisher::publish::{publish_package, prepare_transaction, PublishOptions};

#[derive(Parser)]
#[command(name = "sui-publisher")]
#[command(about = "Publish a compiled Move package and export its addresses", long_about = None)]
struct Cli {
    /// Package directory (or bundle manifest file) to publish
    #[arg(short, long)]
    package_path: PathBuf,

    /// Target network name (e.g. testnet, mainnet)
    #[arg(short, long)]
    network: String,

    /// Export file name stem; also the package's logical name
    #[arg(short, long)]
    export_name: String,

    /// Gas budget override in MIST
    #[arg(short, long)]
    gas_budget: Option<u64>,

    /// TOML file with extra network definitions
    #[arg(long)]
    networks_file: Option<PathBuf>,

    /// Directory for the export record
    #[arg(long, default_value = ".")]
    export_dir: PathBuf,

    /// Build and sign only; print the transaction instead of submitting
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging("sui_publisher=info");

    let cli = Cli::parse();

    let resolver = match &cli.networks_file {
        Some(path) => match ConfigResolver::with_overlay(path) {
            Ok(resolver) => resolver,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load networks file");
                return ExitCode::FAILURE;
            }
        },
        None => ConfigResolver::builtin(),
    };

    let options = PublishOptions {
        package_path: cli.package_path,
        network: cli.network,
        export_name: cli.export_name,
        gas_budget: cli.gas_budget,
        export_dir: cli.export_dir,
    };

    if cli.dry_run {
        return match prepare_transaction(&resolver, &options) {
            Ok((_, signed)) => {
                println!("tx_bytes: {}", signed.tx_base64());
                println!("signature: {}", signed.signature_base64());
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(stage = %e.stage(), error = %e, "Dry run failed");
                ExitCode::FAILURE
            }
        };
    }

    // Ctrl-C stops finality polling; it cannot withdraw a submission.
    let cancel = CancelHandle::new();
    let token = cancel.token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping");
            cancel.cancel();
        }
    });

    match publish_package(&resolver, options, Some(token)).await {
        Ok(receipt) => {
            println!("published: {}", receipt.digest);
            for (name, id) in &receipt.addresses {
                println!("  {} = {}", name, id);
            }
            println!("export: {}", receipt.export_path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(stage = %e.stage(), error = %e, "Publish failed");
            if e.is_indeterminate() {
                tracing::warn!(
                    "Outcome is ambiguous: the transaction may still finalize. \
                     Verify on-chain before resubmitting; republishing creates a new package."
                );
            }
            ExitCode::FAILURE
        }
    }
}
