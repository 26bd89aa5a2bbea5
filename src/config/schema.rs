//! Configuration schema definitions.
//!
//! All types derive Serde traits so network registries and submission
//! parameters can be overlaid from a TOML file.

use serde::{Deserialize, Serialize};

/// A single target network: where to submit and how to sign.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
    /// Network identifier (e.g. "testnet").
    pub name: String,

    /// JSON-RPC fullnode endpoint.
    pub rpc_url: String,

    /// Chain identifier reported by the network, informational.
    #[serde(default)]
    pub chain_id: String,

    /// Environment variable holding the Ed25519 signing key for this network.
    /// The key itself never appears in configuration files.
    #[serde(default)]
    pub credential_env: String,

    /// Reference gas price in MIST used when building transactions.
    #[serde(default = "default_gas_price")]
    pub reference_gas_price: u64,
}

fn default_gas_price() -> u64 {
    1_000
}

impl NetworkConfig {
    /// Environment variable consulted for this network's signing key.
    ///
    /// Falls back to `SUI_PUBLISHER_KEY_<NAME>` when the entry does not
    /// name one explicitly.
    pub fn credential_env(&self) -> String {
        if self.credential_env.is_empty() {
            format!(
                "SUI_PUBLISHER_KEY_{}",
                self.name.to_uppercase().replace('-', "_")
            )
        } else {
            self.credential_env.clone()
        }
    }
}

/// Submission retry and finality parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SubmitConfig {
    /// Maximum transaction submission attempts (transient failures only).
    pub max_attempts: u32,

    /// Base backoff delay between attempts, in milliseconds.
    pub backoff_base_ms: u64,

    /// Backoff delay cap, in milliseconds.
    pub backoff_max_ms: u64,

    /// Timeout for a single RPC round trip, in seconds.
    pub attempt_timeout_secs: u64,

    /// Overall deadline for the whole submission-with-retry sequence,
    /// including finality polling, in seconds.
    pub overall_deadline_secs: u64,

    /// Interval between finality polls, in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_base_ms: 500,
            backoff_max_ms: 8_000,
            attempt_timeout_secs: 30,
            overall_deadline_secs: 120,
            poll_interval_ms: 2_000,
        }
    }
}

/// Root schema of the optional overlay file.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PublisherConfig {
    /// Extra or overriding network entries.
    pub networks: Vec<NetworkConfig>,

    /// Submission parameter overrides.
    pub submit: SubmitConfig,
}
