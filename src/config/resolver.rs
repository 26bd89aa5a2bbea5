//! Network resolution.
//!
//! # Responsibilities
//! - Map a network name to exactly one endpoint + credential pair
//! - Overlay a TOML file on top of the built-in registry
//! - Look up credential material from the environment
//!
//! # Design Decisions
//! - Resolution performs no network I/O; an unknown network or a missing
//!   credential fails before anything touches the wire
//! - The resolved pair is immutable for the rest of the run

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use thiserror::Error;
use url::Url;

use crate::config::schema::{NetworkConfig, PublisherConfig, SubmitConfig};

/// Errors that can occur while resolving network configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Network name is not present in the registry.
    #[error("unknown network '{0}'")]
    UnknownNetwork(String),

    /// Credential environment variable is unset or empty.
    #[error("network '{network}' requires signing key in environment variable {env}")]
    MissingCredential { network: String, env: String },

    /// RPC endpoint is not a valid URL.
    #[error("network '{network}' has invalid RPC endpoint '{url}': {reason}")]
    InvalidEndpoint {
        network: String,
        url: String,
        reason: String,
    },

    /// Overlay file could not be read.
    #[error("failed to read networks file: {0}")]
    Io(#[from] std::io::Error),

    /// Overlay file could not be parsed.
    #[error("failed to parse networks file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Opaque signing credential. Never printed, never serialized.
#[derive(Clone)]
pub struct Credential(String);

impl Credential {
    pub(crate) fn new(material: String) -> Self {
        Self(material)
    }

    /// Expose the raw credential material to the signer.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// A fully resolved network: configuration, validated endpoint, credential.
#[derive(Debug, Clone)]
pub struct ResolvedNetwork {
    pub config: NetworkConfig,
    pub endpoint: Url,
    pub credential: Credential,
}

/// Registry mapping network names to endpoint + credential pairs.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    networks: BTreeMap<String, NetworkConfig>,
    submit: SubmitConfig,
}

impl ConfigResolver {
    /// Registry with the well-known Sui networks.
    pub fn builtin() -> Self {
        let mut networks = BTreeMap::new();
        for (name, rpc_url, chain_id) in [
            ("testnet", "https://fullnode.testnet.sui.io:443", "4c78adac"),
            ("mainnet", "https://fullnode.mainnet.sui.io:443", "35834a8a"),
            ("devnet", "https://fullnode.devnet.sui.io:443", ""),
            ("localnet", "http://127.0.0.1:9000", ""),
        ] {
            networks.insert(
                name.to_string(),
                NetworkConfig {
                    name: name.to_string(),
                    rpc_url: rpc_url.to_string(),
                    chain_id: chain_id.to_string(),
                    credential_env: String::new(),
                    reference_gas_price: 1_000,
                },
            );
        }
        Self {
            networks,
            submit: SubmitConfig::default(),
        }
    }

    /// Built-in registry with a TOML overlay applied on top.
    ///
    /// Overlay entries replace built-in entries with the same name.
    pub fn with_overlay(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let overlay: PublisherConfig = toml::from_str(&content)?;

        let mut resolver = Self::builtin();
        for net in overlay.networks {
            tracing::debug!(network = %net.name, rpc_url = %net.rpc_url, "Registered network");
            resolver.networks.insert(net.name.clone(), net);
        }
        resolver.submit = overlay.submit;
        Ok(resolver)
    }

    /// Submission parameters for this registry.
    pub fn submit_config(&self) -> &SubmitConfig {
        &self.submit
    }

    /// Resolve a network name to its endpoint and credential.
    ///
    /// Fails before any network I/O if the name is unregistered, the
    /// endpoint is malformed, or the credential env var is absent.
    pub fn resolve(&self, name: &str) -> Result<ResolvedNetwork, ConfigError> {
        let config = self
            .networks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownNetwork(name.to_string()))?
            .clone();

        let endpoint: Url =
            config
                .rpc_url
                .parse()
                .map_err(|e: url::ParseError| ConfigError::InvalidEndpoint {
                    network: name.to_string(),
                    url: config.rpc_url.clone(),
                    reason: e.to_string(),
                })?;

        let env = config.credential_env();
        let material = std::env::var(&env)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingCredential {
                network: name.to_string(),
                env: env.clone(),
            })?;

        tracing::info!(
            network = %config.name,
            rpc_url = %config.rpc_url,
            credential_env = %env,
            "Network resolved"
        );

        Ok(ResolvedNetwork {
            config,
            endpoint,
            credential: Credential::new(material),
        })
    }
}
