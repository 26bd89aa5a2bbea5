//! RPC wire types and submission error definitions.

use serde::Deserialize;
use thiserror::Error;

/// Errors surfaced by the submission stage.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Chain definitively rejected the transaction. Terminal, never retried.
    #[error("publish rejected by chain: {reason}")]
    Rejected { reason: String },

    /// No definitive chain response before cancellation or the deadline.
    /// The transaction may still finalize out of band; resubmitting could
    /// publish a second package.
    #[error("publish outcome indeterminate: {reason}")]
    Indeterminate {
        reason: String,
        /// Known once the node acknowledged the submission.
        digest: Option<String>,
    },

    /// Retry budget exhausted before anything plausibly reached the node.
    #[error("network failure after {attempts} attempts: {last_error}")]
    Transport { attempts: u32, last_error: String },

    /// RPC client could not be constructed.
    #[error("failed to initialize RPC client: {0}")]
    Client(String),
}

/// Internal classification of a single RPC round trip failure.
#[derive(Debug)]
pub(crate) enum CallError {
    /// Worth retrying. `maybe_sent` is true when the request may have
    /// reached the node (e.g. a timeout after the connection was made).
    Transient { message: String, maybe_sent: bool },
    /// The node answered and said no. Never retried.
    Definitive { message: String },
}

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct RpcEnvelope {
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// Transaction block response shared by execute and status-query methods.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxBlockResponse {
    pub digest: String,
    #[serde(default)]
    pub effects: Option<TxEffects>,
    #[serde(default)]
    pub object_changes: Option<Vec<RawObjectChange>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxEffects {
    pub status: EffectsStatus,
    #[serde(default)]
    pub gas_used: Option<GasUsed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EffectsStatus {
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
}

/// Gas cost breakdown; the node reports amounts as decimal strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasUsed {
    #[serde(default)]
    pub computation_cost: String,
    #[serde(default)]
    pub storage_cost: String,
    #[serde(default)]
    pub storage_rebate: String,
}

fn parse_amount(s: &str) -> u64 {
    s.parse().unwrap_or(0)
}

impl GasUsed {
    /// Net gas charged: computation + storage - rebate.
    pub fn total(&self) -> u64 {
        parse_amount(&self.computation_cost)
            .saturating_add(parse_amount(&self.storage_cost))
            .saturating_sub(parse_amount(&self.storage_rebate))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawObjectChange {
    #[serde(rename = "type")]
    pub change_type: String,
    #[serde(default)]
    pub package_id: Option<String>,
    #[serde(default)]
    pub object_id: Option<String>,
    #[serde(default)]
    pub object_type: Option<String>,
}

/// Terminal status of an executed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    Success,
    Failure { reason: String },
}

/// One entry from the execution's object changes, in response order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectChange {
    pub kind: ChangeKind,
    pub id: String,
    pub object_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Published,
    Created,
}

/// Finalized execution outcome produced by the submitter.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub digest: String,
    pub status: ExecutionStatus,
    pub gas_used: u64,
    /// Ordered as reported by the node.
    pub changes: Vec<ObjectChange>,
}

impl ExecutionResult {
    /// Convert a response into a finalized result. `None` while effects
    /// are not yet available (still awaiting finality).
    pub(crate) fn from_response(resp: TxBlockResponse) -> Option<Self> {
        let effects = resp.effects?;
        let status = if effects.status.status.eq_ignore_ascii_case("success") {
            ExecutionStatus::Success
        } else {
            ExecutionStatus::Failure {
                reason: effects
                    .status
                    .error
                    .unwrap_or_else(|| format!("status '{}'", effects.status.status)),
            }
        };

        let mut changes = Vec::new();
        for raw in resp.object_changes.unwrap_or_default() {
            match raw.change_type.as_str() {
                "published" => {
                    if let Some(id) = raw.package_id {
                        changes.push(ObjectChange {
                            kind: ChangeKind::Published,
                            id,
                            object_type: None,
                        });
                    }
                }
                "created" => {
                    if let Some(id) = raw.object_id {
                        changes.push(ObjectChange {
                            kind: ChangeKind::Created,
                            id,
                            object_type: raw.object_type,
                        });
                    }
                }
                // mutated/deleted/transferred entries are irrelevant to a publish
                _ => {}
            }
        }

        Some(Self {
            digest: resp.digest,
            status,
            gas_used: effects.gas_used.map(|g| g.total()).unwrap_or(0),
            changes,
        })
    }
}
