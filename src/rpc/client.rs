//! JSON-RPC client with timeout and error classification.
//!
//! # Responsibilities
//! - Speak JSON-RPC 2.0 to the fullnode endpoint
//! - Enforce the per-attempt timeout on every round trip
//! - Classify failures as transient (retryable) or definitive (terminal)
//!
//! # Design Decisions
//! - Connect errors are transient and provably unsent; timeouts and 5xx
//!   responses are transient but may have reached the node
//! - A JSON-RPC error object is the node answering "no": definitive

use std::time::Duration;

use serde_json::json;
use url::Url;

use crate::config::{ResolvedNetwork, SubmitConfig};
use crate::rpc::types::{CallError, RpcEnvelope, SubmitError, TxBlockResponse};
use crate::tx::SignedTransaction;

/// Options sent with every transaction method call.
fn response_options() -> serde_json::Value {
    json!({ "showEffects": true, "showObjectChanges": true })
}

/// JSON-RPC client bound to one network endpoint.
#[derive(Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    endpoint: Url,
    attempt_timeout: Duration,
}

impl RpcClient {
    pub fn new(network: &ResolvedNetwork, submit: &SubmitConfig) -> Result<Self, SubmitError> {
        let attempt_timeout = Duration::from_secs(submit.attempt_timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(attempt_timeout)
            .build()
            .map_err(|e| SubmitError::Client(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: network.endpoint.clone(),
            attempt_timeout,
        })
    }

    async fn call(&self, method: &str, params: serde_json::Value) -> Result<serde_json::Value, CallError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| CallError::Transient {
                message: format!("{} request failed: {}", method, e),
                // Connect failures provably never reached the node
                maybe_sent: !e.is_connect(),
            })?;

        let status = response.status();
        if status.as_u16() == 429 || status.is_server_error() {
            return Err(CallError::Transient {
                message: format!("{} returned HTTP {}", method, status),
                maybe_sent: true,
            });
        }
        if !status.is_success() {
            return Err(CallError::Definitive {
                message: format!("{} returned HTTP {}", method, status),
            });
        }

        let envelope: RpcEnvelope = response.json().await.map_err(|e| CallError::Transient {
            message: format!("{} returned malformed body: {}", method, e),
            maybe_sent: true,
        })?;

        if let Some(error) = envelope.error {
            return Err(CallError::Definitive {
                message: format!("{} (code {})", error.message, error.code),
            });
        }

        envelope.result.ok_or_else(|| CallError::Transient {
            message: format!("{} response missing result", method),
            maybe_sent: true,
        })
    }

    /// Submit a signed transaction and request local execution.
    pub(crate) async fn execute_transaction(
        &self,
        signed: &SignedTransaction,
    ) -> Result<TxBlockResponse, CallError> {
        let result = self
            .call(
                "sui_executeTransactionBlock",
                json!([
                    signed.tx_base64(),
                    [signed.signature_base64()],
                    response_options(),
                    "WaitForLocalExecution",
                ]),
            )
            .await?;

        serde_json::from_value(result).map_err(|e| CallError::Transient {
            message: format!("unrecognized execute response: {}", e),
            maybe_sent: true,
        })
    }

    /// Query a transaction by digest. `Ok(None)` while the node has not
    /// indexed it yet (the node reports unknown digests as errors).
    pub(crate) async fn get_transaction(
        &self,
        digest: &str,
    ) -> Result<Option<TxBlockResponse>, CallError> {
        let result = match self
            .call("sui_getTransactionBlock", json!([digest, response_options()]))
            .await
        {
            Ok(value) => value,
            Err(CallError::Definitive { message }) => {
                tracing::debug!(digest, error = %message, "Transaction not yet available");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        match serde_json::from_value(result) {
            Ok(resp) => Ok(Some(resp)),
            Err(e) => Err(CallError::Transient {
                message: format!("unrecognized status response: {}", e),
                maybe_sent: true,
            }),
        }
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("attempt_timeout", &self.attempt_timeout)
            .finish()
    }
}
