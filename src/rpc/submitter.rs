//! Transaction submission with bounded retry and finality polling.
//!
//! # Responsibilities
//! - Submit the signed transaction, retrying transient failures with
//!   jittered backoff up to the attempt cap
//! - Poll for finality until the chain reports terminal status
//! - Honor the overall deadline and caller cancellation
//!
//! # Design Decisions
//! - Definitive rejections are never retried
//! - Resubmission sends byte-identical signed payloads, so the chain
//!   deduplicates by digest; once the deadline passes the outcome is
//!   reported indeterminate rather than guessed
//! - Cancellation stops polling but cannot unsubmit

use std::time::{Duration, Instant};

use tokio::time::sleep;

use crate::config::SubmitConfig;
use crate::lifecycle::CancelToken;
use crate::resilience::RetryPolicy;
use crate::rpc::client::RpcClient;
use crate::rpc::types::{CallError, ExecutionResult, SubmitError};
use crate::tx::SignedTransaction;

/// Drives one signed transaction to a terminal outcome.
pub struct Submitter {
    client: RpcClient,
    policy: RetryPolicy,
    poll_interval: Duration,
    overall_deadline: Duration,
}

impl Submitter {
    pub fn new(client: RpcClient, config: &SubmitConfig) -> Self {
        Self {
            client,
            policy: RetryPolicy::from(config),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            overall_deadline: Duration::from_secs(config.overall_deadline_secs),
        }
    }

    /// Submit and await finality.
    pub async fn submit(
        &self,
        signed: &SignedTransaction,
        mut cancel: Option<CancelToken>,
    ) -> Result<ExecutionResult, SubmitError> {
        let deadline = Instant::now() + self.overall_deadline;
        let mut attempts = 0u32;
        let mut maybe_sent = false;

        let digest = loop {
            attempts += 1;
            match self.client.execute_transaction(signed).await {
                Ok(resp) => {
                    let digest = resp.digest.clone();
                    if let Some(result) = ExecutionResult::from_response(resp) {
                        tracing::info!(
                            digest = %result.digest,
                            attempts,
                            gas_used = result.gas_used,
                            "Transaction executed"
                        );
                        return Ok(result);
                    }
                    // Accepted but effects not yet available
                    tracing::info!(digest = %digest, attempts, "Transaction accepted, awaiting finality");
                    break digest;
                }
                Err(CallError::Definitive { message }) => {
                    tracing::warn!(attempts, reason = %message, "Transaction rejected");
                    return Err(SubmitError::Rejected { reason: message });
                }
                Err(CallError::Transient { message, maybe_sent: sent }) => {
                    maybe_sent |= sent;
                    tracing::warn!(attempt = attempts, error = %message, "Transient submission failure");

                    if self.policy.exhausted(attempts) {
                        return Err(self.budget_exhausted(attempts, message, maybe_sent, None));
                    }
                    let delay = self.policy.delay_after(attempts);
                    if Instant::now() + delay >= deadline {
                        return Err(self.budget_exhausted(attempts, message, maybe_sent, None));
                    }
                    sleep(delay).await;
                }
            }
        };

        self.poll_finality(&digest, deadline, &mut cancel).await
    }

    fn budget_exhausted(
        &self,
        attempts: u32,
        last_error: String,
        maybe_sent: bool,
        digest: Option<String>,
    ) -> SubmitError {
        if maybe_sent {
            // At least one request plausibly reached the node; the
            // transaction may land even though we never saw it.
            SubmitError::Indeterminate {
                reason: format!("retry budget exhausted after {} attempts: {}", attempts, last_error),
                digest,
            }
        } else {
            SubmitError::Transport {
                attempts,
                last_error,
            }
        }
    }

    async fn poll_finality(
        &self,
        digest: &str,
        deadline: Instant,
        cancel: &mut Option<CancelToken>,
    ) -> Result<ExecutionResult, SubmitError> {
        loop {
            if Instant::now() >= deadline {
                return Err(SubmitError::Indeterminate {
                    reason: "overall deadline exceeded awaiting finality".to_string(),
                    digest: Some(digest.to_string()),
                });
            }

            let cancelled = match cancel.as_mut() {
                Some(token) => tokio::select! {
                    _ = token.cancelled() => true,
                    _ = sleep(self.poll_interval) => false,
                },
                None => {
                    sleep(self.poll_interval).await;
                    false
                }
            };
            if cancelled {
                tracing::warn!(digest, "Cancelled while awaiting finality");
                return Err(SubmitError::Indeterminate {
                    reason: "cancelled while awaiting finality; transaction may still finalize"
                        .to_string(),
                    digest: Some(digest.to_string()),
                });
            }

            match self.client.get_transaction(digest).await {
                Ok(Some(resp)) => {
                    if let Some(result) = ExecutionResult::from_response(resp) {
                        tracing::info!(
                            digest = %result.digest,
                            gas_used = result.gas_used,
                            "Transaction finalized"
                        );
                        return Ok(result);
                    }
                }
                Ok(None) => {}
                Err(CallError::Transient { message, .. }) => {
                    // Deadline bounds the polling loop; transient errors just wait
                    tracing::debug!(digest, error = %message, "Status poll failed");
                }
                Err(CallError::Definitive { message }) => {
                    return Err(SubmitError::Rejected { reason: message });
                }
            }
        }
    }
}

impl std::fmt::Debug for Submitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Submitter")
            .field("client", &self.client)
            .field("policy", &self.policy)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}
