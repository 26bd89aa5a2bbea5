//! Execution result parsing.
//!
//! # Responsibilities
//! - Turn a finalized execution result into ordered (logical name, id) pairs
//! - Surface on-chain failure reasons verbatim
//!
//! # Design Decisions
//! - The published package id always comes first, under the caller's label
//! - Created objects are named by the kebab-cased struct name of their
//!   type; duplicates get a numeric suffix so no identifier is dropped

use thiserror::Error;

use crate::rpc::types::{ChangeKind, ExecutionResult, ExecutionStatus};

/// Errors raised while extracting identifiers from an execution result.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The transaction executed and failed; the chain-provided reason is
    /// preserved, not swallowed.
    #[error("publish failed on-chain: {reason}")]
    ExecutionFailed { reason: String },

    /// A success result without a published package id is not a publish.
    #[error("execution result for {digest} contains no published package")]
    MissingPackage { digest: String },
}

/// Kebab-case the struct name of a fully qualified object type, e.g.
/// `0x2::package::UpgradeCap` → `upgrade-cap`.
fn logical_name_for_type(object_type: &str) -> String {
    // Strip generic parameters first; they may themselves contain `::`
    let base_type = object_type.split('<').next().unwrap_or(object_type);
    let struct_name = base_type.rsplit("::").next().unwrap_or(base_type);

    let mut out = String::with_capacity(struct_name.len() + 4);
    for (i, c) in struct_name.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.extend(c.to_lowercase());
        } else if c == '_' {
            out.push('-');
        } else {
            out.push(c);
        }
    }
    out
}

/// Extract ordered (logical name, identifier) pairs from a successful
/// publish. The pair for the package itself is always present and first.
pub fn parse_publish_effects(
    package_label: &str,
    result: &ExecutionResult,
) -> Result<Vec<(String, String)>, ParseError> {
    if let ExecutionStatus::Failure { reason } = &result.status {
        return Err(ParseError::ExecutionFailed {
            reason: reason.clone(),
        });
    }

    let mut pairs: Vec<(String, String)> = Vec::new();

    for change in &result.changes {
        if change.kind == ChangeKind::Published {
            pairs.push((package_label.to_string(), change.id.clone()));
            break;
        }
    }
    if pairs.is_empty() {
        return Err(ParseError::MissingPackage {
            digest: result.digest.clone(),
        });
    }

    for change in &result.changes {
        if change.kind != ChangeKind::Created {
            continue;
        }
        let base = change
            .object_type
            .as_deref()
            .map(logical_name_for_type)
            .unwrap_or_else(|| "object".to_string());

        // Disambiguate repeated names in response order
        let mut name = base.clone();
        let mut n = 1;
        while pairs.iter().any(|(existing, _)| *existing == name) {
            n += 1;
            name = format!("{}-{}", base, n);
        }
        pairs.push((name, change.id.clone()));
    }

    tracing::debug!(
        digest = %result.digest,
        entries = pairs.len(),
        "Execution result parsed"
    );

    Ok(pairs)
}
