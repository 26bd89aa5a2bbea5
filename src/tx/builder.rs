//! Publish transaction building.
//!
//! # Responsibilities
//! - Compute a gas budget (caller override, else size-derived default)
//! - Encode modules and dependency references into the transaction schema
//! - Enforce protocol limits before anything is signed
//!
//! # Design Decisions
//! - Building is pure: no RPC round trips, gas price comes with the
//!   resolved network
//! - Module order from the loader is preserved exactly

use crate::tx::types::{
    BuildError, PublishRequest, TransactionData, TransactionKind, UnsignedTransaction,
    MAX_GAS_BUDGET, MAX_MODULES, MAX_TX_BYTES, MIN_GAS_BUDGET,
};

/// Flat gas cost of a publish before accounting for bundle size, in MIST.
const PUBLISH_GAS_BASE: u64 = 10_000_000;

/// Marginal gas per byte of module bytecode, in MIST.
const GAS_PER_MODULE_BYTE: u64 = 1_000;

/// Default gas budget derived from bundle size, clamped to protocol bounds.
pub fn default_gas_budget(total_module_bytes: usize) -> u64 {
    PUBLISH_GAS_BASE
        .saturating_add((total_module_bytes as u64).saturating_mul(GAS_PER_MODULE_BYTE))
        .clamp(MIN_GAS_BUDGET, MAX_GAS_BUDGET)
}

/// Build and encode the unsigned publish transaction.
pub fn build_publish(request: &PublishRequest) -> Result<UnsignedTransaction, BuildError> {
    let bundle = &request.bundle;

    if bundle.modules.is_empty() {
        return Err(BuildError::EmptyBundle);
    }
    if bundle.dependencies.is_empty() {
        return Err(BuildError::NoDependencies);
    }
    if bundle.modules.len() > MAX_MODULES {
        return Err(BuildError::TooManyModules(bundle.modules.len()));
    }

    let gas_budget = match request.gas_budget {
        Some(budget) => {
            if !(MIN_GAS_BUDGET..=MAX_GAS_BUDGET).contains(&budget) {
                return Err(BuildError::GasBudgetOutOfRange(budget));
            }
            budget
        }
        None => default_gas_budget(bundle.total_module_bytes()),
    };

    let data = TransactionData {
        sender: request.sender,
        gas_price: request.network.reference_gas_price,
        gas_budget,
        kind: TransactionKind::Publish {
            modules: bundle.modules.clone(),
            dependencies: bundle.dependencies.clone(),
        },
    };

    let bytes = bcs::to_bytes(&data).map_err(|e| BuildError::Encode(e.to_string()))?;
    if bytes.len() > MAX_TX_BYTES {
        return Err(BuildError::OversizeTransaction {
            actual: bytes.len(),
            limit: MAX_TX_BYTES,
        });
    }

    tracing::debug!(
        sender = %request.sender,
        gas_budget,
        gas_price = data.gas_price,
        tx_bytes = bytes.len(),
        "Publish transaction built"
    );

    Ok(UnsignedTransaction { data, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{ArtifactBundle, MOVE_MAGIC};
    use crate::config::NetworkConfig;
    use crate::tx::types::Address;

    fn module(fill: u8, len: usize) -> Vec<u8> {
        let mut blob = MOVE_MAGIC.to_vec();
        blob.resize(len, fill);
        blob
    }

    fn request(bundle: ArtifactBundle, gas_budget: Option<u64>) -> PublishRequest {
        PublishRequest {
            bundle,
            network: NetworkConfig {
                name: "localnet".to_string(),
                rpc_url: "http://127.0.0.1:9000".to_string(),
                chain_id: String::new(),
                credential_env: String::new(),
                reference_gas_price: 1_000,
            },
            gas_budget,
            sender: Address::from_hex("0xab").unwrap(),
        }
    }

    fn bundle(modules: Vec<Vec<u8>>) -> ArtifactBundle {
        ArtifactBundle {
            modules,
            dependencies: vec![Address::from_hex("0x1").unwrap(), Address::from_hex("0x2").unwrap()],
        }
    }

    #[test]
    fn test_module_order_preserved() {
        let bundle = bundle(vec![module(1, 32), module(2, 48), module(3, 16)]);
        let unsigned = build_publish(&request(bundle.clone(), None)).unwrap();
        let TransactionKind::Publish { modules, .. } = unsigned.data.kind;
        assert_eq!(modules, bundle.modules);
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let bundle = bundle(vec![module(7, 64)]);
        let a = build_publish(&request(bundle.clone(), None)).unwrap();
        let b = build_publish(&request(bundle, None)).unwrap();
        assert_eq!(a.bytes, b.bytes);
    }

    #[test]
    fn test_default_gas_budget_scales_with_size() {
        let small = build_publish(&request(bundle(vec![module(0, 100)]), None)).unwrap();
        let large = build_publish(&request(bundle(vec![module(0, 10_000)]), None)).unwrap();
        assert!(large.data.gas_budget > small.data.gas_budget);
    }

    #[test]
    fn test_gas_budget_override() {
        let unsigned =
            build_publish(&request(bundle(vec![module(0, 32)]), Some(42_000_000))).unwrap();
        assert_eq!(unsigned.data.gas_budget, 42_000_000);

        let err = build_publish(&request(bundle(vec![module(0, 32)]), Some(1))).unwrap_err();
        assert!(matches!(err, BuildError::GasBudgetOutOfRange(1)));
    }

    #[test]
    fn test_no_dependencies_rejected() {
        let mut b = bundle(vec![module(0, 32)]);
        b.dependencies.clear();
        let err = build_publish(&request(b, None)).unwrap_err();
        assert!(matches!(err, BuildError::NoDependencies));
    }

    #[test]
    fn test_oversize_bundle_rejected() {
        let b = bundle(vec![module(0, MAX_TX_BYTES + 1)]);
        let err = build_publish(&request(b, None)).unwrap_err();
        assert!(matches!(err, BuildError::OversizeTransaction { .. }));
    }

    #[test]
    fn test_too_many_modules_rejected() {
        let b = bundle((0..=MAX_MODULES).map(|_| module(0, 16)).collect());
        let err = build_publish(&request(b, None)).unwrap_err();
        assert!(matches!(err, BuildError::TooManyModules(_)));
    }
}
