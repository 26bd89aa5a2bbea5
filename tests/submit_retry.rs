//! Submission retry, finality polling, and cancellation behavior.

mod common;

use std::time::Duration;

use common::*;
use sui_publisher::config::ConfigResolver;
use sui_publisher::lifecycle::CancelHandle;
use sui_publisher::publish::{publish_package, PublishError, PublishOptions};
use sui_publisher::rpc::SubmitError;

fn options(package: &std::path::Path, network: &str, export_dir: &std::path::Path) -> PublishOptions {
    PublishOptions {
        package_path: package.to_path_buf(),
        network: network.to_string(),
        export_name: "music-copyright".to_string(),
        gas_budget: None,
        export_dir: export_dir.to_path_buf(),
    }
}

fn setup(node_url: &str, network: &str, env: &str) -> (tempfile::TempDir, ConfigResolver) {
    let dir = tempfile::tempdir().unwrap();
    write_test_package(&dir.path().join("pkg"));
    let networks = write_networks_file(dir.path(), network, node_url, env);
    let resolver = ConfigResolver::with_overlay(&networks).unwrap();
    (dir, resolver)
}

// Scenario D: three transient failures then a success. The caller sees
// only success.
#[tokio::test]
async fn transient_failures_are_retried_to_success() {
    let node = start_mock_node().await;
    for _ in 0..3 {
        node.script_execute(503, serde_json::json!({ "error": "node overloaded" }));
    }
    node.script_execute(200, success_execution("DIGEST-D", "0xpkg", "0xcap"));

    let (dir, resolver) = setup(&node.url, "testnet", "RETRY_KEY_TRANSIENT");
    let receipt = publish_package(
        &resolver,
        options(&dir.path().join("pkg"), "testnet", dir.path()),
        None,
    )
    .await
    .unwrap();

    assert_eq!(receipt.digest, "DIGEST-D");
    assert_eq!(node.execute_calls(), 4);
}

// A definitive rejection is terminal on the first attempt; no retries.
#[tokio::test]
async fn definitive_rejection_is_never_retried() {
    let node = start_mock_node().await;
    node.script_execute(200, rpc_error(-32002, "Invalid user signature"));

    let (dir, resolver) = setup(&node.url, "testnet", "RETRY_KEY_REJECTED");
    let err = publish_package(
        &resolver,
        options(&dir.path().join("pkg"), "testnet", dir.path()),
        None,
    )
    .await
    .unwrap_err();

    match err {
        PublishError::Submit(SubmitError::Rejected { reason }) => {
            assert!(reason.contains("Invalid user signature"));
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert_eq!(node.execute_calls(), 1);
}

// Retry budget exhaustion on pure connect failures is a transport error,
// not indeterminate: nothing ever reached a node.
#[tokio::test]
async fn exhausted_connect_failures_are_transport_errors() {
    // Port 1 refuses connections
    let dir = tempfile::tempdir().unwrap();
    write_test_package(&dir.path().join("pkg"));
    let networks = write_networks_file(
        dir.path(),
        "testnet",
        "http://127.0.0.1:1",
        "RETRY_KEY_CONNECT",
    );
    let resolver = ConfigResolver::with_overlay(&networks).unwrap();

    let err = publish_package(
        &resolver,
        options(&dir.path().join("pkg"), "testnet", dir.path()),
        None,
    )
    .await
    .unwrap_err();

    match err {
        PublishError::Submit(SubmitError::Transport { attempts, .. }) => {
            assert_eq!(attempts, 5);
        }
        other => panic!("expected transport error, got {:?}", other),
    }
}

// An accepted transaction whose effects arrive later is resolved by
// finality polling.
#[tokio::test]
async fn finality_polling_resolves_pending_execution() {
    let node = start_mock_node().await;
    node.script_execute(200, pending_execution("DIGEST-P"));
    node.script_status(200, rpc_error(-32000, "Could not find the referenced transaction"));
    node.script_status(200, success_execution("DIGEST-P", "0xpkg", "0xcap"));

    let (dir, resolver) = setup(&node.url, "testnet", "RETRY_KEY_POLLING");
    let receipt = publish_package(
        &resolver,
        options(&dir.path().join("pkg"), "testnet", dir.path()),
        None,
    )
    .await
    .unwrap();

    assert_eq!(receipt.digest, "DIGEST-P");
    assert_eq!(node.execute_calls(), 1);
    assert!(node.status_calls() >= 2);
}

// A transaction that never reaches finality before the deadline is
// indeterminate and carries the digest for out-of-band reconciliation.
#[tokio::test]
async fn deadline_without_finality_is_indeterminate() {
    let node = start_mock_node().await;
    node.script_execute(200, pending_execution("DIGEST-I"));
    // Enough pending polls to outlast the 5s test deadline
    for _ in 0..200 {
        node.script_status(200, pending_execution("DIGEST-I"));
    }

    let (dir, resolver) = setup(&node.url, "testnet", "RETRY_KEY_DEADLINE");
    let err = publish_package(
        &resolver,
        options(&dir.path().join("pkg"), "testnet", dir.path()),
        None,
    )
    .await
    .unwrap_err();

    assert!(err.is_indeterminate());
    match err {
        PublishError::Submit(SubmitError::Indeterminate { digest, .. }) => {
            assert_eq!(digest.as_deref(), Some("DIGEST-I"));
        }
        other => panic!("expected indeterminate, got {:?}", other),
    }
    // Failure terminals never export
    assert!(!dir.path().join("music-copyright.json").exists());
}

// Cancellation stops polling promptly and reports indeterminate.
#[tokio::test]
async fn cancellation_stops_polling_as_indeterminate() {
    let node = start_mock_node().await;
    node.script_execute(200, pending_execution("DIGEST-C"));
    for _ in 0..200 {
        node.script_status(200, pending_execution("DIGEST-C"));
    }

    let (dir, resolver) = setup(&node.url, "testnet", "RETRY_KEY_CANCEL");

    let handle = CancelHandle::new();
    let token = handle.token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.cancel();
    });

    let started = std::time::Instant::now();
    let err = publish_package(
        &resolver,
        options(&dir.path().join("pkg"), "testnet", dir.path()),
        Some(token),
    )
    .await
    .unwrap_err();

    assert!(err.is_indeterminate());
    assert!(err.to_string().contains("cancelled"));
    // Well before the 5s overall deadline
    assert!(started.elapsed() < Duration::from_secs(3));
}
