//! Shared harness for integration tests: an in-process mock fullnode and
//! fixture builders for packages, networks, and credentials.

// Each test binary uses a different subset of the harness
#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

/// Well-known test seed (never used on a real network).
pub const TEST_SEED_HEX: &str =
    "9bf49a6a0755f953811fce125f2683d50429c3bb49e074147e0089a52eae155f";

#[derive(Default)]
pub struct MockState {
    execute_responses: Mutex<VecDeque<(u16, Value)>>,
    status_responses: Mutex<VecDeque<(u16, Value)>>,
    pub execute_calls: AtomicU32,
    pub status_calls: AtomicU32,
}

/// A scripted mock fullnode speaking just enough JSON-RPC for the tests.
pub struct MockNode {
    pub url: String,
    pub state: Arc<MockState>,
}

impl MockNode {
    /// Queue the next response to `sui_executeTransactionBlock`.
    pub fn script_execute(&self, status: u16, body: Value) {
        self.state
            .execute_responses
            .lock()
            .unwrap()
            .push_back((status, body));
    }

    /// Queue the next response to `sui_getTransactionBlock`.
    pub fn script_status(&self, status: u16, body: Value) {
        self.state
            .status_responses
            .lock()
            .unwrap()
            .push_back((status, body));
    }

    pub fn execute_calls(&self) -> u32 {
        self.state.execute_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> u32 {
        self.state.status_calls.load(Ordering::SeqCst)
    }
}

async fn handler(
    State(state): State<Arc<MockState>>,
    Json(request): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let method = request["method"].as_str().unwrap_or("");
    let queue = match method {
        "sui_executeTransactionBlock" => {
            state.execute_calls.fetch_add(1, Ordering::SeqCst);
            &state.execute_responses
        }
        "sui_getTransactionBlock" => {
            state.status_calls.fetch_add(1, Ordering::SeqCst);
            &state.status_responses
        }
        other => {
            return (
                StatusCode::OK,
                Json(rpc_error(-32601, &format!("unknown method {}", other))),
            );
        }
    };

    let next = queue.lock().unwrap().pop_front();
    match next {
        Some((status, body)) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Json(body),
        ),
        // Script exhausted: repeat the last known behavior is surprising,
        // so fail loudly instead
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "mock script exhausted" })),
        ),
    }
}

/// Start the mock node on an ephemeral port.
pub async fn start_mock_node() -> MockNode {
    let state = Arc::new(MockState::default());
    let app = Router::new()
        .route("/", post(handler))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockNode {
        url: format!("http://{}", addr),
        state,
    }
}

pub fn rpc_result(value: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": 1, "result": value })
}

pub fn rpc_error(code: i64, message: &str) -> Value {
    json!({ "jsonrpc": "2.0", "id": 1, "error": { "code": code, "message": message } })
}

/// Full successful execution response: published package plus an upgrade
/// capability object.
pub fn success_execution(digest: &str, package_id: &str, cap_id: &str) -> Value {
    rpc_result(json!({
        "digest": digest,
        "effects": {
            "status": { "status": "success" },
            "gasUsed": {
                "computationCost": "750000",
                "storageCost": "5130400",
                "storageRebate": "978120"
            }
        },
        "objectChanges": [
            { "type": "published", "packageId": package_id },
            {
                "type": "created",
                "objectId": cap_id,
                "objectType": "0x2::package::UpgradeCap"
            }
        ]
    }))
}

/// Accepted-but-not-final response: digest only, no effects yet.
pub fn pending_execution(digest: &str) -> Value {
    rpc_result(json!({ "digest": digest }))
}

/// Write a minimal compiled-package fixture under `dir/build/publish.json`.
pub fn write_test_package(dir: &Path) -> PathBuf {
    use base64::Engine;

    let mut module = vec![0xa1, 0x1c, 0xeb, 0x0b];
    module.extend_from_slice(&[6, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7, 8]);
    let manifest = json!({
        "modules": [base64::engine::general_purpose::STANDARD.encode(module)],
        "dependencies": ["0x1", "0x2"],
    });

    let build_dir = dir.join("build");
    std::fs::create_dir_all(&build_dir).unwrap();
    std::fs::write(
        build_dir.join("publish.json"),
        serde_json::to_string(&manifest).unwrap(),
    )
    .unwrap();
    dir.to_path_buf()
}

/// Register `network_name` pointing at the mock node, with fast retry and
/// polling parameters and a per-test credential env var.
pub fn write_networks_file(
    dir: &Path,
    network_name: &str,
    rpc_url: &str,
    credential_env: &str,
) -> PathBuf {
    std::env::set_var(credential_env, TEST_SEED_HEX);
    let path = dir.join(format!("networks-{}.toml", network_name));
    std::fs::write(
        &path,
        format!(
            r#"
[[networks]]
name = "{network_name}"
rpc_url = "{rpc_url}"
credential_env = "{credential_env}"

[submit]
max_attempts = 5
backoff_base_ms = 10
backoff_max_ms = 50
attempt_timeout_secs = 5
overall_deadline_secs = 5
poll_interval_ms = 50
"#
        ),
    )
    .unwrap();
    path
}
