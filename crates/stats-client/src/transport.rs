//! Transport layer for RPC communication

use async_trait::async_trait;
use serde_json::Value;
use stats_store::Snapshot;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::client::UPDATE_METHOD;
use crate::ClientError;

/// Path of the JSON-RPC endpoint on the aggregator
pub const RPC_PATH: &str = "/rpc";

/// Path of the snapshot endpoint on the aggregator
pub const SNAPSHOT_PATH: &str = "/get";

/// Transport trait for RPC communication (object-safe)
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an RPC request and get the JSON result
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, ClientError>;

    /// Fetch the aggregator's current snapshot
    async fn fetch_snapshot(&self) -> Result<Snapshot, ClientError>;
}

/// Recorded RPC call made through a [`MockTransport`]
pub type RecordedCall = (String, Vec<Value>);

/// Mock transport for testing
///
/// Records every call. `Stats.Update` answers `null` unless overridden.
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<String, Value>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    snapshot: Arc<Mutex<Snapshot>>,
}

impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        let mut defaults = HashMap::new();
        defaults.insert(UPDATE_METHOD.to_string(), Value::Null);

        Self {
            responses: Arc::new(Mutex::new(defaults)),
            calls: Arc::new(Mutex::new(Vec::new())),
            snapshot: Arc::new(Mutex::new(Snapshot::default())),
        }
    }

    /// Set a mock response for a specific method
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn set_response(&self, method: &str, response: Value) {
        self.responses
            .lock()
            .expect("MockTransport mutex poisoned")
            .insert(method.to_string(), response);
    }

    /// Set the snapshot returned by `fetch_snapshot`
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn set_snapshot(&self, snapshot: Snapshot) {
        *self.snapshot.lock().expect("MockTransport mutex poisoned") = snapshot;
    }

    /// Calls made so far, in order
    ///
    /// # Panics
    ///
    /// Panics if the mutex is poisoned.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .expect("MockTransport mutex poisoned")
            .clone()
    }

    /// Handle sharing this mock's state, for inspecting calls after the
    /// mock has been moved into a client
    pub fn handle(&self) -> Self {
        Self {
            responses: Arc::clone(&self.responses),
            calls: Arc::clone(&self.calls),
            snapshot: Arc::clone(&self.snapshot),
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, ClientError> {
        self.calls
            .lock()
            .map_err(|_| ClientError::Transport("MockTransport mutex poisoned".to_string()))?
            .push((method.to_string(), params));

        let response = self
            .responses
            .lock()
            .map_err(|_| ClientError::Transport("MockTransport mutex poisoned".to_string()))?
            .get(method)
            .cloned();

        response.ok_or_else(|| ClientError::Rpc {
            code: -32601,
            message: format!("method not found: {}", method),
        })
    }

    async fn fetch_snapshot(&self) -> Result<Snapshot, ClientError> {
        self.snapshot
            .lock()
            .map(|snapshot| snapshot.clone())
            .map_err(|_| ClientError::Transport("MockTransport mutex poisoned".to_string()))
    }
}

/// HTTP transport for real RPC communication
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    request_id: std::sync::atomic::AtomicU64,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a new HTTP transport for the aggregator at `base_url`
    /// (e.g. `http://127.0.0.1:8090`)
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            request_id: std::sync::atomic::AtomicU64::new(1),
        }
    }

    /// Base URL of the aggregator
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn next_id(&self) -> u64 {
        self.request_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for HttpTransport {
    async fn request_json(&self, method: &str, params: Vec<Value>) -> Result<Value, ClientError> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": self.next_id(),
            "method": method,
            "params": params,
        });

        let response: JsonRpcResponse = self
            .client
            .post(format!("{}{}", self.base_url, RPC_PATH))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(ClientError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        // A `null` result is an empty ack.
        Ok(response.result.unwrap_or(Value::Null))
    }

    async fn fetch_snapshot(&self) -> Result<Snapshot, ClientError> {
        let snapshot = self
            .client
            .get(format!("{}{}", self.base_url, SNAPSHOT_PATH))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(snapshot)
    }
}

#[cfg(feature = "http")]
#[derive(serde::Deserialize)]
struct JsonRpcResponse {
    result: Option<Value>,
    error: Option<JsonRpcError>,
}

#[cfg(feature = "http")]
#[derive(serde::Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}
