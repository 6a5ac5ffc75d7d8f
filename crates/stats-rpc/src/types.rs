//! RPC request and response types

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use stats_store::Sample;

use crate::error::JsonRpcError;

/// JSON-RPC protocol version accepted and emitted
pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC request ID (can be number, string, or null)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum JsonRpcId {
    /// Numeric ID, any JSON number
    Number(Number),
    /// String ID
    String(String),
    /// Null ID
    #[default]
    Null,
}

/// JSON-RPC 2.0 request
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version (must be "2.0")
    pub jsonrpc: String,
    /// Request ID
    #[serde(default)]
    pub id: JsonRpcId,
    /// Method name
    pub method: String,
    /// Method parameters, positional array or named object
    #[serde(default)]
    pub params: Value,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version
    pub jsonrpc: String,
    /// Request ID
    pub id: JsonRpcId,
    /// Result (on success); `null` is a valid result
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error (on failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Create success response
    pub fn success(id: JsonRpcId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create error response
    pub fn error(id: JsonRpcId, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// Parse a sample from request params
///
/// Accepts the positional form `[{..sample..}]` and the named form
/// `{..sample..}`.
pub fn parse_sample(params: Value) -> Result<Sample, JsonRpcError> {
    let value = match params {
        Value::Array(mut items) => {
            if items.len() != 1 {
                return Err(JsonRpcError::invalid_params(format!(
                    "expected 1 parameter, got {}",
                    items.len()
                )));
            }
            items.remove(0)
        }
        Value::Object(_) => params,
        Value::Null => return Err(JsonRpcError::invalid_params("missing sample")),
        _ => return Err(JsonRpcError::invalid_params("invalid params type")),
    };

    serde_json::from_value(value)
        .map_err(|e| JsonRpcError::invalid_params(format!("invalid sample: {}", e)))
}
