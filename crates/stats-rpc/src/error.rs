//! RPC error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Standard JSON-RPC 2.0 error codes
pub mod error_code {
    /// Parse error: Invalid JSON was received
    pub const PARSE_ERROR: i64 = -32700;
    /// Invalid Request: The JSON is not a valid Request object
    pub const INVALID_REQUEST: i64 = -32600;
    /// Method not found
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Invalid params
    pub const INVALID_PARAMS: i64 = -32602;
}

/// JSON-RPC error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Error code
    pub code: i64,
    /// Error message
    pub message: String,
    /// Optional additional data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Create a new JSON-RPC error
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Parse error
    pub fn parse_error() -> Self {
        Self::new(error_code::PARSE_ERROR, "Parse error")
    }

    /// Invalid request
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(error_code::INVALID_REQUEST, message)
    }

    /// Method not found
    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            error_code::METHOD_NOT_FOUND,
            format!("method not found: {}", method),
        )
    }

    /// Invalid params
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(error_code::INVALID_PARAMS, message)
    }
}

/// Server errors
#[derive(Debug, Error)]
pub enum RpcError {
    /// Server bind error
    #[error("failed to bind server: {0}")]
    Bind(#[source] std::io::Error),

    /// Error while serving connections
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    /// JSON serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Result type for server operations
pub type RpcResult<T> = Result<T, RpcError>;
