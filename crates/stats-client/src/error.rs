//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport/network error
    #[error("Transport error: {0}")]
    Transport(String),

    /// RPC error from the aggregator
    #[error("RPC error: {code} - {message}")]
    Rpc {
        /// Error code
        code: i64,
        /// Error message
        message: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Serialization(e.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rpc_error_display() {
        let err = ClientError::Rpc {
            code: -32602,
            message: "invalid sample".to_string(),
        };
        assert_eq!(err.to_string(), "RPC error: -32602 - invalid sample");
    }

    #[test]
    fn test_from_serde_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ClientError = json_err.into();
        assert!(matches!(err, ClientError::Serialization(_)));
    }
}
