//! Request handler and method dispatcher

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use stats_store::TimeSeriesStore;

use crate::error::JsonRpcError;
use crate::methods::stats;
use crate::types::{JsonRpcId, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};

/// Type alias for async method handler
pub type MethodFn = Box<
    dyn Fn(Arc<RpcContext>, Value) -> Pin<Box<dyn Future<Output = Result<Value, JsonRpcError>> + Send>>
        + Send
        + Sync,
>;

/// Shared context for RPC handlers
pub struct RpcContext {
    /// Time-series store receiving samples
    pub store: Arc<TimeSeriesStore>,
}

impl RpcContext {
    /// Create a new RPC context
    pub fn new(store: Arc<TimeSeriesStore>) -> Self {
        Self { store }
    }
}

/// Method registry for dispatching RPC calls
pub struct MethodRegistry {
    methods: HashMap<String, MethodFn>,
}

impl Default for MethodRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodRegistry {
    /// Create a new method registry with all methods registered
    pub fn new() -> Self {
        let mut registry = Self {
            methods: HashMap::new(),
        };

        registry.register(stats::UPDATE_METHOD, stats::stats_update);
        registry.register(stats::LEGACY_UPDATE_METHOD, stats::stats_update);

        registry
    }

    /// Register a method handler
    pub fn register<F, Fut>(&mut self, name: &str, handler: F)
    where
        F: Fn(Arc<RpcContext>, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value, JsonRpcError>> + Send + 'static,
    {
        self.methods.insert(
            name.to_string(),
            Box::new(move |ctx, params| Box::pin(handler(ctx, params))),
        );
    }

    /// Dispatch a method call
    pub async fn dispatch(
        &self,
        ctx: Arc<RpcContext>,
        method: &str,
        params: Value,
    ) -> Result<Value, JsonRpcError> {
        match self.methods.get(method) {
            Some(handler) => handler(ctx, params).await,
            None => Err(JsonRpcError::method_not_found(method)),
        }
    }

    /// Check if a method is registered
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    /// Get list of registered methods
    pub fn method_names(&self) -> Vec<&str> {
        self.methods.keys().map(|s| s.as_str()).collect()
    }
}

/// RPC request handler
pub struct RpcHandler {
    ctx: Arc<RpcContext>,
    registry: MethodRegistry,
}

impl RpcHandler {
    /// Create a new RPC handler
    pub fn new(ctx: Arc<RpcContext>) -> Self {
        Self {
            ctx,
            registry: MethodRegistry::new(),
        }
    }

    /// Create a handler over a store
    pub fn for_store(store: Arc<TimeSeriesStore>) -> Self {
        Self::new(Arc::new(RpcContext::new(store)))
    }

    /// Handle a raw request body
    ///
    /// Malformed JSON and structurally invalid requests are answered with a
    /// JSON-RPC error rather than an HTTP error.
    pub async fn handle_body(&self, body: &[u8]) -> JsonRpcResponse {
        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("rejecting unparsable RPC body: {}", e);
                return JsonRpcResponse::error(JsonRpcId::Null, JsonRpcError::parse_error());
            }
        };

        let id: JsonRpcId = value
            .get("id")
            .cloned()
            .and_then(|id| serde_json::from_value(id).ok())
            .unwrap_or_default();

        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_request(format!("invalid request: {}", e)),
            ),
        }
    }

    /// Handle a JSON-RPC request
    ///
    /// Every request is answered, including one without an `id`. Callers
    /// treat the `null` result as the acknowledgement that their sample was
    /// stored, so notifications get a response with `id: null`.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        // Validate JSON-RPC version
        if request.jsonrpc != JSONRPC_VERSION {
            return JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_request("invalid JSON-RPC version"),
            );
        }

        match self
            .registry
            .dispatch(self.ctx.clone(), &request.method, request.params)
            .await
        {
            Ok(result) => JsonRpcResponse::success(request.id, result),
            Err(error) => {
                tracing::debug!(method = %request.method, code = error.code, "RPC call failed: {}", error.message);
                JsonRpcResponse::error(request.id, error)
            }
        }
    }

    /// Get the RPC context
    pub fn context(&self) -> &Arc<RpcContext> {
        &self.ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::error_code;
    use serde_json::json;

    fn test_handler() -> RpcHandler {
        RpcHandler::for_store(Arc::new(TimeSeriesStore::new(5)))
    }

    // ===== MethodRegistry Tests =====

    #[test]
    fn test_method_registry_default_methods() {
        let registry = MethodRegistry::new();
        assert!(registry.has_method("Stats.Update"));
        assert!(registry.has_method("Server.Update"));
        assert!(!registry.has_method("Stats.Unknown"));

        let mut names = registry.method_names();
        names.sort_unstable();
        assert_eq!(names, vec!["Server.Update", "Stats.Update"]);
    }

    #[test]
    fn test_method_registry_custom_handler() {
        let mut registry = MethodRegistry::default();

        async fn custom_handler(
            _ctx: Arc<RpcContext>,
            _params: Value,
        ) -> Result<Value, JsonRpcError> {
            Ok(Value::String("custom".to_string()))
        }

        registry.register("Stats.Custom", custom_handler);

        assert!(registry.has_method("Stats.Custom"));
        assert_eq!(registry.method_names().len(), 3);
    }

    // ===== RpcHandler Tests =====

    #[tokio::test]
    async fn test_handle_update() {
        let handler = test_handler();
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "Stats.Update",
            "params": [{"process": "p", "series": "s", "value": 9}]
        });

        let response = handler.handle_body(body.to_string().as_bytes()).await;
        assert_eq!(response.id, JsonRpcId::Number(1.into()));
        assert_eq!(response.result, Some(Value::Null));
        assert!(response.error.is_none());
        assert_eq!(handler.context().store.series("p", "s").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_handle_update_with_negative_id() {
        let handler = test_handler();
        let body = json!({
            "jsonrpc": "2.0",
            "id": -1,
            "method": "Stats.Update",
            "params": [{"process": "p", "series": "s", "value": 1}]
        });

        let response = handler.handle_body(body.to_string().as_bytes()).await;
        assert!(response.error.is_none());
        assert_eq!(response.id, JsonRpcId::Number((-1).into()));
        assert_eq!(serde_json::to_value(&response).unwrap()["id"], json!(-1));
        assert_eq!(handler.context().store.series("p", "s").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_handle_update_with_fractional_id() {
        let handler = test_handler();
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1.5,
            "method": "Stats.Update",
            "params": {"process": "p", "series": "s", "value": 2}
        });

        let response = handler.handle_body(body.to_string().as_bytes()).await;
        assert!(response.error.is_none());
        assert_eq!(serde_json::to_value(&response).unwrap()["id"], json!(1.5));
        assert_eq!(handler.context().store.series("p", "s").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_handle_legacy_update_method() {
        let handler = test_handler();
        let body = json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "Server.Update",
            "params": [{"Process": "p", "Series": "s", "Value": 4}]
        });

        let response = handler.handle_body(body.to_string().as_bytes()).await;
        assert_eq!(response.result, Some(Value::Null));
        let points = handler.context().store.series("p", "s").unwrap();
        assert_eq!(points[0].value(), 4);
    }

    #[tokio::test]
    async fn test_handle_request_without_id_is_acknowledged() {
        let handler = test_handler();
        let body = json!({
            "jsonrpc": "2.0",
            "method": "Stats.Update",
            "params": [{"process": "p", "series": "s", "value": 5}]
        });

        let response = handler.handle_body(body.to_string().as_bytes()).await;
        assert_eq!(response.id, JsonRpcId::Null);
        assert_eq!(response.result, Some(Value::Null));
        assert!(response.error.is_none());
        assert_eq!(handler.context().store.series("p", "s").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_handle_parse_error() {
        let handler = test_handler();
        let response = handler.handle_body(b"{not json").await;
        assert_eq!(response.id, JsonRpcId::Null);
        assert_eq!(response.error.unwrap().code, error_code::PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_handle_invalid_request_keeps_id() {
        let handler = test_handler();
        let response = handler
            .handle_body(json!({"jsonrpc": "2.0", "id": 4}).to_string().as_bytes())
            .await;
        assert_eq!(response.id, JsonRpcId::Number(4.into()));
        assert_eq!(response.error.unwrap().code, error_code::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_handle_wrong_version() {
        let handler = test_handler();
        let response = handler
            .handle_body(
                json!({"jsonrpc": "1.0", "id": 2, "method": "Stats.Update"})
                    .to_string()
                    .as_bytes(),
            )
            .await;
        assert_eq!(response.error.unwrap().code, error_code::INVALID_REQUEST);
        assert!(handler.context().store.is_empty());
    }

    #[tokio::test]
    async fn test_handle_unknown_method() {
        let handler = test_handler();
        let response = handler
            .handle_body(
                json!({"jsonrpc": "2.0", "id": "x", "method": "Stats.Delete"})
                    .to_string()
                    .as_bytes(),
            )
            .await;
        assert_eq!(response.id, JsonRpcId::String("x".to_string()));
        assert_eq!(response.error.unwrap().code, error_code::METHOD_NOT_FOUND);
    }
}
