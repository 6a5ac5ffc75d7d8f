//! HTTP server implementation

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use stats_store::TimeSeriesStore;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::error::{RpcError, RpcResult};
use crate::handler::RpcHandler;
use crate::static_files::static_routes;
use crate::types::JsonRpcResponse;

/// Path accepting JSON-RPC ingestion calls
pub const RPC_PATH: &str = "/rpc";

/// Path serving the JSON snapshot
pub const SNAPSHOT_PATH: &str = "/get";

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address
    pub listen_addr: SocketAddr,
    /// Maximum request body size (default: 1MB)
    pub max_body_size: usize,
    /// Enable CORS (default: true)
    pub enable_cors: bool,
    /// Dashboard asset directory; no asset routes when unset
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8090)),
            max_body_size: 1024 * 1024,
            enable_cors: true,
            static_dir: None,
        }
    }
}

impl ServerConfig {
    /// Create a new server config with the given address
    pub fn new(listen_addr: SocketAddr) -> Self {
        Self {
            listen_addr,
            ..Default::default()
        }
    }
}

/// Server state shared by all request handlers
pub struct ServerState {
    /// RPC handler for ingestion calls
    pub handler: RpcHandler,
    /// Store read by the snapshot endpoint
    pub store: Arc<TimeSeriesStore>,
}

impl ServerState {
    /// Create new server state around one store
    pub fn new(store: Arc<TimeSeriesStore>) -> Self {
        Self {
            handler: RpcHandler::for_store(Arc::clone(&store)),
            store,
        }
    }
}

/// Stats HTTP server
pub struct RpcServer {
    config: ServerConfig,
    state: Arc<ServerState>,
}

impl RpcServer {
    /// Create a new server over `store`
    pub fn new(config: ServerConfig, store: Arc<TimeSeriesStore>) -> Self {
        Self {
            config,
            state: Arc::new(ServerState::new(store)),
        }
    }

    /// Build the router
    pub fn router(&self) -> Router {
        let mut router = Router::new()
            .route(RPC_PATH, post(handle_rpc))
            .route(SNAPSHOT_PATH, get(handle_snapshot));

        if let Some(dir) = &self.config.static_dir {
            router = router.merge(static_routes(dir));
        }

        let mut router = router.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(self.config.max_body_size)),
        );

        if self.config.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        router.with_state(self.state.clone())
    }

    /// Bind the configured address and serve until `shutdown` completes
    pub async fn run_until<F>(self, shutdown: F) -> RpcResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(self.config.listen_addr)
            .await
            .map_err(RpcError::Bind)?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` completes
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> RpcResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router();
        let local_addr = listener.local_addr().map_err(RpcError::Serve)?;
        tracing::info!("Serving up stats on {}", local_addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(RpcError::Serve)?;

        tracing::info!("Stats server on {} stopped", local_addr);
        Ok(())
    }
}

/// Handle JSON-RPC requests
async fn handle_rpc(State(state): State<Arc<ServerState>>, body: Bytes) -> Json<JsonRpcResponse> {
    Json(state.handler.handle_body(&body).await)
}

/// Handle snapshot requests
async fn handle_snapshot(State(state): State<Arc<ServerState>>) -> Result<Response, RpcError> {
    let body = state.store.snapshot().to_json_vec()?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
