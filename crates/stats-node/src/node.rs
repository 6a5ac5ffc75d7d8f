//! Node orchestration for the stats binary

use crate::config::NodeConfig;
use stats_rpc::{RpcError, RpcServer};
use stats_store::TimeSeriesStore;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

/// Node error types
#[derive(Debug, Error)]
pub enum NodeError {
    /// Server error
    #[error("server error: {0}")]
    Server(#[from] RpcError),
}

/// Result type for node operations
pub type NodeResult<T> = Result<T, NodeError>;

/// Stats node: one store shared by the ingestion and snapshot endpoints
pub struct Node {
    config: NodeConfig,
    store: Arc<TimeSeriesStore>,
}

impl Node {
    /// Create a new node; the store's epoch is now
    pub fn new(config: NodeConfig) -> Self {
        if let Some(dir) = &config.static_dir {
            if !dir.is_dir() {
                tracing::warn!("static asset directory {:?} not found; dashboard pages will 404", dir);
            }
        }

        let store = Arc::new(TimeSeriesStore::new(config.max_points));
        Self { config, store }
    }

    /// Bind the configured address and serve until `shutdown` completes
    pub async fn run_until<F>(&self, shutdown: F) -> NodeResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(
            max_points = self.config.max_points,
            "starting stats server on {}",
            self.config.listen_addr
        );
        self.server().run_until(shutdown).await?;
        Ok(())
    }

    fn server(&self) -> RpcServer {
        RpcServer::new(self.config.server_config(), Arc::clone(&self.store))
    }
}
