//! StatsClient - pushes samples to an aggregator

use serde_json::Value;
use stats_store::{Sample, Snapshot};

use crate::transport::{MockTransport, Transport};
use crate::ClientError;

#[cfg(feature = "http")]
use crate::transport::HttpTransport;

/// Method name of the ingestion call
pub const UPDATE_METHOD: &str = "Stats.Update";

/// Client for one stats aggregator
pub struct StatsClient {
    transport: Box<dyn Transport>,
}

impl StatsClient {
    /// Create a client talking HTTP to the aggregator at `base_url`
    #[cfg(feature = "http")]
    pub fn connect(base_url: &str) -> Self {
        Self::with_transport(HttpTransport::new(base_url))
    }

    /// Create a new client with mock transport (for testing)
    pub fn new_mock() -> Self {
        Self::with_transport(MockTransport::new())
    }

    /// Create a client with a custom transport
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    /// Push one sample
    pub async fn update(&self, sample: &Sample) -> Result<(), ClientError> {
        let params = vec![serde_json::to_value(sample)?];
        let result = self.transport.request_json(UPDATE_METHOD, params).await?;
        if !result.is_null() {
            tracing::debug!("unexpected {} result: {}", UPDATE_METHOD, result);
        }
        Ok(())
    }

    /// Push one value without building a [`Sample`] first
    pub async fn update_value(
        &self,
        process: &str,
        series: &str,
        value: i64,
    ) -> Result<(), ClientError> {
        self.update(&Sample::new(process, series, value)).await
    }

    /// Fetch the aggregator's current snapshot
    pub async fn snapshot(&self) -> Result<Snapshot, ClientError> {
        self.transport.fetch_snapshot().await
    }

    /// Handle that reports every series under one process name
    pub fn process(&self, name: impl Into<String>) -> ProcessHandle<'_> {
        ProcessHandle {
            client: self,
            process: name.into(),
        }
    }

    /// Make a raw RPC call
    pub async fn request(&self, method: &str, params: Vec<Value>) -> Result<Value, ClientError> {
        self.transport.request_json(method, params).await
    }
}

/// Client bound to a single process name
pub struct ProcessHandle<'a> {
    client: &'a StatsClient,
    process: String,
}

impl ProcessHandle<'_> {
    /// Process name attached to every sample
    pub fn name(&self) -> &str {
        &self.process
    }

    /// Push a value for `series` of this process
    pub async fn record(&self, series: &str, value: i64) -> Result<(), ClientError> {
        self.client.update_value(&self.process, series, value).await
    }
}
