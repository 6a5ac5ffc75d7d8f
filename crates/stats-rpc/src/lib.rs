//! # stats-rpc
//!
//! HTTP front end of the stats aggregator.
//!
//! Instrumented processes push samples with a JSON-RPC 2.0 call and the
//! dashboard pulls the whole store back as one JSON document.
//!
//! ## Features
//!
//! - JSON-RPC 2.0 ingestion at `POST /rpc`
//! - JSON snapshot of every series at `GET /get`
//! - Optional dashboard assets at `/` and `/flotr/*`
//! - Request tracing, body size limit and CORS
//!
//! ## Usage
//!
//! ```ignore
//! use stats_rpc::{RpcServer, ServerConfig};
//! use stats_store::TimeSeriesStore;
//! use std::sync::Arc;
//!
//! let store = Arc::new(TimeSeriesStore::new(60));
//! let server = RpcServer::new(ServerConfig::default(), store);
//!
//! server.run_until(async { tokio::signal::ctrl_c().await.ok(); }).await?;
//! ```
//!
//! ## Supported Methods
//!
//! | Method | Description |
//! |--------|-------------|
//! | `Stats.Update` | Appends one `{process, series, value}` sample; returns `null` |
//! | `Server.Update` | Alias of `Stats.Update` kept for older clients |
//!
//! ## Snapshot Format
//!
//! ```text
//! {"web requests": [[12, 40], [13, 42]], "db queries": [[13, 7]]}
//! ```
//!
//! Keys are `"<process> <series>"`, values are oldest-first
//! `[bucket_timestamp, value]` pairs where one bucket is 100ms since the
//! store was created.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod handler;
pub mod methods;
pub mod server;
pub mod static_files;
pub mod types;

// Re-export main types
pub use error::{JsonRpcError, RpcError, RpcResult};
pub use handler::{MethodRegistry, RpcContext, RpcHandler};
pub use server::{RpcServer, ServerConfig, RPC_PATH, SNAPSHOT_PATH};
pub use types::{JsonRpcId, JsonRpcRequest, JsonRpcResponse};
