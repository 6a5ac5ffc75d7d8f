//! # stats-client
//!
//! Client for instrumented processes pushing samples to a stats aggregator.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stats_client::StatsClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = StatsClient::connect("http://127.0.0.1:8090");
//!
//!     // One-off sample
//!     client.update_value("web", "requests", 42).await?;
//!
//!     // Several series from the same process
//!     let web = client.process("web");
//!     web.record("latency_ms", 12).await?;
//!     web.record("errors", 0).await?;
//!
//!     let snapshot = client.snapshot().await?;
//!     println!("{} series", snapshot.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;
pub mod error;
pub mod transport;

pub use client::{ProcessHandle, StatsClient, UPDATE_METHOD};
pub use error::ClientError;
pub use stats_store::{Sample, Snapshot};
pub use transport::{MockTransport, Transport};

#[cfg(feature = "http")]
pub use transport::HttpTransport;
