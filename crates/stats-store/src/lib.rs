//! # stats-store
//!
//! Bounded in-memory time-series store for the stats aggregator.
//!
//! Features:
//! - One series per `(process, series)` pair, created on first sample
//! - Retention window of the most recent `max_points` points per series
//! - Bucket timestamps in 100ms ticks since store creation
//! - Consistent point-in-time snapshots with JSON export

#![warn(missing_docs)]
#![warn(clippy::all)]

mod clock;
mod sample;
mod snapshot;
mod store;

pub use clock::{bucket_timestamp, Clock, ManualClock, MonotonicClock, TICK};
pub use sample::{series_key, Sample, SERIES_KEY_SEPARATOR};
pub use snapshot::{DataPoint, Snapshot};
pub use store::{TimeSeriesStore, DEFAULT_MAX_POINTS};
