//! Snapshot and JSON export

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One `(bucket_timestamp, value)` point, serialized as a two-element array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPoint(pub i64, pub i64);

impl DataPoint {
    /// Bucket timestamp of the point
    pub fn timestamp(&self) -> i64 {
        self.0
    }

    /// Sampled value
    pub fn value(&self) -> i64 {
        self.1
    }
}

/// Point-in-time copy of every series in a store
///
/// Serializes as a JSON object mapping series key to an oldest-first array
/// of `[bucket_timestamp, value]` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    series: BTreeMap<String, Vec<DataPoint>>,
}

impl Snapshot {
    /// Wrap an already collected series map
    pub fn from_series(series: BTreeMap<String, Vec<DataPoint>>) -> Self {
        Self { series }
    }

    /// Points for one series key
    pub fn get(&self, key: &str) -> Option<&[DataPoint]> {
        self.series.get(key).map(Vec::as_slice)
    }

    /// Number of series keys
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether the snapshot holds no series
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Iterate series keys and their points in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DataPoint])> {
        self.series.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Export snapshot as compact JSON bytes
    pub fn to_json_vec(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Export snapshot as JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a snapshot previously exported as JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
