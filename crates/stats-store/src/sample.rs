//! Ingested samples and series keys

use serde::{Deserialize, Serialize};

/// Separator placed between process and series names in a series key
pub const SERIES_KEY_SEPARATOR: &str = " ";

/// One ingested `(process, series, value)` triple
///
/// Field names are accepted capitalised as well, which is how existing
/// instrumented clients encode them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Name of the reporting process
    #[serde(alias = "Process")]
    pub process: String,
    /// Name of the series within that process
    #[serde(alias = "Series")]
    pub series: String,
    /// Sampled value
    #[serde(alias = "Value")]
    pub value: i64,
}

impl Sample {
    /// Create a new sample
    pub fn new(process: impl Into<String>, series: impl Into<String>, value: i64) -> Self {
        Self {
            process: process.into(),
            series: series.into(),
            value,
        }
    }

    /// Series key this sample is stored under
    pub fn key(&self) -> String {
        series_key(&self.process, &self.series)
    }
}

/// Derive the series key for a process/series pair
pub fn series_key(process: &str, series: &str) -> String {
    let mut key = String::with_capacity(process.len() + SERIES_KEY_SEPARATOR.len() + series.len());
    key.push_str(process);
    key.push_str(SERIES_KEY_SEPARATOR);
    key.push_str(series);
    key
}
