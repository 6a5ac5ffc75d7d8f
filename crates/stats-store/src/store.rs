//! Time-series store implementation

use crate::clock::{bucket_timestamp, Clock, MonotonicClock};
use crate::sample::{series_key, Sample};
use crate::snapshot::{DataPoint, Snapshot};
use parking_lot::Mutex;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Default number of points retained per series
pub const DEFAULT_MAX_POINTS: usize = 60;

/// Thread-safe store of bounded time series
///
/// A single mutex guards the whole key space, so every append and every
/// snapshot is serialized against all others.
pub struct TimeSeriesStore {
    /// Series key to oldest-first points
    series: Mutex<HashMap<String, VecDeque<DataPoint>>>,
    /// Retention window per series
    max_points: usize,
    /// Epoch for bucket timestamps
    clock: Arc<dyn Clock>,
}

impl TimeSeriesStore {
    /// Create a store whose epoch is now
    pub fn new(max_points: usize) -> Self {
        Self::with_clock(max_points, Arc::new(MonotonicClock::new()))
    }

    /// Create a store reading elapsed time from `clock`
    pub fn with_clock(max_points: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            series: Mutex::new(HashMap::new()),
            max_points,
            clock,
        }
    }

    /// Retention window per series
    pub fn max_points(&self) -> usize {
        self.max_points
    }

    /// Append a value to the series for `process`/`series`
    pub fn append(&self, process: &str, series: &str, value: i64) {
        let key = series_key(process, series);
        let mut map = self.series.lock();
        // Timestamp under the lock keeps arrival order and time order aligned.
        let timestamp = bucket_timestamp(self.clock.elapsed());

        let (points, created) = match map.entry(key) {
            Entry::Occupied(entry) => (entry.into_mut(), false),
            Entry::Vacant(entry) => (entry.insert(VecDeque::new()), true),
        };
        points.push_back(DataPoint(timestamp, value));
        while points.len() > self.max_points {
            points.pop_front();
        }
        let series_count = map.len();
        drop(map);

        if created {
            tracing::debug!(process, series, series_count, "new series");
        }
    }

    /// Append a whole sample
    pub fn append_sample(&self, sample: &Sample) {
        self.append(&sample.process, &sample.series, sample.value);
    }

    /// Copy of every series at a single point in time
    pub fn snapshot(&self) -> Snapshot {
        let map = self.series.lock();
        let series = map
            .iter()
            .map(|(key, points)| (key.clone(), points.iter().copied().collect()))
            .collect();
        drop(map);
        Snapshot::from_series(series)
    }

    /// Copy of one series, if it has received any sample
    pub fn series(&self, process: &str, series: &str) -> Option<Vec<DataPoint>> {
        self.series
            .lock()
            .get(&series_key(process, series))
            .map(|points| points.iter().copied().collect())
    }

    /// Number of known series keys
    pub fn len(&self) -> usize {
        self.series.lock().len()
    }

    /// Whether no sample has been appended yet
    pub fn is_empty(&self) -> bool {
        self.series.lock().is_empty()
    }
}

impl Default for TimeSeriesStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_POINTS)
    }
}

impl std::fmt::Debug for TimeSeriesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeSeriesStore")
            .field("max_points", &self.max_points)
            .field("series", &self.len())
            .finish()
    }
}
