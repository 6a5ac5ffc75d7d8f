//! Store behaviour under concurrency and randomized input

use proptest::prelude::*;
use stats_store::{DataPoint, ManualClock, Snapshot, TimeSeriesStore};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_appends_below_cap_lose_nothing() {
    const WRITERS: i64 = 8;
    const PER_WRITER: i64 = 500;

    let store = Arc::new(TimeSeriesStore::new((WRITERS * PER_WRITER) as usize));

    let handles: Vec<_> = (0..WRITERS)
        .map(|w| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..PER_WRITER {
                    store.append("proc", "shared", w * PER_WRITER + i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let points = store.series("proc", "shared").unwrap();
    assert_eq!(points.len(), (WRITERS * PER_WRITER) as usize);

    let unique: HashSet<i64> = points.iter().map(DataPoint::value).collect();
    assert_eq!(unique.len(), points.len(), "duplicated points");

    // Each writer's own values must appear in the order it wrote them.
    for w in 0..WRITERS {
        let mine: Vec<i64> = points
            .iter()
            .map(DataPoint::value)
            .filter(|v| v / PER_WRITER == w)
            .collect();
        let expected: Vec<i64> = (0..PER_WRITER).map(|i| w * PER_WRITER + i).collect();
        assert_eq!(mine, expected);
    }
}

#[test]
fn test_concurrent_appends_above_cap_are_bounded() {
    const WRITERS: usize = 6;
    const PER_WRITER: usize = 1_000;
    const MAX: usize = 60;

    let store = Arc::new(TimeSeriesStore::new(MAX));

    let handles: Vec<_> = (0..WRITERS)
        .map(|w| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..PER_WRITER {
                    store.append("proc", "hot", (w * PER_WRITER + i) as i64);
                    if i % 100 == 0 {
                        let snapshot = store.snapshot();
                        assert!(snapshot.get("proc hot").unwrap().len() <= MAX);
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let points = store.series("proc", "hot").unwrap();
    assert_eq!(points.len(), MAX);
    assert!(points.windows(2).all(|w| w[0].timestamp() <= w[1].timestamp()));
}

#[test]
fn test_concurrent_readers_never_see_torn_series() {
    let store = Arc::new(TimeSeriesStore::new(1_000));

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 0..2_000 {
                store.append("p", "a", i);
                store.append("p", "b", i);
            }
        })
    };

    let reader = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for _ in 0..200 {
                let snapshot = store.snapshot();
                if let Some(points) = snapshot.get("p a") {
                    let values: Vec<i64> = points.iter().map(DataPoint::value).collect();
                    assert!(values.windows(2).all(|w| w[1] == w[0] + 1));
                }
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn test_many_keys_under_contention() {
    let store = Arc::new(TimeSeriesStore::new(3));

    let handles: Vec<_> = (0..4)
        .map(|w| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..50 {
                    store.append(&format!("proc{w}"), &format!("series{}", i % 5), i);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = store.snapshot();
    assert_eq!(snapshot.len(), 20);
    assert!(snapshot.iter().all(|(_, points)| points.len() == 3));
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_length_is_min_of_appends_and_cap(max in 1usize..50, n in 0usize..200) {
        let store = TimeSeriesStore::with_clock(max, Arc::new(ManualClock::new()));
        for i in 0..n {
            store.append("p", "s", i as i64);
        }
        let len = store.series("p", "s").map(|p| p.len()).unwrap_or(0);
        prop_assert_eq!(len, n.min(max));
    }

    #[test]
    fn prop_keeps_most_recent_in_order(
        max in 1usize..20,
        values in proptest::collection::vec(any::<i64>(), 1..100),
    ) {
        let clock = Arc::new(ManualClock::new());
        let store = TimeSeriesStore::with_clock(max, clock.clone());
        for (i, v) in values.iter().enumerate() {
            if i % 3 == 0 {
                clock.advance_ticks(1);
            }
            store.append("p", "s", *v);
        }

        let points = store.series("p", "s").unwrap();
        let kept: Vec<i64> = points.iter().map(DataPoint::value).collect();
        let start = values.len().saturating_sub(max);
        prop_assert_eq!(kept, values[start..].to_vec());
        prop_assert!(points.windows(2).all(|w| w[0].timestamp() <= w[1].timestamp()));
    }

    #[test]
    fn prop_snapshot_json_round_trips(
        entries in proptest::collection::vec(("[a-z]{1,4}", "[a-z]{1,4}", any::<i64>()), 0..40),
    ) {
        let clock = Arc::new(ManualClock::new());
        let store = TimeSeriesStore::with_clock(8, clock.clone());
        for (process, series, value) in &entries {
            clock.advance_ticks(1);
            store.append(process, series, *value);
        }

        let snapshot = store.snapshot();
        let json = snapshot.to_json().unwrap();
        prop_assert_eq!(Snapshot::from_json(&json).unwrap(), snapshot);
    }
}
