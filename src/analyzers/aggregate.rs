use crate::analyzers::types::{CanonicalRecord, StationInterval, StationKey};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use tracing::info;

/// Sums every turnstile of a station at each recorded timestamp.
///
/// Returns one [`StationInterval`] per distinct (station, timestamp), sorted
/// by timestamp and then by station.
#[tracing::instrument(skip_all, fields(records = records.len()))]
pub fn aggregate_turnstiles(records: &[CanonicalRecord]) -> Vec<StationInterval> {
    let mut totals: BTreeMap<(NaiveDateTime, &StationKey), (i64, i64)> = BTreeMap::new();

    for record in records {
        let total = totals
            .entry((record.timestamp, &record.station))
            .or_default();
        total.0 += record.entries;
        total.1 += record.exits;
    }

    let intervals: Vec<StationInterval> = totals
        .into_iter()
        .map(|((timestamp, station), (entries, exits))| StationInterval {
            station: station.clone(),
            date: timestamp.date(),
            timestamp,
            entries,
            exits,
        })
        .collect();

    info!(intervals = intervals.len(), "Aggregated turnstiles");
    intervals
}
