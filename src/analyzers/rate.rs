use crate::analyzers::types::{RateRecord, StationInterval, StationKey};
use std::collections::BTreeMap;
use tracing::{debug, info};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Derives an hourly exit rate for each station interval.
///
/// Elapsed time is measured against the previous interval of the same
/// station, never against a neighbouring station's row. The first interval of
/// every station has no predecessor and is dropped, as is any interval of
/// `min_interval_hours` or less. Rates are truncated toward zero.
///
/// Output is ordered by timestamp, then station.
#[tracing::instrument(skip_all, fields(intervals = intervals.len(), min_interval_hours = min_interval_hours))]
pub fn hourly_exits(intervals: &[StationInterval], min_interval_hours: f64) -> Vec<RateRecord> {
    let mut by_station: BTreeMap<&StationKey, Vec<&StationInterval>> = BTreeMap::new();
    for interval in intervals {
        by_station
            .entry(&interval.station)
            .or_default()
            .push(interval);
    }

    let mut rates = Vec::new();
    let mut short_intervals = 0usize;

    for (_, mut series) in by_station {
        series.sort_by_key(|i| i.timestamp);

        for pair in series.windows(2) {
            let (previous, current) = (pair[0], pair[1]);
            let delta_hours =
                (current.timestamp - previous.timestamp).num_seconds() as f64 / SECONDS_PER_HOUR;

            if delta_hours <= min_interval_hours {
                short_intervals += 1;
                continue;
            }

            rates.push(RateRecord {
                station: current.station.clone(),
                date: current.date,
                timestamp: current.timestamp,
                exits: current.exits,
                delta_hours,
                exits_per_hour: (current.exits as f64 / delta_hours) as i64,
            });
        }
    }

    rates.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.station.cmp(&b.station))
    });

    debug!(short_intervals, "Discarded short intervals");
    info!(rates = rates.len(), "Computed hourly exit rates");
    rates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::testing::at;

    fn interval(station: &str, hours: i64, exits: i64) -> StationInterval {
        let timestamp = at(hours);
        StationInterval {
            station: StationKey::new(station, "1"),
            date: timestamp.date(),
            timestamp,
            entries: 0,
            exits,
        }
    }

    #[test]
    fn test_rate_over_two_hours() {
        let rates = hourly_exits(&[interval("A", 0, 0), interval("A", 2, 120)], 1.0);
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].delta_hours, 2.0);
        assert_eq!(rates[0].exits_per_hour, 60);
    }

    #[test]
    fn test_first_interval_of_each_station_dropped() {
        let rates = hourly_exits(&[interval("A", 0, 50), interval("B", 4, 80)], 1.0);
        assert!(rates.is_empty());
    }

    #[test]
    fn test_short_intervals_discarded() {
        let mut minute_later = interval("A", 1, 30);
        minute_later.timestamp += chrono::Duration::minutes(30);
        let rates = hourly_exits(
            &[
                interval("A", 0, 0),
                interval("A", 1, 100), // exactly one hour
                minute_later,          // half an hour
                interval("A", 5, 350),
            ],
            1.0,
        );

        assert_eq!(rates.len(), 1);
        assert!(rates.iter().all(|r| r.delta_hours > 1.0));
        assert_eq!(rates[0].delta_hours, 3.5);
        assert_eq!(rates[0].exits_per_hour, 100);
    }

    #[test]
    fn test_rate_truncates() {
        let rates = hourly_exits(&[interval("A", 0, 0), interval("A", 3, 100)], 1.0);
        assert_eq!(rates[0].exits_per_hour, 33);
    }

    #[test]
    fn test_adjacency_is_per_station() {
        // Globally sorted, B's 4h row sits right after A's 3h row; its
        // predecessor must still be B's own 0h row.
        let rates = hourly_exits(
            &[
                interval("A", 0, 0),
                interval("B", 0, 0),
                interval("A", 3, 300),
                interval("B", 4, 400),
            ],
            1.0,
        );

        let b = rates.iter().find(|r| r.station.name == "B").unwrap();
        assert_eq!(b.delta_hours, 4.0);
        assert_eq!(b.exits_per_hour, 100);
        let a = rates.iter().find(|r| r.station.name == "A").unwrap();
        assert_eq!(a.delta_hours, 3.0);
    }

    #[test]
    fn test_irregular_spacing() {
        let rates = hourly_exits(
            &[
                interval("A", 0, 0),
                interval("A", 4, 400),
                interval("A", 12, 400),
            ],
            1.0,
        );
        let per_hour: Vec<_> = rates.iter().map(|r| r.exits_per_hour).collect();
        assert_eq!(per_hour, vec![100, 50]);
    }
}
