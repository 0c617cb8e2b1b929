//! Builders shared by the analyzer tests.

use crate::analyzers::types::{CanonicalRecord, RawReading, StationKey, TurnstileId};
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Midnight of 04/17/2015 plus `hours`.
pub fn at(hours: i64) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2015, 4, 17)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        + Duration::hours(hours)
}

pub fn reading(scp: &str, station: &str, lines: &str, hours: i64, entries: i64, exits: i64) -> RawReading {
    let timestamp = at(hours);
    RawReading {
        turnstile: TurnstileId {
            control_area: "A002".to_string(),
            unit: "R051".to_string(),
            scp: scp.to_string(),
            station: station.to_string(),
        },
        line_name: lines.to_string(),
        division: "BMT".to_string(),
        date: timestamp.format("%m/%d/%Y").to_string(),
        time: timestamp.format("%H:%M:%S").to_string(),
        timestamp,
        description: "REGULAR".to_string(),
        entries,
        exits,
    }
}

pub fn record(station: &str, hours: i64, exits: i64) -> CanonicalRecord {
    let timestamp = at(hours);
    CanonicalRecord {
        station: StationKey::new(station, "1"),
        timestamp,
        date: timestamp.format("%m/%d/%Y").to_string(),
        time: timestamp.format("%H:%M:%S").to_string(),
        entries: 0,
        exits,
    }
}
