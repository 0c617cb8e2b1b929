//! Data types used by the rating pipeline.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::fmt;

/// Identity of one physical turnstile.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TurnstileId {
    pub control_area: String,
    pub unit: String,
    pub scp: String,
    pub station: String,
}

/// A single row from a raw turnstile file, with its instant already parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReading {
    pub turnstile: TurnstileId,
    pub line_name: String,
    pub division: String,
    pub date: String,
    pub time: String,
    pub timestamp: NaiveDateTime,
    pub description: String,
    /// Cumulative counters as reported by the meter.
    pub entries: i64,
    pub exits: i64,
}

/// A raw reading paired with the change since the previous reading of the
/// same turnstile. `None` marks the first reading of a turnstile.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaReading {
    pub reading: RawReading,
    pub delta_entries: Option<i64>,
    pub delta_exits: Option<i64>,
}

/// Logical station: name plus the line designators with their characters
/// sorted, so `"NQR"` and `"RQN"` are the same station.
///
/// Ordering is lexicographic on name then lines, and is the tie-break used
/// by every ranking.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StationKey {
    pub name: String,
    pub lines: String,
}

impl StationKey {
    pub fn new(name: &str, lines: &str) -> Self {
        let mut chars: Vec<char> = lines.chars().collect();
        chars.sort_unstable();
        Self {
            name: name.to_string(),
            lines: chars.into_iter().collect(),
        }
    }
}

impl fmt::Display for StationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.lines)
    }
}

// Serialized as one column so the key survives flat CSV output.
impl Serialize for StationKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Why a counter delta was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultReason {
    /// Delta under the range minimum; with the default range, a counter that
    /// went backwards (reset or rollover).
    BelowRange(i64),
    /// Delta at or over the range maximum: more than a turnstile can
    /// plausibly turn in one interval.
    AboveRange(i64),
}

/// Classification of a single counter delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterOutcome {
    Valid(i64),
    Fault(FaultReason),
}

/// One validated turnstile interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    pub station: StationKey,
    pub timestamp: NaiveDateTime,
    pub date: String,
    pub time: String,
    pub entries: i64,
    pub exits: i64,
}

/// Sum of all turnstiles of a station at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationInterval {
    pub station: StationKey,
    pub date: NaiveDate,
    pub timestamp: NaiveDateTime,
    pub entries: i64,
    pub exits: i64,
}

/// A station interval normalized to an hourly exit rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateRecord {
    pub station: StationKey,
    pub date: NaiveDate,
    pub timestamp: NaiveDateTime,
    pub exits: i64,
    pub delta_hours: f64,
    pub exits_per_hour: i64,
}

/// Per (station, date) aggregate of hourly rates and exits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub station: StationKey,
    pub date: NaiveDate,
    pub exits_per_hour: f64,
    pub exits: i64,
}

impl fmt::Display for DailySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}  {:>10.1} exits/h  {:>8} exits",
            self.date, self.station, self.exits_per_hour, self.exits
        )
    }
}

/// Total exits of one station over a filtered batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationTotal {
    pub station: StationKey,
    pub exits: i64,
}

impl fmt::Display for StationTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {:>10} exits", self.station, self.exits)
    }
}

/// Counts of readings the row shaper dropped, by cause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FaultAudit {
    pub first_readings: usize,
    pub below_range: usize,
    pub above_range: usize,
}

impl FaultAudit {
    /// Records dropped because of a counter fault (first readings excluded).
    pub fn faults(&self) -> usize {
        self.below_range + self.above_range
    }

    pub fn record(&mut self, reason: FaultReason) {
        match reason {
            FaultReason::BelowRange(_) => self.below_range += 1,
            FaultReason::AboveRange(_) => self.above_range += 1,
        }
    }
}
