use crate::analyzers::types::{DeltaReading, RawReading, TurnstileId};
use std::collections::BTreeMap;
use tracing::debug;

/// Converts cumulative counters into per-interval deltas.
///
/// Readings are grouped by turnstile and ordered by timestamp inside each
/// group before differencing, so the input may interleave turnstiles freely.
/// The first reading of every turnstile carries no delta. Negative deltas are
/// passed through untouched.
#[tracing::instrument(skip_all, fields(readings = readings.len()))]
pub fn normalize_counters(readings: &[RawReading]) -> Vec<DeltaReading> {
    let mut by_turnstile: BTreeMap<&TurnstileId, Vec<&RawReading>> = BTreeMap::new();
    for reading in readings {
        by_turnstile
            .entry(&reading.turnstile)
            .or_default()
            .push(reading);
    }
    debug!(turnstiles = by_turnstile.len(), "Grouped readings");

    let mut deltas = Vec::with_capacity(readings.len());
    for (_, mut group) in by_turnstile {
        group.sort_by_key(|r| r.timestamp);

        let mut previous: Option<&RawReading> = None;
        for reading in group {
            // Saturates on overflow; the row shaper then rejects the extreme
            // delta as a fault.
            deltas.push(DeltaReading {
                reading: reading.clone(),
                delta_entries: previous.map(|p| reading.entries.saturating_sub(p.entries)),
                delta_exits: previous.map(|p| reading.exits.saturating_sub(p.exits)),
            });
            previous = Some(reading);
        }
    }

    deltas
}
