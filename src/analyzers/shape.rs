use crate::analyzers::types::{
    CanonicalRecord, CounterOutcome, DeltaReading, FaultAudit, FaultReason, StationKey,
};
use crate::config::ValidRange;
use tracing::{debug, info};

/// Output of [`shape_rows`]: the surviving records and what was dropped.
#[derive(Debug, Default)]
pub struct Shaped {
    pub records: Vec<CanonicalRecord>,
    pub audit: FaultAudit,
}

/// Classifies a counter delta against the half-open range `[min, max)`.
pub fn classify(delta: i64, range: &ValidRange) -> CounterOutcome {
    if delta < range.min {
        CounterOutcome::Fault(FaultReason::BelowRange(delta))
    } else if delta >= range.max {
        CounterOutcome::Fault(FaultReason::AboveRange(delta))
    } else {
        CounterOutcome::Valid(delta)
    }
}

/// Projects delta readings into canonical per-station records.
///
/// First readings (no delta) and readings with a faulted entries or exits
/// delta are dropped and tallied in the returned [`FaultAudit`]. A reading
/// faulted on both counters is counted once, by its entries fault.
#[tracing::instrument(skip_all, fields(deltas = deltas.len()))]
pub fn shape_rows(deltas: &[DeltaReading], range: &ValidRange) -> Shaped {
    let mut shaped = Shaped::default();

    for delta in deltas {
        let (Some(entries), Some(exits)) = (delta.delta_entries, delta.delta_exits) else {
            shaped.audit.first_readings += 1;
            continue;
        };

        let (entries, exits) = match (classify(entries, range), classify(exits, range)) {
            (CounterOutcome::Valid(entries), CounterOutcome::Valid(exits)) => (entries, exits),
            (CounterOutcome::Fault(reason), _) | (_, CounterOutcome::Fault(reason)) => {
                debug!(
                    turnstile = ?delta.reading.turnstile,
                    timestamp = %delta.reading.timestamp,
                    ?reason,
                    "Dropping counter fault"
                );
                shaped.audit.record(reason);
                continue;
            }
        };

        let reading = &delta.reading;
        shaped.records.push(CanonicalRecord {
            station: StationKey::new(&reading.turnstile.station, &reading.line_name),
            timestamp: reading.timestamp,
            date: reading.date.clone(),
            time: reading.time.clone(),
            entries,
            exits,
        });
    }

    info!(
        kept = shaped.records.len(),
        first_readings = shaped.audit.first_readings,
        below_range = shaped.audit.below_range,
        above_range = shaped.audit.above_range,
        "Shaped rows"
    );
    shaped
}
