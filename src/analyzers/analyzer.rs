use crate::analyzers::aggregate::aggregate_turnstiles;
use crate::analyzers::normalize::normalize_counters;
use crate::analyzers::rank::{
    busiest_on_date, busiest_stations, daily_by_date, daily_by_station, filter_time_window,
    station_timeline,
};
use crate::analyzers::rate::hourly_exits;
use crate::analyzers::shape::shape_rows;
use crate::analyzers::types::{
    CanonicalRecord, DailySummary, FaultAudit, RateRecord, RawReading, StationKey, StationTotal,
};
use crate::config::{PipelineConfig, TimeWindow};
use chrono::NaiveDate;
use tracing::{info, warn};

/// Every derived collection of one pipeline run.
#[derive(Debug)]
pub struct Analysis {
    pub records: Vec<CanonicalRecord>,
    pub rates: Vec<RateRecord>,
    pub daily_by_station: Vec<DailySummary>,
    pub daily_by_date: Vec<DailySummary>,
    pub audit: FaultAudit,
}

/// Runs the full pipeline over an in-memory batch of readings.
pub fn analyze(readings: &[RawReading], config: &PipelineConfig) -> Analysis {
    info!(readings = readings.len(), "Starting analysis");

    let deltas = normalize_counters(readings);
    let shaped = shape_rows(&deltas, &config.valid_range);
    if shaped.audit.faults() > 0 {
        warn!(
            faults = shaped.audit.faults(),
            below_range = shaped.audit.below_range,
            above_range = shaped.audit.above_range,
            "Dropped counter faults"
        );
    }

    let intervals = aggregate_turnstiles(&shaped.records);
    let rates = hourly_exits(&intervals, config.min_interval_hours);

    let analysis = Analysis {
        daily_by_station: daily_by_station(&rates),
        daily_by_date: daily_by_date(&rates),
        records: shaped.records,
        rates,
        audit: shaped.audit,
    };

    info!(
        records = analysis.records.len(),
        rates = analysis.rates.len(),
        station_days = analysis.daily_by_station.len(),
        "Analysis complete"
    );
    analysis
}

impl Analysis {
    /// Daily summaries of one station across all dates.
    pub fn timeline(&self, station: &StationKey) -> Vec<DailySummary> {
        station_timeline(&self.daily_by_station, station)
    }

    /// Top `n` stations by mean hourly exit rate on `date`.
    pub fn busiest_on(&self, date: NaiveDate, n: usize) -> Vec<DailySummary> {
        busiest_on_date(&self.daily_by_date, date, n)
    }

    /// Top `n` stations by total exits inside `window`, across the whole batch.
    pub fn busiest_in_window(&self, window: &TimeWindow, n: usize) -> Vec<StationTotal> {
        busiest_stations(&filter_time_window(&self.records, window), n)
    }
}
