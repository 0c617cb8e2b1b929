//! Daily summaries and top-N rankings.

use crate::analyzers::types::{CanonicalRecord, DailySummary, RateRecord, StationKey, StationTotal};
use crate::analyzers::utility::Aggregation;
use crate::config::TimeWindow;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Output fields of a [`DailySummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryField {
    ExitsPerHour,
    Exits,
}

impl SummaryField {
    fn value(self, rate: &RateRecord) -> f64 {
        match self {
            SummaryField::ExitsPerHour => rate.exits_per_hour as f64,
            SummaryField::Exits => rate.exits as f64,
        }
    }
}

/// How each daily field is reduced over a station's rate records.
static DAILY_FIELDS: &[(SummaryField, Aggregation)] = &[
    (SummaryField::ExitsPerHour, Aggregation::Mean),
    (SummaryField::Exits, Aggregation::Sum),
];

fn summarize(station: &StationKey, date: NaiveDate, group: &[&RateRecord]) -> DailySummary {
    let mut summary = DailySummary {
        station: station.clone(),
        date,
        exits_per_hour: 0.0,
        exits: 0,
    };

    for &(field, aggregation) in DAILY_FIELDS {
        let values: Vec<f64> = group.iter().map(|r| field.value(r)).collect();
        let value = aggregation.apply(&values);
        match field {
            SummaryField::ExitsPerHour => summary.exits_per_hour = value,
            SummaryField::Exits => summary.exits = value as i64,
        }
    }

    summary
}

fn group_daily(rates: &[RateRecord]) -> Vec<DailySummary> {
    let mut groups: BTreeMap<(&StationKey, NaiveDate), Vec<&RateRecord>> = BTreeMap::new();
    for rate in rates {
        groups.entry((&rate.station, rate.date)).or_default().push(rate);
    }

    groups
        .into_iter()
        .map(|((station, date), group)| summarize(station, date, &group))
        .collect()
}

/// Summaries grouped by (station, date), ordered by station then date.
pub fn daily_by_station(rates: &[RateRecord]) -> Vec<DailySummary> {
    group_daily(rates)
}

/// Summaries grouped by (date, station), ordered by date then station.
pub fn daily_by_date(rates: &[RateRecord]) -> Vec<DailySummary> {
    let mut summaries = group_daily(rates);
    summaries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.station.cmp(&b.station)));
    summaries
}

/// Every daily summary of one station, in date order.
pub fn station_timeline(summaries: &[DailySummary], station: &StationKey) -> Vec<DailySummary> {
    let mut timeline: Vec<DailySummary> = summaries
        .iter()
        .filter(|s| &s.station == station)
        .cloned()
        .collect();
    timeline.sort_by_key(|s| s.date);
    timeline
}

/// The `n` stations with the highest mean hourly exit rate on `date`.
///
/// Ties are broken by station key ascending. A date with no data yields an
/// empty list.
pub fn busiest_on_date(summaries: &[DailySummary], date: NaiveDate, n: usize) -> Vec<DailySummary> {
    let mut day: Vec<DailySummary> = summaries
        .iter()
        .filter(|s| s.date == date)
        .cloned()
        .collect();
    debug!(%date, stations = day.len(), "Ranking stations for date");

    day.sort_by(|a, b| {
        b.exits_per_hour
            .total_cmp(&a.exits_per_hour)
            .then_with(|| a.station.cmp(&b.station))
    });
    day.truncate(n);
    day
}

/// Records whose hour of day falls in `[start_hour, end_hour)`.
pub fn filter_time_window(records: &[CanonicalRecord], window: &TimeWindow) -> Vec<CanonicalRecord> {
    records
        .iter()
        .filter(|r| window.contains(&r.timestamp))
        .cloned()
        .collect()
}

/// The `n` stations with the most exits over the whole of `records`.
///
/// Ties are broken by station key ascending.
pub fn busiest_stations(records: &[CanonicalRecord], n: usize) -> Vec<StationTotal> {
    let mut totals: HashMap<&StationKey, i64> = HashMap::new();
    for record in records {
        *totals.entry(&record.station).or_default() += record.exits;
    }

    let mut ranked: Vec<StationTotal> = totals
        .into_iter()
        .map(|(station, exits)| StationTotal {
            station: station.clone(),
            exits,
        })
        .collect();
    ranked.sort_by(|a, b| b.exits.cmp(&a.exits).then_with(|| a.station.cmp(&b.station)));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::testing::{at, record};

    fn rate(station: &str, hours: i64, exits: i64, exits_per_hour: i64) -> RateRecord {
        let timestamp = at(hours);
        RateRecord {
            station: StationKey::new(station, "1"),
            date: timestamp.date(),
            timestamp,
            exits,
            delta_hours: 4.0,
            exits_per_hour,
        }
    }

    fn day(offset: i64) -> NaiveDate {
        at(offset * 24).date()
    }

    #[test]
    fn test_daily_mean_and_sum() {
        let rates = vec![
            rate("A", 4, 400, 100),
            rate("A", 8, 800, 200),
            rate("A", 28, 40, 10),
        ];
        let daily = daily_by_station(&rates);

        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, day(0));
        assert_eq!(daily[0].exits_per_hour, 150.0);
        assert_eq!(daily[0].exits, 1200);
        assert_eq!(daily[1].date, day(1));
        assert_eq!(daily[1].exits, 40);
    }

    #[test]
    fn test_orderings() {
        let rates = vec![
            rate("B", 4, 1, 1),
            rate("A", 28, 1, 1),
            rate("A", 4, 1, 1),
            rate("B", 28, 1, 1),
        ];

        let by_station: Vec<_> = daily_by_station(&rates)
            .into_iter()
            .map(|s| (s.station.name, s.date))
            .collect();
        assert_eq!(
            by_station,
            vec![
                ("A".to_string(), day(0)),
                ("A".to_string(), day(1)),
                ("B".to_string(), day(0)),
                ("B".to_string(), day(1)),
            ]
        );

        let by_date: Vec<_> = daily_by_date(&rates)
            .into_iter()
            .map(|s| (s.date, s.station.name))
            .collect();
        assert_eq!(
            by_date,
            vec![
                (day(0), "A".to_string()),
                (day(0), "B".to_string()),
                (day(1), "A".to_string()),
                (day(1), "B".to_string()),
            ]
        );
    }

    #[test]
    fn test_station_timeline() {
        let rates = vec![rate("A", 28, 1, 5), rate("B", 4, 1, 1), rate("A", 4, 1, 7)];
        let daily = daily_by_station(&rates);

        let timeline = station_timeline(&daily, &StationKey::new("A", "1"));
        let rates: Vec<_> = timeline.iter().map(|s| s.exits_per_hour).collect();
        assert_eq!(rates, vec![7.0, 5.0]);

        assert!(station_timeline(&daily, &StationKey::new("Z", "1")).is_empty());
    }

    #[test]
    fn test_busiest_on_date_ranks_and_truncates() {
        let rates = vec![
            rate("A", 4, 1, 50),
            rate("B", 4, 1, 300),
            rate("C", 4, 1, 100),
            rate("D", 28, 1, 999),
        ];
        let daily = daily_by_date(&rates);

        let top: Vec<_> = busiest_on_date(&daily, day(0), 2)
            .into_iter()
            .map(|s| s.station.name)
            .collect();
        assert_eq!(top, vec!["B", "C"]);
    }

    #[test]
    fn test_busiest_on_date_ties_by_station() {
        let rates = vec![
            rate("C", 4, 1, 100),
            rate("A", 4, 1, 100),
            rate("B", 4, 1, 100),
        ];
        let mut reversed = rates.clone();
        reversed.reverse();

        let top = busiest_on_date(&daily_by_date(&rates), day(0), 10);
        let top_reversed = busiest_on_date(&daily_by_date(&reversed), day(0), 10);

        let names: Vec<_> = top.iter().map(|s| s.station.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(top, top_reversed);
    }

    #[test]
    fn test_busiest_on_missing_date_is_empty() {
        let daily = daily_by_date(&[rate("A", 4, 1, 1)]);
        assert!(busiest_on_date(&daily, day(5), 10).is_empty());
    }

    #[test]
    fn test_time_window_is_half_open() {
        let records = vec![record("A", 11, 1), record("A", 12, 2), record("A", 20, 4)];
        let filtered = filter_time_window(&records, &TimeWindow::default());

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].exits, 2);
    }

    #[test]
    fn test_busiest_stations_sums_whole_batch() {
        let records = vec![
            record("A", 12, 10),
            record("A", 36, 10), // next day
            record("B", 13, 15),
            record("C", 14, 20),
        ];
        let top = busiest_stations(&records, 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].station.name, "A");
        assert_eq!(top[0].exits, 20);
        assert_eq!(top[1].station.name, "C");
    }

    #[test]
    fn test_busiest_stations_ties_by_station() {
        let records = vec![record("B", 12, 10), record("A", 12, 10), record("C", 12, 5)];
        let names: Vec<_> = busiest_stations(&records, 3)
            .into_iter()
            .map(|t| t.station.name)
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }
}
