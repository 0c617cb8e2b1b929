//! CSV reader for raw turnstile files.
//!
//! Columns, in order: control area, unit, scp, station, line name, division,
//! date (`MM/DD/YYYY`), time (`HH:MM:SS`), description, cumulative entries,
//! cumulative exits. The first line is a header.

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::analyzers::types::{RawReading, TurnstileId};
use crate::error::IngestError;

const COLUMNS: usize = 11;
const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// Parses a date and a 24-hour time into a single instant.
pub fn parse_timestamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&format!("{date} {time}"), TIMESTAMP_FORMAT).ok()
}

/// Reads every reading from one file.
///
/// # Errors
///
/// Fails on the first row whose timestamp or counters do not parse.
pub fn read_file(path: &Path) -> Result<Vec<RawReading>, IngestError> {
    let origin = path.display().to_string();
    let file = File::open(path).map_err(|error| IngestError::Io {
        path: origin.clone(),
        error,
    })?;
    parse_reader(file, &origin)
}

/// Reads and concatenates several files in the given order.
pub fn read_batch<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<RawReading>, IngestError> {
    let mut readings = Vec::new();
    for path in paths {
        let mut rows = read_file(path.as_ref())?;
        info!(path = %path.as_ref().display(), rows = rows.len(), "File read");
        readings.append(&mut rows);
    }
    Ok(readings)
}

/// Parses readings from any CSV source. `origin` names the source in errors.
pub fn parse_reader<R: Read>(reader: R, origin: &str) -> Result<Vec<RawReading>, IngestError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut readings = Vec::new();
    let mut blank_counters = 0usize;

    for result in rdr.records() {
        let record = result.map_err(|error| IngestError::Csv {
            origin: origin.to_string(),
            error,
        })?;
        match parse_record(&record, origin)? {
            Some(reading) => readings.push(reading),
            None => blank_counters += 1,
        }
    }

    if blank_counters > 0 {
        debug!(origin, blank_counters, "Skipped rows with blank counters");
    }

    Ok(readings)
}

/// Returns `None` for rows whose counters are blank.
fn parse_record(record: &StringRecord, origin: &str) -> Result<Option<RawReading>, IngestError> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);
    let malformed = |field: &'static str, value: &str| IngestError::MalformedRow {
        origin: origin.to_string(),
        line,
        field,
        value: value.to_string(),
    };

    if record.len() != COLUMNS {
        return Err(malformed("columns", &record.len().to_string()));
    }
    let field = |i: usize| record.get(i).unwrap_or_default();

    let (entries, exits) = (field(9), field(10));
    if entries.is_empty() || exits.is_empty() {
        return Ok(None);
    }
    // Cumulative counters never go below zero.
    let entries: i64 = entries
        .parse()
        .ok()
        .filter(|v| *v >= 0)
        .ok_or_else(|| malformed("entries", entries))?;
    let exits: i64 = exits
        .parse()
        .ok()
        .filter(|v| *v >= 0)
        .ok_or_else(|| malformed("exits", exits))?;

    let (date, time) = (field(6), field(7));
    let timestamp =
        parse_timestamp(date, time).ok_or_else(|| malformed("date/time", &format!("{date} {time}")))?;

    Ok(Some(RawReading {
        turnstile: TurnstileId {
            control_area: field(0).to_string(),
            unit: field(1).to_string(),
            scp: field(2).to_string(),
            station: field(3).to_string(),
        },
        line_name: field(4).to_string(),
        division: field(5).to_string(),
        date: date.to_string(),
        time: time.to_string(),
        timestamp,
        description: field(8).to_string(),
        entries,
        exits,
    }))
}
