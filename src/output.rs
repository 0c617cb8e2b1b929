//! Output formatting and export for analysis results.
//!
//! Rows can be listed with a row limit, logged as JSON, or exported to CSV.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Display;
use tracing::{debug, info};

use csv::WriterBuilder;
use std::fs::File;

/// Caller-side display settings.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub max_rows: usize,
    /// Log every row as one pretty JSON document instead of a table.
    pub json: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            max_rows: 100,
            json: false,
        }
    }
}

/// Logs rows as pretty-printed JSON and returns the rendered document.
pub fn print_json<T: Serialize>(rows: &[T]) -> Result<String> {
    let rendered = serde_json::to_string_pretty(rows)?;
    info!("{}", rendered);
    Ok(rendered)
}

/// Logs rows in the format chosen by `options`.
///
/// Returns the number of rows shown; JSON output is never truncated.
pub fn report_rows<T>(title: &str, rows: &[T], options: &ReportOptions) -> Result<usize>
where
    T: Display + Serialize,
{
    if options.json {
        print_json(rows)?;
        Ok(rows.len())
    } else {
        Ok(print_rows(title, rows, options))
    }
}

/// Logs at most `options.max_rows` rows, one per line, numbered from 1.
///
/// Returns the number of rows printed.
pub fn print_rows<T: Display>(title: &str, rows: &[T], options: &ReportOptions) -> usize {
    info!(total = rows.len(), "{}", title);
    let shown = rows.len().min(options.max_rows);
    for (rank, row) in rows.iter().take(shown).enumerate() {
        info!("{:>4}. {}", rank + 1, row);
    }
    if shown < rows.len() {
        info!(hidden = rows.len() - shown, "Output truncated");
    }
    shown
}

/// Writes rows to a CSV file with a header, replacing any existing file.
pub fn write_csv<T: Serialize>(path: &str, rows: &[T]) -> Result<()> {
    debug!(path, rows = rows.len(), "Writing CSV");

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
