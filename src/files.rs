//! Discovery of weekly turnstile files.
//!
//! Files are published every Saturday as `turnstile_YYMMDD.txt`.

use chrono::{Datelike, Duration, NaiveDate};
use std::path::{Path, PathBuf};

/// Returns the file paths for every Saturday in `[start, end)`.
pub fn weekly_file_names(dir: &Path, start: NaiveDate, end: NaiveDate) -> Vec<PathBuf> {
    let days_to_saturday = (5 + 7 - start.weekday().num_days_from_monday() as i64) % 7;
    let mut current = start + Duration::days(days_to_saturday);

    let mut files = Vec::new();
    while current < end {
        files.push(dir.join(format!("turnstile_{}.txt", current.format("%y%m%d"))));
        current += Duration::days(7);
    }
    files
}
