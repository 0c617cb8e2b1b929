//! Pipeline configuration.
//!
//! Stored as a JSON object on disk; every field is optional:
//! ```json
//! {
//!   "time_window": { "start_hour": 12, "end_hour": 20 },
//!   "top_n": 50,
//!   "target_date": "2015-04-17",
//!   "valid_range": { "min": 0, "max": 5000 },
//!   "min_interval_hours": 1.0
//! }
//! ```

use crate::error::ConfigError;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::Deserialize;

/// Half-open time-of-day window `[start_hour, end_hour)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TimeWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            start_hour: 12,
            end_hour: 20,
        }
    }
}

impl TimeWindow {
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        let hour = timestamp.hour();
        hour >= self.start_hour && hour < self.end_hour
    }
}

/// Half-open range `[min, max)` a counter delta must fall in to be kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ValidRange {
    pub min: i64,
    pub max: i64,
}

impl Default for ValidRange {
    fn default() -> Self {
        Self { min: 0, max: 5000 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub time_window: TimeWindow,
    pub top_n: usize,
    pub target_date: Option<NaiveDate>,
    pub valid_range: ValidRange,
    pub min_interval_hours: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            time_window: TimeWindow::default(),
            top_n: 100,
            target_date: None,
            valid_range: ValidRange::default(),
            min_interval_hours: 1.0,
        }
    }
}

impl PipelineConfig {
    /// Loads the config from a JSON file at `path` and validates it.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let TimeWindow {
            start_hour,
            end_hour,
        } = self.time_window;
        if start_hour >= end_hour || end_hour > 24 {
            return Err(ConfigError::Invalid(format!(
                "time window {start_hour}..{end_hour} must satisfy start < end <= 24"
            )));
        }
        if self.valid_range.min >= self.valid_range.max {
            return Err(ConfigError::Invalid(format!(
                "valid range [{}, {}) is empty",
                self.valid_range.min, self.valid_range.max
            )));
        }
        if self.min_interval_hours.is_nan() || self.min_interval_hours < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "min_interval_hours must be non-negative, got {}",
                self.min_interval_hours
            )));
        }
        Ok(())
    }
}
