//! Error types for the library.
//!
//! Ingestion fails fast on the first malformed row; counter faults are not
//! errors and never show up here (see [`crate::analyzers::types::FaultAudit`]).

use thiserror::Error;

/// Errors raised while reading raw turnstile files.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("failed to open {path}: {error}")]
    Io {
        path: String,
        #[source]
        error: std::io::Error,
    },

    #[error("CSV error in {origin}: {error}")]
    Csv {
        origin: String,
        #[source]
        error: csv::Error,
    },

    #[error("malformed row at {origin}:{line}: {field} = {value:?}")]
    MalformedRow {
        origin: String,
        line: u64,
        field: &'static str,
        value: String,
    },
}

/// Errors raised while loading or validating a [`crate::config::PipelineConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
