//! Turnstile counter analysis.
//!
//! Raw cumulative readings flow through counter normalization, row shaping,
//! per-station aggregation and hourly rate derivation, and end in daily
//! summaries and top-N rankings. Every stage takes the full output of the
//! previous one and returns a new collection.

pub mod aggregate;
pub mod analyzer;
pub mod normalize;
pub mod rank;
pub mod rate;
pub mod shape;
pub mod types;
pub mod utility;

#[cfg(test)]
mod testing;
