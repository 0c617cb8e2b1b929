pub mod analyzers;
pub mod config;
pub mod error;
pub mod files;
pub mod output;
pub mod parser;
