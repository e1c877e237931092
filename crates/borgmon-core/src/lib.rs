//! borgmon-core — shared types for the borgmon exporter.
//!
//! Holds the transaction record model, the parser for the last line of a
//! BorgBackup `transactions` log, and the exporter configuration.

pub mod config;
pub mod parser;
pub mod types;

pub use config::{ConfigError, ConfigResult, ExporterConfig};
pub use parser::{parse_transaction_line, ParseError};
pub use types::*;
