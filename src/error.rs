use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised by the statistics and planning core. Everything outside the core (config IO,
/// HTTP, the keyring) goes through `anyhow` instead.
#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    /// An identifier matched none of the configured date formats. Callers ingesting notes
    /// recover from this by dropping the record.
    #[error("identifier '{0}' does not match any known date format")]
    UnresolvedIdentifier(String),
    #[error("item counts must be non-negative, got {checked} checked and {unchecked} unchecked")]
    InvalidCount { checked: i64, unchecked: i64 },
    #[error("unknown mode '{0}', expected one of daily, weekly, monthly, yearly, total")]
    UnknownMode(String),
    #[error("`until` date {until} is before `from` date {from}")]
    InvertedRange { from: NaiveDate, until: NaiveDate },
    #[error("invalid date format '{format}' for mode {mode}")]
    InvalidFormat { mode: String, format: String },
    #[error("title pattern '{0}' must contain the `{{date}}` placeholder exactly once")]
    MissingPlaceholder(String),
}
