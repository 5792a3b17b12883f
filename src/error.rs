use std::path::PathBuf;

use thiserror::Error;

/// Domain failures surfaced by the explorer.
///
/// Invalid answers to prompts are never errors; they are re-prompted.
#[derive(Debug, Error)]
pub enum ExploreError {
    #[error("no data file for {city} in {}", dir.display())]
    MissingCityData { city: String, dir: PathBuf },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: cannot parse '{value}' as a timestamp")]
    BadTimestamp { row: usize, value: String },

    #[error("row {row}: cannot parse '{value}' in column '{column}' as a number")]
    BadNumber {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType { column: String, data_type: String },

    #[error("input closed before an answer was given")]
    InputClosed,
}
