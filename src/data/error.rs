use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy for the data layer
// ---------------------------------------------------------------------------

/// Everything that can go wrong while loading or summarizing survey data.
///
/// All variants are fail-fast and carry the offending identifier; callers
/// report them and re-invoke after correcting the input.
#[derive(Debug, Error)]
pub enum DataError {
    /// The source file path did not resolve to a readable file.
    #[error("source file not found: {0}")]
    SourceNotFound(PathBuf),

    /// A record could not be parsed (inconsistent field count, bad syntax).
    /// `record` is 1-based; 0 refers to the header row.
    #[error("malformed record {record}: {reason}")]
    MalformedRecord { record: u64, reason: String },

    /// File extension not recognised by the loader.
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    /// A column reference that does not exist in the table.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// A view name outside the fixed set of dashboard views.
    #[error("unknown view: {0}")]
    UnknownView(String),

    /// A numeric operation was requested on a text column.
    #[error("column is not numeric: {0}")]
    NonNumericColumn(String),

    /// A statistic was requested on a column with no non-missing values.
    #[error("column has no non-missing values: {0}")]
    EmptySeries(String),
}

pub type Result<T, E = DataError> = std::result::Result<T, E>;
