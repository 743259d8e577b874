use std::path::PathBuf;

use thiserror::Error;

/// Failure to read the trajectory table or a vehicle lookup table.
///
/// Any of these at startup aborts the application.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("malformed JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed Parquet in {}: {source}", path.display())]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("reading Arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("column '{column}' has type {found}, expected {expected}")]
    ColumnType {
        column: String,
        found: String,
        expected: &'static str,
    },

    #[error("row {row}: '{value}' is not a MM/DD/YYYY date")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: column '{column}' has invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: column '{column}' is empty")]
    MissingValue { row: usize, column: String },
}

/// A lookup table that cannot back an interpolator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpolationTableError {
    #[error("lookup table is empty")]
    Empty,

    #[error("lookup table has a single point; at least two are required")]
    Degenerate,

    #[error("lookup table x values are not strictly increasing at point {index} ({prev} then {next})")]
    NotIncreasing { index: usize, prev: f64, next: f64 },

    #[error("lookup table point {index} is not finite")]
    NonFinite { index: usize },
}

/// Failure to obtain a launch vehicle's interpolator.
#[derive(Debug, Error)]
pub enum VehicleError {
    #[error("unknown launch vehicle '{0}'")]
    Unknown(String),

    #[error("loading lookup table for '{vehicle}': {source}")]
    Load {
        vehicle: String,
        #[source]
        source: LoadError,
    },

    #[error("lookup table for '{vehicle}': {source}")]
    Table {
        vehicle: String,
        #[source]
        source: InterpolationTableError,
    },
}
