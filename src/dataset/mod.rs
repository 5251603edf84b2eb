//! Labeled numeric tables and the CSV loader that produces them.

use std::path::PathBuf;

use thiserror::Error;

pub mod loader;
mod table;

pub use loader::{load_table, parse_table};
pub use table::{LabeledExample, TrainingTable, UNKNOWN_LABEL};

/// Errors raised while building or reshaping a table.
#[derive(Debug, Error)]
pub enum DataError {
    /// The CSV file could not be opened or read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A cell did not parse as `f64`. `line` and `column` are 1-based.
    #[error("Invalid number {text:?} at line {line}, column {column}")]
    ParseNumber {
        line: usize,
        column: usize,
        text: String,
    },
    /// A row does not have the table's feature count.
    #[error("Row {row} has {got} features (expected {expected})")]
    WidthMismatch {
        row: usize,
        expected: usize,
        got: usize,
    },
    /// A record had no cells at all.
    #[error("Record has no label column")]
    EmptyRecord,
    /// The file had a header but no data rows, so the width is unknown.
    #[error("Table has no data rows")]
    NoRows,
    /// The holdout cutoff is past the end of the table.
    #[error("Holdout cutoff {cutoff} exceeds table length {len}")]
    SplitOutOfRange { cutoff: usize, len: usize },
    /// A selected feature column does not exist (0-based).
    #[error("Feature index {index} out of range for {feature_len} features")]
    FeatureOutOfRange { index: usize, feature_len: usize },
}
