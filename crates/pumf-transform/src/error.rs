//! Error types for locating metadata blocks and recoding datasets.

use pumf_model::ModelError;
use thiserror::Error;

/// The metadata layout does not identify a field's definition block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocatorError {
    /// No row of the marker column contains the marker.
    #[error("marker '{marker}' not found in metadata column {column}")]
    MarkerNotFound { marker: String, column: usize },

    /// More than one row of the marker column contains the marker.
    #[error("marker '{marker}' is ambiguous in metadata column {column}: rows {rows:?}")]
    AmbiguousMarker {
        marker: String,
        column: usize,
        rows: Vec<usize>,
    },

    /// Field configured with a zero-length block.
    #[error("field {field} has an empty definition block")]
    EmptyBlock { field: String },

    /// Block extends past the last metadata row.
    #[error("block for {field} (rows {start}..={end}) exceeds the {rows} metadata rows")]
    BlockOutOfBounds {
        field: String,
        start: usize,
        end: usize,
        rows: usize,
    },
}

/// Errors raised while building or applying recodings. All are fatal to a run.
#[derive(Debug, Error)]
pub enum RecodeError {
    #[error(transparent)]
    Locator(#[from] LocatorError),

    #[error("invalid recoding options: {0}")]
    Options(#[from] ModelError),

    // === Dataset Errors ===
    /// A referenced column is absent from the dataset.
    #[error("column not found in dataset: {column}")]
    ColumnNotFound { column: String },

    /// Name recoding would produce the same column name twice.
    #[error("duplicate column name '{name}' produced by metadata rows {rows:?}")]
    DuplicateColumnName { name: String, rows: Vec<usize> },

    /// Two metadata rows rename the same dataset column.
    #[error("column '{name}' is renamed by more than one metadata row: {rows:?}")]
    DuplicateSourceColumn { name: String, rows: Vec<usize> },

    /// A dataset value has no label and unmapped values are not allowed.
    #[error("value '{value}' in column {column} (row {row}) has no label")]
    UnmappedCode {
        column: String,
        row: usize,
        value: String,
    },

    // === Metadata Block Errors ===
    /// A label still contains forbidden characters after normalization.
    #[error(
        "label '{original}' for {field} (metadata row {row}) normalizes to '{normalized}' \
         with forbidden characters {offending:?}"
    )]
    Normalization {
        field: String,
        row: usize,
        original: String,
        normalized: String,
        offending: Vec<char>,
    },

    /// The same code appears twice in one block.
    #[error("duplicate code {code} for {field} at metadata rows {first_row} and {row}")]
    DuplicateCode {
        field: String,
        code: i64,
        first_row: usize,
        row: usize,
    },

    /// A block code cell is not an integer.
    #[error("code '{value}' for {field} at metadata row {row} is not an integer")]
    InvalidCode {
        field: String,
        row: usize,
        value: String,
    },

    /// A block row lacks its code or label cell.
    #[error("{field} block row {row} has no value in metadata column {column}")]
    MissingBlockCell {
        field: String,
        row: usize,
        column: usize,
    },

    // === DataFrame Errors ===
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for RecodeError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for recoding operations.
pub type Result<T> = std::result::Result<T, RecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_error_display() {
        let err = LocatorError::AmbiguousMarker {
            marker: "prov".to_string(),
            column: 1,
            rows: vec![3, 17],
        };
        assert_eq!(
            err.to_string(),
            "marker 'prov' is ambiguous in metadata column 1: rows [3, 17]"
        );
    }

    #[test]
    fn test_locator_error_is_transparent() {
        let err: RecodeError = LocatorError::MarkerNotFound {
            marker: "cma".to_string(),
            column: 1,
        }
        .into();
        assert_eq!(err.to_string(), "marker 'cma' not found in metadata column 1");
    }

    #[test]
    fn test_normalization_error_names_offending_value() {
        let err = RecodeError::Normalization {
            field: "PROV".to_string(),
            row: 12,
            original: "Nunavut ✓".to_string(),
            normalized: "Nunavut_✓".to_string(),
            offending: vec!['✓'],
        };
        let message = err.to_string();
        assert!(message.contains("PROV"));
        assert!(message.contains("row 12"));
        assert!(message.contains("Nunavut_✓"));
    }
}
