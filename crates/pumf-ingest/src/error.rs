//! Error types for microdata ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while retrieving, unpacking or loading inputs.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Input file not found.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read a file or directory.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file or create a directory.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Decoding and Parsing Errors ===
    /// Encoding label not recognized.
    #[error("unknown text encoding '{label}'")]
    UnknownEncoding { label: String },

    /// Failed to parse CSV content.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV file has no usable rows.
    #[error("CSV file is empty: {path}")]
    EmptyCsv { path: PathBuf },

    // === Discovery Errors ===
    /// Expected input file not found among candidates.
    #[error("no {kind} file matching '{hint}' among {candidates} CSV files")]
    InputNotFound {
        kind: &'static str,
        hint: String,
        candidates: usize,
    },

    // === Retrieval Errors ===
    /// Archive could not be opened or extracted.
    #[error("archive error in {path}: {message}")]
    Archive { path: PathBuf, message: String },

    /// Download failed.
    #[error("download of {url} failed: {message}")]
    Download { url: String, message: String },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl IngestError {
    pub(crate) fn read(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub(crate) fn write(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
