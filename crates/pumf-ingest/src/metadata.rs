//! Metadata (codebook) loading.
//!
//! The codebook has no header row and is distributed in a legacy single-byte
//! encoding, so it is decoded explicitly before CSV parsing instead of being
//! handed to the UTF-8 only Polars reader.

use std::path::Path;

use csv::ReaderBuilder;
use encoding_rs::Encoding;
use pumf_model::MetadataTable;
use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// How to read the raw metadata file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataReadOptions {
    /// WHATWG encoding label of the file (e.g. `ISO-8859-1`, `UTF-8`).
    pub encoding: String,
    /// Leading records dropped before the table starts.
    pub skip_rows: usize,
}

impl Default for MetadataReadOptions {
    fn default() -> Self {
        Self {
            encoding: "ISO-8859-1".to_string(),
            skip_rows: 1,
        }
    }
}

impl MetadataReadOptions {
    #[must_use]
    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = encoding.into();
        self
    }

    #[must_use]
    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }
}

/// Reads a metadata file into a [`MetadataTable`].
pub fn read_metadata_table(path: &Path, options: &MetadataReadOptions) -> Result<MetadataTable> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::read(path, e))?;
    let text = decode_text(&bytes, &options.encoding)?;
    let table = parse_metadata_text(&text, options.skip_rows).map_err(|message| {
        IngestError::CsvParse {
            path: path.to_path_buf(),
            message,
        }
    })?;
    if table.is_empty() {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    tracing::debug!(
        path = %path.display(),
        encoding = %options.encoding,
        rows = table.len(),
        columns = table.width(),
        "loaded metadata table"
    );
    Ok(table)
}

/// Decodes raw bytes with the encoding named by `label`.
///
/// Malformed sequences become U+FFFD and are reported with a warning; label
/// validation downstream rejects them.
pub fn decode_text(bytes: &[u8], label: &str) -> Result<String> {
    let encoding =
        Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| IngestError::UnknownEncoding {
            label: label.to_string(),
        })?;
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(
            encoding = used.name(),
            "metadata contains byte sequences that are invalid in the declared encoding"
        );
    }
    Ok(text.into_owned())
}

/// Parses decoded, headerless CSV text into a metadata table.
///
/// Rows made only of blank cells are kept so that row indices match the
/// source file after `skip_rows`.
pub fn parse_metadata_text(
    text: &str,
    skip_rows: usize,
) -> std::result::Result<MetadataTable, String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|e| e.to_string())?;
        if idx < skip_rows {
            continue;
        }
        rows.push(record.iter().map(normalize_cell).collect());
    }
    Ok(MetadataTable::new(rows))
}

fn normalize_cell(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
