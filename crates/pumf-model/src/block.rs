//! Coded fields and the metadata row blocks that define them.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Number of code/label rows following a marker row in the reference layout.
pub const DEFAULT_BLOCK_LEN: usize = 10;

/// A dataset column whose integer codes are defined by a metadata block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodedField {
    /// Column in the survey dataset (e.g. `PROV`).
    pub column: String,
    /// Text identifying the marker row in the metadata (e.g. `prov`).
    pub marker: String,
    /// Number of definition rows following the marker row.
    #[serde(default = "default_block_len")]
    pub block_len: usize,
}

fn default_block_len() -> usize {
    DEFAULT_BLOCK_LEN
}

impl CodedField {
    pub fn new(column: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            marker: marker.into(),
            block_len: DEFAULT_BLOCK_LEN,
        }
    }

    #[must_use]
    pub fn with_block_len(mut self, block_len: usize) -> Self {
        self.block_len = block_len;
        self
    }
}

/// Contiguous metadata rows holding one coded field's definitions.
///
/// `start` is the row after the marker row; `end` is inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodedFieldBlock {
    pub field: String,
    pub marker_row: usize,
    pub start: usize,
    pub end: usize,
}

impl CodedFieldBlock {
    /// Block of `block_len` rows directly after `marker_row`.
    ///
    /// `None` when `block_len` is zero or the last row index does not fit in
    /// `usize`.
    pub fn after_marker(
        field: impl Into<String>,
        marker_row: usize,
        block_len: usize,
    ) -> Option<Self> {
        if block_len == 0 {
            return None;
        }
        let start = marker_row.checked_add(1)?;
        let end = marker_row.checked_add(block_len)?;
        Some(Self {
            field: field.into(),
            marker_row,
            start,
            end,
        })
    }

    pub fn row_count(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn rows(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }
}

impl fmt::Display for CodedFieldBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rows {}..={}", self.field, self.start, self.end)
    }
}
