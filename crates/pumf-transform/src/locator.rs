//! Metadata Locator: finds the row block that defines a coded field.
//!
//! The reference metadata layout carries no structure beyond a marker row
//! followed by a fixed number of code/label rows. That positional assumption
//! is confined to [`MarkerLocator`]; the recoding engine only sees the
//! [`CodedFieldSource`] trait.

use pumf_model::{CodedField, CodedFieldBlock, MetadataTable};

use crate::error::LocatorError;

/// Anything that can produce the definition block of a coded field.
pub trait CodedFieldSource {
    fn block_for(&self, field: &CodedField) -> Result<CodedFieldBlock, LocatorError>;
}

/// Returns the index of the single row whose `marker_column` cell contains
/// `marker` (case-sensitive).
///
/// Blank cells never match. Zero or several matching rows are errors.
pub fn locate_marker(
    table: &MetadataTable,
    marker_column: usize,
    marker: &str,
) -> Result<usize, LocatorError> {
    let rows: Vec<usize> = table
        .column(marker_column)
        .enumerate()
        .filter_map(|(row, cell)| cell.filter(|text| text.contains(marker)).map(|_| row))
        .collect();

    match rows.as_slice() {
        [] => Err(LocatorError::MarkerNotFound {
            marker: marker.to_string(),
            column: marker_column,
        }),
        [row] => Ok(*row),
        _ => Err(LocatorError::AmbiguousMarker {
            marker: marker.to_string(),
            column: marker_column,
            rows,
        }),
    }
}

/// Positional locator: the block is the `block_len` rows after the marker row.
#[derive(Debug, Clone, Copy)]
pub struct MarkerLocator<'a> {
    table: &'a MetadataTable,
    marker_column: usize,
}

impl<'a> MarkerLocator<'a> {
    pub fn new(table: &'a MetadataTable, marker_column: usize) -> Self {
        Self {
            table,
            marker_column,
        }
    }
}

impl CodedFieldSource for MarkerLocator<'_> {
    fn block_for(&self, field: &CodedField) -> Result<CodedFieldBlock, LocatorError> {
        if field.block_len == 0 {
            return Err(LocatorError::EmptyBlock {
                field: field.column.clone(),
            });
        }
        let marker_row = locate_marker(self.table, self.marker_column, &field.marker)?;
        let out_of_bounds = |end: usize| LocatorError::BlockOutOfBounds {
            field: field.column.clone(),
            start: marker_row + 1,
            end,
            rows: self.table.len(),
        };
        // A length whose last row overflows is reported with `usize::MAX` as its end.
        let block = CodedFieldBlock::after_marker(&field.column, marker_row, field.block_len)
            .ok_or_else(|| out_of_bounds(usize::MAX))?;
        if block.end >= self.table.len() {
            return Err(out_of_bounds(block.end));
        }
        tracing::debug!(
            field = %field.column,
            marker = %field.marker,
            marker_row,
            start = block.start,
            end = block.end,
            "located coded field block"
        );
        Ok(block)
    }
}
