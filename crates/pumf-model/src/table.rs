#![deny(unsafe_code)]

/// Raw metadata sheet: ordered rows of optional text cells, no schema.
///
/// Blank cells are stored as `None`. Rows keep their own length; reading
/// past the end of a row behaves like reading a blank cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataTable {
    rows: Vec<Vec<Option<String>>>,
}

impl MetadataTable {
    pub fn new(rows: Vec<Vec<Option<String>>>) -> Self {
        Self { rows }
    }

    /// Builds a table from string cells, mapping blank cells to `None`.
    pub fn from_text_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(|cell| blank_to_none(cell.as_ref())).collect())
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Length of the longest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn row(&self, index: usize) -> Option<&[Option<String>]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .and_then(Option::as_deref)
    }

    /// Cells of one column, top to bottom, one entry per row.
    pub fn column(&self, column: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |cells| cells.get(column).and_then(Option::as_deref))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<String>]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }
}

fn blank_to_none(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_cells_become_none() {
        let table = MetadataTable::from_text_rows(vec![vec!["1", " prov ", ""], vec!["2"]]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.width(), 3);
        assert_eq!(table.cell(0, 1), Some("prov"));
        assert_eq!(table.cell(0, 2), None);
        assert_eq!(table.cell(1, 2), None);
        assert_eq!(table.cell(5, 0), None);
    }

    #[test]
    fn column_yields_one_entry_per_row() {
        let table = MetadataTable::from_text_rows(vec![vec!["a", "b"], vec!["c"], vec!["", "d"]]);
        let column: Vec<Option<&str>> = table.column(1).collect();
        assert_eq!(column, vec![Some("b"), None, Some("d")]);
    }
}
