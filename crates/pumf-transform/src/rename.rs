//! Name recoding: select the described columns and give them long names.

use std::collections::HashMap;

use polars::prelude::DataFrame;
use pumf_model::{MetadataLayout, MetadataTable, NameRecoding, NameRecodingTable};

use crate::error::{RecodeError, Result};

/// Builds the name recoding table from the name and description columns.
///
/// Rows missing either cell are dropped. For the rest,
/// `old_name = UPPER(trim(name))` and
/// `new_name = old_name + "." + UPPER(description with whitespace runs as "_")`.
pub fn build_name_recoding(
    table: &MetadataTable,
    layout: &MetadataLayout,
) -> Result<NameRecodingTable> {
    let mut entries = Vec::new();
    for row in 0..table.len() {
        let (Some(name), Some(description)) = (
            table.cell(row, layout.name_column),
            table.cell(row, layout.description_column),
        ) else {
            continue;
        };
        let old_name = name.trim().to_uppercase();
        let new_name = format!("{old_name}.{}", underscore_whitespace(description).to_uppercase());
        entries.push(NameRecoding {
            old_name,
            new_name,
            row,
        });
    }

    if let Some((name, rows)) = first_duplicate(entries.iter().map(|e| (e.new_name.as_str(), e.row))) {
        return Err(RecodeError::DuplicateColumnName { name, rows });
    }
    if let Some((name, rows)) = first_duplicate(entries.iter().map(|e| (e.old_name.as_str(), e.row))) {
        return Err(RecodeError::DuplicateSourceColumn { name, rows });
    }

    tracing::debug!(entries = entries.len(), "built name recoding table");
    Ok(NameRecodingTable::new(entries))
}

/// Selects the table's columns in table order and renames them in one step.
///
/// Columns not named by the table are dropped. A table column absent from
/// the frame is an error.
pub fn apply_name_recoding(df: &DataFrame, names: &NameRecodingTable) -> Result<DataFrame> {
    if let Some(missing) = names
        .old_names()
        .find(|name| df.get_column_index(name).is_none())
    {
        return Err(RecodeError::ColumnNotFound {
            column: missing.to_string(),
        });
    }

    let mut renamed = df.select(names.old_names())?;
    renamed.set_column_names(names.new_names())?;

    let dropped = df.width() - renamed.width();
    if dropped > 0 {
        tracing::debug!(dropped, "dropped columns without a description");
    }
    Ok(renamed)
}

fn underscore_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join("_")
}

/// First name, in table order, that occurs more than once, with all its rows.
fn first_duplicate<'a>(
    names: impl Iterator<Item = (&'a str, usize)>,
) -> Option<(String, Vec<usize>)> {
    let mut order: Vec<&str> = Vec::new();
    let mut rows: HashMap<&str, Vec<usize>> = HashMap::new();
    for (name, row) in names {
        let entry = rows.entry(name).or_default();
        if entry.is_empty() {
            order.push(name);
        }
        entry.push(row);
    }
    order
        .into_iter()
        .find(|name| rows[name].len() > 1)
        .map(|name| (name.to_string(), rows.remove(name).unwrap_or_default()))
}
