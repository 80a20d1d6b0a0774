//! Column naming: short-to-long name recoding and output file names.

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// One column rename: dataset short name to synthesized long name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecoding {
    pub old_name: String,
    pub new_name: String,
    /// Metadata row the entry was built from.
    pub row: usize,
}

/// Ordered column renames; the order is the column order of the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecodingTable {
    entries: Vec<NameRecoding>,
}

impl NameRecodingTable {
    pub fn new(entries: Vec<NameRecoding>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NameRecoding> + '_ {
        self.entries.iter()
    }

    pub fn old_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.old_name.as_str())
    }

    pub fn new_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|entry| entry.new_name.as_str())
    }

    /// Long name for a short name, if the table renames it.
    pub fn new_name_for(&self, old_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.old_name == old_name)
            .map(|entry| entry.new_name.as_str())
    }
}

/// Output file name for a run: `<source-name>-<year>-<month>.csv`.
///
/// The month is zero-padded to two digits.
pub fn output_file_name(source_name: &str, year: u16, month: u32) -> Result<String> {
    if !(1..=12).contains(&month) {
        return Err(ModelError::InvalidMonth { month });
    }
    Ok(format!("{source_name}-{year}-{month:02}.csv"))
}
