//! Input file discovery among extracted archive contents.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// File name hints used to tell the metadata file from the data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputPatterns {
    /// Case-insensitive substring of the metadata file stem.
    pub metadata_hint: String,
    /// Case-insensitive substring of the data file stem.
    pub data_hint: String,
}

impl Default for InputPatterns {
    fn default() -> Self {
        Self {
            metadata_hint: "codebook".to_string(),
            data_hint: "pub".to_string(),
        }
    }
}

/// The two CSV inputs of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFiles {
    pub metadata: PathBuf,
    pub data: PathBuf,
}

/// Lists all CSV files in a directory, recursing into subdirectories.
///
/// Returns files sorted by path.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_csv_files(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_csv_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::read(dir, e))?;
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::read(dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            collect_csv_files(&path, files)?;
        } else if is_csv(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Picks the metadata and data files among candidate paths.
///
/// Non-CSV candidates are ignored. Candidates are considered in sorted
/// order and the first match wins; the data file is never the file already
/// chosen as metadata.
pub fn discover_inputs(candidates: &[PathBuf], patterns: &InputPatterns) -> Result<InputFiles> {
    let mut csv_files: Vec<&PathBuf> = candidates.iter().filter(|path| is_csv(path)).collect();
    csv_files.sort();

    let metadata = csv_files
        .iter()
        .find(|path| stem_contains(path, &patterns.metadata_hint))
        .map(|path| (*path).clone())
        .ok_or_else(|| IngestError::InputNotFound {
            kind: "metadata",
            hint: patterns.metadata_hint.clone(),
            candidates: csv_files.len(),
        })?;

    let data = csv_files
        .iter()
        .filter(|path| ***path != metadata)
        .find(|path| stem_contains(path, &patterns.data_hint))
        .map(|path| (*path).clone())
        .ok_or_else(|| IngestError::InputNotFound {
            kind: "data",
            hint: patterns.data_hint.clone(),
            candidates: csv_files.len(),
        })?;

    tracing::debug!(
        metadata = %metadata.display(),
        data = %data.display(),
        "discovered input files"
    );
    Ok(InputFiles { metadata, data })
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

fn stem_contains(path: &Path, hint: &str) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.to_lowercase().contains(&hint.to_lowercase()))
}
