//! Survey respondent file reading and writing.

use std::fs::File;
use std::path::Path;

use polars::prelude::{CsvReadOptions, CsvWriter, DataFrame, SerReader, SerWriter};

use crate::error::{IngestError, Result};

/// Rows scanned to infer column types.
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Reads the survey data file (standard header row) into a DataFrame.
pub fn read_survey_table(path: &Path) -> Result<DataFrame> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    if df.width() == 0 {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded survey table"
    );
    Ok(df)
}

/// Writes a DataFrame as comma-separated CSV with a header row.
///
/// Parent directories are created as needed. The CSV goes to a sibling
/// `.csv.tmp` file that is renamed over `path` only once fully written, so a
/// failed write never leaves a truncated output behind.
pub fn write_survey_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| IngestError::write(parent, e))?;
    }
    let temp_path = path.with_extension("csv.tmp");
    if let Err(err) = write_csv(df, &temp_path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(err);
    }
    std::fs::rename(&temp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        IngestError::write(path, e)
    })?;
    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "wrote survey table"
    );
    Ok(())
}

fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path).map_err(|e| IngestError::write(path, e))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(df)?;
    file.sync_all().map_err(|e| IngestError::write(path, e))?;
    Ok(())
}
