//! Archive extraction.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

/// Extracts every file of a ZIP archive under `dest_dir`.
///
/// Entries whose names would escape `dest_dir` are skipped. Returns the
/// written paths in archive order.
pub fn extract_archive(zip_path: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(zip_path).map_err(|e| IngestError::read(zip_path, e))?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| archive_error(zip_path, &e))?;
    fs::create_dir_all(dest_dir).map_err(|e| IngestError::write(dest_dir, e))?;

    let mut written = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| archive_error(zip_path, &e))?;
        if entry.is_dir() {
            continue;
        }
        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!(
                archive = %zip_path.display(),
                entry = entry.name(),
                "skipping archive entry with unsafe path"
            );
            continue;
        };
        let dest_path = dest_dir.join(relative);
        if let Some(parent) = dest_path.parent() {
            fs::create_dir_all(parent).map_err(|e| IngestError::write(parent, e))?;
        }
        let mut out = File::create(&dest_path).map_err(|e| IngestError::write(&dest_path, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| IngestError::write(&dest_path, e))?;
        tracing::debug!(entry = %dest_path.display(), "extracted archive entry");
        written.push(dest_path);
    }

    tracing::info!(
        archive = %zip_path.display(),
        files = written.len(),
        "archive extracted"
    );
    Ok(written)
}

fn archive_error(path: &Path, err: &zip::result::ZipError) -> IngestError {
    IngestError::Archive {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
