//! Archive retrieval for a survey period.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;

use crate::error::{IngestError, Result};

/// Archive URL template; `{year}` is four digits, `{month}` two.
pub const DEFAULT_ARCHIVE_URL_TEMPLATE: &str =
    "https://www150.statcan.gc.ca/n1/pub/71m0001x/2021001/{year}-{month}-CSV.zip";

/// Archives are tens of megabytes.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Expands an archive URL template for a period.
pub fn archive_url(template: &str, year: u16, month: u32) -> String {
    template
        .replace("{year}", &format!("{year:04}"))
        .replace("{month}", &format!("{month:02}"))
}

/// Downloads `url` into `dest_dir`, naming the file after the last URL
/// path segment. Returns the written path.
pub fn download_archive(url: &str, dest_dir: &Path) -> Result<PathBuf> {
    let download_error = |message: String| IngestError::Download {
        url: url.to_string(),
        message,
    };

    let file_name = archive_file_name(url)
        .ok_or_else(|| download_error("URL has no file name".to_string()))?;

    let client = Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| download_error(e.to_string()))?;

    tracing::info!(url, "downloading archive");
    let bytes = client
        .get(url)
        .header(USER_AGENT, format!("pumf-recode/{}", env!("CARGO_PKG_VERSION")))
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .and_then(reqwest::blocking::Response::bytes)
        .map_err(|e| download_error(e.to_string()))?;

    std::fs::create_dir_all(dest_dir).map_err(|e| IngestError::write(dest_dir, e))?;
    let dest_path = dest_dir.join(file_name);
    std::fs::write(&dest_path, &bytes).map_err(|e| IngestError::write(&dest_path, e))?;

    tracing::info!(
        path = %dest_path.display(),
        bytes = bytes.len(),
        "archive downloaded"
    );
    Ok(dest_path)
}

fn archive_file_name(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/')
        .next()
        .filter(|name| !name.is_empty() && !name.contains(':'))
}
