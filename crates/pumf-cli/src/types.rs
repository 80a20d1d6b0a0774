//! Run configuration and results.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use pumf_ingest::{InputFiles, InputPatterns, MetadataReadOptions};
use pumf_model::{NameRecodingTable, RecodeOptions};
use pumf_transform::FieldReport;
use serde::Serialize;

/// Where the two input files of a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Codebook and data files already on disk.
    Files { metadata: PathBuf, data: PathBuf },
    /// A local period archive.
    Archive(PathBuf),
    /// A period archive to download.
    Download { url: String },
}

/// Everything a run needs, resolved up front from flags and config files.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub year: u16,
    pub month: u32,
    pub source_name: String,
    pub output_dir: PathBuf,
    /// Receives downloaded archives and their extracted contents.
    pub work_dir: PathBuf,
    pub input: InputSource,
    pub patterns: InputPatterns,
    pub read_options: MetadataReadOptions,
    pub options: RecodeOptions,
    pub dry_run: bool,
}

impl RunConfig {
    /// Period label used in logs and directory names, e.g. `2024-03`.
    pub fn period(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Outcome of a successful run, also serialized as the JSON run report.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub generated_at: DateTime<Utc>,
    pub period: String,
    pub inputs: InputFiles,
    /// Output file; `None` on a dry run.
    pub output: Option<PathBuf>,
    pub rows: usize,
    /// Width of the survey data as read.
    pub input_columns: usize,
    /// Width of the recoded output.
    pub columns: usize,
    pub fields: Vec<FieldReport>,
    pub names: Option<NameRecodingTable>,
}

impl RunResult {
    /// Total values left without a label across all recoded fields.
    pub fn unmapped_total(&self) -> usize {
        self.fields.iter().map(|field| field.stats.unmapped).sum()
    }
}
