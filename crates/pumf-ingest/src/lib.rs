//! Survey microdata ingestion utilities.
//!
//! This crate provides the I/O collaborators around the recoding core:
//! everything needed to turn a period of a public-use microdata file into
//! an in-memory metadata table and a Polars DataFrame.
//!
//! # Features
//!
//! - **Retrieval**: Download the archive for a survey period
//! - **Extraction**: Unpack the archive and locate the metadata and data CSVs
//! - **Metadata Loading**: Read the headerless codebook with an explicit encoding
//! - **Survey Loading**: Read the respondent file into a DataFrame
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use pumf_ingest::{
//!     InputPatterns, MetadataReadOptions, discover_inputs, extract_archive,
//!     read_metadata_table, read_survey_table,
//! };
//!
//! let files = extract_archive(Path::new("2024-03-CSV.zip"), Path::new("work"))?;
//! let inputs = discover_inputs(&files, &InputPatterns::default())?;
//! let metadata = read_metadata_table(&inputs.metadata, &MetadataReadOptions::default())?;
//! let data = read_survey_table(&inputs.data)?;
//! ```

mod archive;
mod discovery;
mod error;
mod fetch;
mod metadata;
mod survey;

// === Error Types ===
pub use error::{IngestError, Result};

// === Retrieval ===
pub use fetch::{DEFAULT_ARCHIVE_URL_TEMPLATE, archive_url, download_archive};

// === Extraction and Discovery ===
pub use archive::extract_archive;
pub use discovery::{InputFiles, InputPatterns, discover_inputs, list_csv_files};

// === Loading ===
pub use metadata::{MetadataReadOptions, decode_text, parse_metadata_text, read_metadata_table};
pub use survey::{read_survey_table, write_survey_table};
