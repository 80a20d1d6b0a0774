//! Metadata-driven recoding of survey microdata.
//!
//! - **locator**: finds the metadata block defining a coded field
//! - **normalize**: label normalization and validation
//! - **recode**: code-to-label dictionaries and value recoding
//! - **rename**: column selection and long-name renaming
//! - **pipeline**: runs all of the above over one dataset
//!
//! # Example
//!
//! ```ignore
//! use pumf_model::RecodeOptions;
//! use pumf_transform::recode_dataset;
//!
//! let outcome = recode_dataset(&metadata, &data, &RecodeOptions::default())?;
//! for field in &outcome.fields {
//!     println!("{}: {} labels", field.block, field.dictionary.len());
//! }
//! ```

pub mod error;
pub mod locator;
pub mod normalize;
pub mod pipeline;
mod polars_utils;
pub mod recode;
pub mod rename;

pub use error::{LocatorError, RecodeError, Result};
pub use locator::{CodedFieldSource, MarkerLocator, locate_marker};
pub use normalize::{NormalizationRules, normalize_label, validate_label};
pub use pipeline::{
    FieldDictionary, FieldReport, RecodeOutcome, build_field_dictionaries, recode_dataset,
    recode_with_source,
};
pub use polars_utils::{any_to_code, any_to_string};
pub use recode::{RecodeStats, apply_value_recoding, build_label_dictionary};
pub use rename::{apply_name_recoding, build_name_recoding};
