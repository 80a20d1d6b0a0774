//! Data model for metadata-driven recoding of survey microdata.
//!
//! - **table**: the raw, loosely structured metadata table
//! - **block**: coded-field configuration and located row blocks
//! - **dictionary**: code-to-label dictionaries and code coercion
//! - **naming**: column name recoding entries and output file naming
//! - **options**: layout and recoding options threaded through a run

pub mod block;
pub mod dictionary;
pub mod error;
pub mod naming;
pub mod options;
pub mod table;

pub use block::{CodedField, CodedFieldBlock, DEFAULT_BLOCK_LEN};
pub use dictionary::{LabelDictionary, integral_f64, parse_code};
pub use error::{ModelError, Result};
pub use naming::{NameRecoding, NameRecodingTable, output_file_name};
pub use options::{MetadataLayout, NormalizationOptions, RecodeOptions, UnmappedPolicy};
pub use table::MetadataTable;
