//! Configuration options for metadata-driven recoding.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::block::CodedField;
use crate::error::{ModelError, Result};

/// Characters that label normalization strips or produces, so they cannot
/// double as the separator.
const RESERVED_SEPARATORS: &[char] = &['_', '(', ')', '-'];

/// What to do with dataset codes that have no label in the dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedPolicy {
    /// Keep the original value (e.g. "not applicable" sentinels).
    #[default]
    PassThrough,
    /// Fail the run on the first unmapped value.
    Error,
}

impl UnmappedPolicy {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::PassThrough => "pass_through",
            Self::Error => "error",
        }
    }
}

/// Column positions inside the metadata table.
///
/// The layout is fixed per dataset release; the defaults describe the
/// reference codebook where variable rows carry a lowercase name and an
/// English description, and the rows under them carry code/label pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataLayout {
    /// Column searched for marker text.
    pub marker_column: usize,
    /// Column holding the original coded value.
    pub code_column: usize,
    /// Column holding the human-readable label for a code.
    pub label_column: usize,
    /// Column holding a variable's short name (name recoding).
    pub name_column: usize,
    /// Column holding a variable's description (name recoding).
    pub description_column: usize,
}

impl Default for MetadataLayout {
    fn default() -> Self {
        Self {
            marker_column: 1,
            code_column: 3,
            label_column: 4,
            name_column: 1,
            description_column: 2,
        }
    }
}

/// Label normalization settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationOptions {
    /// Character folded into underscores together with whitespace.
    pub separator: char,
}

impl Default for NormalizationOptions {
    fn default() -> Self {
        Self { separator: '/' }
    }
}

/// Options controlling one recoding run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecodeOptions {
    pub layout: MetadataLayout,
    /// Coded fields recoded from codes to labels, in order.
    pub fields: Vec<CodedField>,
    pub normalization: NormalizationOptions,
    pub on_unmapped: UnmappedPolicy,
    /// Select and rename dataset columns from the metadata descriptions.
    pub rename_columns: bool,
}

impl Default for RecodeOptions {
    fn default() -> Self {
        Self {
            layout: MetadataLayout::default(),
            fields: vec![CodedField::new("PROV", "prov"), CodedField::new("CMA", "cma")],
            normalization: NormalizationOptions::default(),
            on_unmapped: UnmappedPolicy::default(),
            rename_columns: true,
        }
    }
}

impl RecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_fields(mut self, fields: Vec<CodedField>) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: MetadataLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_unmapped_policy(mut self, policy: UnmappedPolicy) -> Self {
        self.on_unmapped = policy;
        self
    }

    #[must_use]
    pub fn with_rename_columns(mut self, enable: bool) -> Self {
        self.rename_columns = enable;
        self
    }

    /// Sets the same block length on every configured field.
    #[must_use]
    pub fn with_block_len(mut self, block_len: usize) -> Self {
        for field in &mut self.fields {
            field.block_len = block_len;
        }
        self
    }

    /// Checks option combinations that would make the run ill-defined.
    pub fn validate(&self) -> Result<()> {
        if RESERVED_SEPARATORS.contains(&self.normalization.separator)
            || self.normalization.separator.is_whitespace()
        {
            return Err(ModelError::InvalidOption {
                option: "normalization.separator".to_string(),
                reason: format!(
                    "'{}' is removed or produced by normalization",
                    self.normalization.separator
                ),
            });
        }
        let mut columns = HashSet::new();
        for field in &self.fields {
            if !columns.insert(field.column.as_str()) {
                return Err(ModelError::InvalidOption {
                    option: format!("fields.{}", field.column),
                    reason: "column is configured more than once".to_string(),
                });
            }
            if field.block_len == 0 {
                return Err(ModelError::InvalidOption {
                    option: format!("fields.{}.block_len", field.column),
                    reason: "block length must be at least 1".to_string(),
                });
            }
            if field.marker.is_empty() {
                return Err(ModelError::InvalidOption {
                    option: format!("fields.{}.marker", field.column),
                    reason: "marker text must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_recode_province_and_metro_area() {
        let options = RecodeOptions::default();
        let columns: Vec<&str> = options.fields.iter().map(|f| f.column.as_str()).collect();
        assert_eq!(columns, vec!["PROV", "CMA"]);
        assert_eq!(options.on_unmapped, UnmappedPolicy::PassThrough);
        assert!(options.rename_columns);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let options: RecodeOptions =
            serde_json::from_str(r#"{"on_unmapped":"error","layout":{"code_column":5}}"#)
                .expect("parse options");
        assert_eq!(options.on_unmapped, UnmappedPolicy::Error);
        assert_eq!(options.layout.code_column, 5);
        assert_eq!(options.layout.label_column, 4);
        assert_eq!(options.fields.len(), 2);
    }

    #[test]
    fn block_len_override_applies_to_every_field() {
        let options = RecodeOptions::default().with_block_len(13);
        assert!(options.fields.iter().all(|field| field.block_len == 13));
    }

    #[test]
    fn rejects_reserved_separator() {
        let mut options = RecodeOptions::default();
        options.normalization.separator = '_';
        assert!(matches!(
            options.validate(),
            Err(ModelError::InvalidOption { .. })
        ));
    }

    #[test]
    fn rejects_zero_block_len() {
        let options = RecodeOptions::default().with_block_len(0);
        assert!(options.validate().is_err());
    }

    #[test]
    fn rejects_field_configured_twice() {
        let options = RecodeOptions::default().with_fields(vec![
            CodedField::new("PROV", "prov"),
            CodedField::new("PROV", "province"),
        ]);
        assert_eq!(
            options.validate(),
            Err(ModelError::InvalidOption {
                option: "fields.PROV".to_string(),
                reason: "column is configured more than once".to_string(),
            })
        );
    }
}
