//! Value recoding: code-to-label dictionaries built from metadata blocks and
//! applied to dataset columns.

use std::collections::{BTreeSet, HashMap};

use polars::prelude::{DataFrame, IntoSeries, StringChunkedBuilder};
use pumf_model::{
    CodedFieldBlock, LabelDictionary, MetadataLayout, MetadataTable, UnmappedPolicy, parse_code,
};
use serde::{Deserialize, Serialize};

use crate::error::{RecodeError, Result};
use crate::normalize::{NormalizationRules, validate_label};
use crate::polars_utils::{any_to_code, any_to_string};

/// Builds the label dictionary of one coded field from its metadata block.
///
/// Every block row must carry an integer code and a label; labels are
/// normalized and validated. A code listed twice fails the build.
pub fn build_label_dictionary(
    table: &MetadataTable,
    block: &CodedFieldBlock,
    layout: &MetadataLayout,
    rules: &NormalizationRules,
) -> Result<LabelDictionary> {
    let field = block.field.as_str();
    let mut dictionary = LabelDictionary::new(field);
    let mut code_rows: HashMap<i64, usize> = HashMap::new();

    for row in block.rows() {
        let raw_code = block_cell(table, field, row, layout.code_column)?;
        let raw_label = block_cell(table, field, row, layout.label_column)?;

        let code = parse_code(raw_code).ok_or_else(|| RecodeError::InvalidCode {
            field: field.to_string(),
            row,
            value: raw_code.to_string(),
        })?;

        let normalized = rules.normalize(raw_label);
        let offending = validate_label(&normalized);
        if normalized.is_empty() || !offending.is_empty() {
            return Err(RecodeError::Normalization {
                field: field.to_string(),
                row,
                original: raw_label.to_string(),
                normalized,
                offending,
            });
        }

        if let Some(&first_row) = code_rows.get(&code) {
            return Err(RecodeError::DuplicateCode {
                field: field.to_string(),
                code,
                first_row,
                row,
            });
        }
        code_rows.insert(code, row);
        dictionary.insert(code, normalized);
    }

    tracing::debug!(field, labels = dictionary.len(), "built label dictionary");
    Ok(dictionary)
}

fn block_cell<'a>(
    table: &'a MetadataTable,
    field: &str,
    row: usize,
    column: usize,
) -> Result<&'a str> {
    table
        .cell(row, column)
        .ok_or_else(|| RecodeError::MissingBlockCell {
            field: field.to_string(),
            row,
            column,
        })
}

/// Counts collected while recoding one column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecodeStats {
    /// Values replaced by a label.
    pub mapped: usize,
    /// Non-null values without a label, left as text.
    pub unmapped: usize,
    pub nulls: usize,
    /// Distinct unmapped values as rendered in the output.
    pub unmapped_values: BTreeSet<String>,
}

/// Replaces the codes of `column` with their labels.
///
/// The column becomes a string column. Values that coerce to a dictionary
/// code take its label, nulls stay null, and all other values are kept as
/// text unless `policy` is [`UnmappedPolicy::Error`]. The input frame is not
/// modified.
pub fn apply_value_recoding(
    df: &DataFrame,
    column: &str,
    dictionary: &LabelDictionary,
    policy: UnmappedPolicy,
) -> Result<(DataFrame, RecodeStats)> {
    let source = df
        .column(column)
        .map_err(|_| RecodeError::ColumnNotFound {
            column: column.to_string(),
        })?
        .as_materialized_series();

    let mut builder = StringChunkedBuilder::new(column.into(), df.height());
    let mut stats = RecodeStats::default();

    for row in 0..source.len() {
        let value = source.get(row)?;
        if value.is_null() {
            builder.append_null();
            stats.nulls += 1;
            continue;
        }
        if let Some(label) = any_to_code(value.clone()).and_then(|code| dictionary.get(code)) {
            builder.append_value(label);
            stats.mapped += 1;
            continue;
        }
        let text = any_to_string(value);
        if policy == UnmappedPolicy::Error {
            return Err(RecodeError::UnmappedCode {
                column: column.to_string(),
                row,
                value: text,
            });
        }
        builder.append_value(&text);
        stats.unmapped += 1;
        stats.unmapped_values.insert(text);
    }

    let mut recoded = df.clone();
    recoded.with_column(builder.finish().into_series())?;

    if stats.unmapped > 0 {
        tracing::warn!(
            column,
            unmapped = stats.unmapped,
            values = ?stats.unmapped_values,
            "values without a label passed through"
        );
    }
    tracing::debug!(
        column,
        mapped = stats.mapped,
        nulls = stats.nulls,
        "recoded column values"
    );
    Ok((recoded, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{DataType, df};

    fn province_table() -> MetadataTable {
        MetadataTable::from_text_rows(vec![
            vec!["2", "prov", "Province"],
            vec!["", "", "", "12", "Nova Scotia"],
            vec!["", "", "", "24", "Québec  Region"],
        ])
    }

    fn province_block() -> CodedFieldBlock {
        CodedFieldBlock::after_marker("PROV", 0, 2).unwrap()
    }

    fn build(table: &MetadataTable) -> Result<LabelDictionary> {
        build_label_dictionary(
            table,
            &province_block(),
            &MetadataLayout::default(),
            &NormalizationRules::default(),
        )
    }

    #[test]
    fn test_build_label_dictionary_normalizes_labels() {
        let dictionary = build(&province_table()).unwrap();
        assert_eq!(dictionary.get(12), Some("Nova_Scotia"));
        assert_eq!(dictionary.get(24), Some("Quebec_Region"));
        assert_eq!(dictionary.lookup_text("24.0"), Some("Quebec_Region"));
    }

    #[test]
    fn test_build_label_dictionary_missing_label() {
        let table = MetadataTable::from_text_rows(vec![
            vec!["2", "prov", "Province"],
            vec!["", "", "", "12", "Nova Scotia"],
            vec!["", "", "", "24"],
        ]);
        let err = build(&table).unwrap_err();
        assert!(matches!(
            err,
            RecodeError::MissingBlockCell {
                row: 2,
                column: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_build_label_dictionary_invalid_code() {
        let table = MetadataTable::from_text_rows(vec![
            vec!["2", "prov", "Province"],
            vec!["", "", "", "12", "Nova Scotia"],
            vec!["", "", "", "12.5", "Quebec"],
        ]);
        let err = build(&table).unwrap_err();
        assert!(matches!(err, RecodeError::InvalidCode { row: 2, .. }));
    }

    #[test]
    fn test_build_label_dictionary_rejects_unlisted_characters() {
        let table = MetadataTable::from_text_rows(vec![
            vec!["2", "prov", "Province"],
            vec!["", "", "", "12", "Nova Scotia"],
            vec!["", "", "", "24", "Nunavut ✓"],
        ]);
        match build(&table).unwrap_err() {
            RecodeError::Normalization {
                row,
                normalized,
                offending,
                ..
            } => {
                assert_eq!(row, 2);
                assert_eq!(normalized, "Nunavut_✓");
                assert_eq!(offending, vec!['✓']);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_apply_value_recoding_renders_unmapped_as_text() {
        let dictionary = build(&province_table()).unwrap();
        let df = df! { "PROV" => [Some(12i64), None, Some(99)], "AGE" => [30i64, 41, 52] }.unwrap();

        let (recoded, stats) =
            apply_value_recoding(&df, "PROV", &dictionary, UnmappedPolicy::PassThrough).unwrap();

        let prov = recoded.column("PROV").unwrap();
        assert_eq!(prov.dtype(), &DataType::String);
        let values: Vec<Option<&str>> = prov.str().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some("Nova_Scotia"), None, Some("99")]);
        assert_eq!(recoded.column("AGE").unwrap().dtype(), &DataType::Int64);
        assert_eq!((stats.mapped, stats.unmapped, stats.nulls), (1, 1, 1));
        // Input frame untouched.
        assert_eq!(df.column("PROV").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_apply_value_recoding_error_policy() {
        let dictionary = build(&province_table()).unwrap();
        let df = df! { "PROV" => [12i64, 99] }.unwrap();
        let err = apply_value_recoding(&df, "PROV", &dictionary, UnmappedPolicy::Error).unwrap_err();
        assert!(matches!(err, RecodeError::UnmappedCode { row: 1, ref value, .. } if value == "99"));
    }

    #[test]
    fn test_apply_value_recoding_missing_column() {
        let dictionary = build(&province_table()).unwrap();
        let df = df! { "AGE" => [30i64] }.unwrap();
        let err =
            apply_value_recoding(&df, "PROV", &dictionary, UnmappedPolicy::PassThrough).unwrap_err();
        assert!(matches!(err, RecodeError::ColumnNotFound { ref column } if column == "PROV"));
    }

    #[test]
    fn test_apply_value_recoding_accepts_textual_codes() {
        let dictionary = build(&province_table()).unwrap();
        let df = df! { "PROV" => ["12", "24.0", "n/a"] }.unwrap();
        let (recoded, _) =
            apply_value_recoding(&df, "PROV", &dictionary, UnmappedPolicy::PassThrough).unwrap();
        let values: Vec<Option<&str>> =
            recoded.column("PROV").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(
            values,
            vec![Some("Nova_Scotia"), Some("Quebec_Region"), Some("n/a")]
        );
    }
}
