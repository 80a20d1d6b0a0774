//! Recoding plan: runs the locator and the recoding engine over one dataset.

use polars::prelude::DataFrame;
use pumf_model::{
    CodedField, CodedFieldBlock, LabelDictionary, MetadataTable, NameRecodingTable, RecodeOptions,
};
use serde::Serialize;

use crate::error::Result;
use crate::locator::{CodedFieldSource, MarkerLocator};
use crate::normalize::NormalizationRules;
use crate::recode::{RecodeStats, apply_value_recoding, build_label_dictionary};
use crate::rename::{apply_name_recoding, build_name_recoding};

/// A coded field together with its located block and dictionary.
#[derive(Debug, Clone, Serialize)]
pub struct FieldDictionary {
    pub field: CodedField,
    pub block: CodedFieldBlock,
    pub dictionary: LabelDictionary,
}

/// What happened to one coded field during a run.
#[derive(Debug, Clone, Serialize)]
pub struct FieldReport {
    pub field: CodedField,
    pub block: CodedFieldBlock,
    pub dictionary: LabelDictionary,
    pub stats: RecodeStats,
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct RecodeOutcome {
    pub data: DataFrame,
    pub fields: Vec<FieldReport>,
    /// `None` when column renaming is disabled.
    pub names: Option<NameRecodingTable>,
}

/// Locates and builds the dictionary of every configured field, in order.
pub fn build_field_dictionaries<S>(
    source: &S,
    metadata: &MetadataTable,
    options: &RecodeOptions,
) -> Result<Vec<FieldDictionary>>
where
    S: CodedFieldSource + ?Sized,
{
    let rules = NormalizationRules::from_options(&options.normalization);
    options
        .fields
        .iter()
        .map(|field| -> Result<FieldDictionary> {
            let block = source.block_for(field)?;
            let dictionary = build_label_dictionary(metadata, &block, &options.layout, &rules)?;
            Ok(FieldDictionary {
                field: field.clone(),
                block,
                dictionary,
            })
        })
        .collect()
}

/// Recodes `data` with blocks found by the positional marker locator.
pub fn recode_dataset(
    metadata: &MetadataTable,
    data: &DataFrame,
    options: &RecodeOptions,
) -> Result<RecodeOutcome> {
    let locator = MarkerLocator::new(metadata, options.layout.marker_column);
    recode_with_source(&locator, metadata, data, options)
}

/// Recodes `data` with blocks from any [`CodedFieldSource`].
///
/// Every dictionary is built before the first column is touched, so a
/// metadata problem never yields a partially recoded frame.
pub fn recode_with_source<S>(
    source: &S,
    metadata: &MetadataTable,
    data: &DataFrame,
    options: &RecodeOptions,
) -> Result<RecodeOutcome>
where
    S: CodedFieldSource + ?Sized,
{
    options.validate()?;

    let dictionaries = build_field_dictionaries(source, metadata, options)?;
    let names = if options.rename_columns {
        Some(build_name_recoding(metadata, &options.layout)?)
    } else {
        None
    };

    let mut frame = data.clone();
    let mut fields = Vec::with_capacity(dictionaries.len());
    for FieldDictionary {
        field,
        block,
        dictionary,
    } in dictionaries
    {
        let (recoded, stats) =
            apply_value_recoding(&frame, &field.column, &dictionary, options.on_unmapped)?;
        frame = recoded;
        tracing::info!(
            field = %field.column,
            %block,
            labels = dictionary.len(),
            mapped = stats.mapped,
            unmapped = stats.unmapped,
            "recoded field"
        );
        fields.push(FieldReport {
            field,
            block,
            dictionary,
            stats,
        });
    }

    if let Some(names) = &names {
        frame = apply_name_recoding(&frame, names)?;
        tracing::info!(columns = names.len(), "renamed columns");
    }

    Ok(RecodeOutcome {
        data: frame,
        fields,
        names,
    })
}
