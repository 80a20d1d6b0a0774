//! Tests for pumf-model types.

use pumf_model::{
    CodedField, CodedFieldBlock, LabelDictionary, MetadataTable, RecodeOptions, UnmappedPolicy,
};

#[test]
fn unmapped_policy_uses_snake_case_names() {
    let json = serde_json::to_string(&UnmappedPolicy::PassThrough).expect("serialize policy");
    assert_eq!(json, "\"pass_through\"");
    let policy: UnmappedPolicy = serde_json::from_str("\"error\"").expect("parse policy");
    assert_eq!(policy, UnmappedPolicy::Error);
    assert_eq!(policy.label(), "error");
}

#[test]
fn options_file_can_replace_fields() {
    let options: RecodeOptions = serde_json::from_str(
        r#"{"fields":[{"column":"NAICS_21","marker":"naics_21","block_len":21}]}"#,
    )
    .expect("parse options");
    assert_eq!(
        options.fields,
        vec![CodedField::new("NAICS_21", "naics_21").with_block_len(21)]
    );
    assert!(options.rename_columns);
}

#[test]
fn block_rows_index_into_table() {
    let table = MetadataTable::from_text_rows(vec![
        vec!["1", "prov", "Province"],
        vec!["", "", "", "10", "Newfoundland and Labrador"],
        vec!["", "", "", "11", "Prince Edward Island"],
    ]);
    let block = CodedFieldBlock::after_marker("PROV", 0, 2).unwrap();
    let labels: Vec<Option<&str>> = block.rows().map(|row| table.cell(row, 4)).collect();
    assert_eq!(
        labels,
        vec![
            Some("Newfoundland and Labrador"),
            Some("Prince Edward Island")
        ]
    );
}

#[test]
fn dictionary_serializes_codes_as_keys() {
    let mut dictionary = LabelDictionary::new("PROV");
    dictionary.insert(12, "Nova_Scotia");
    let json = serde_json::to_value(&dictionary).expect("serialize dictionary");
    assert_eq!(json["field"], "PROV");
    assert_eq!(json["labels"]["12"], "Nova_Scotia");
}
