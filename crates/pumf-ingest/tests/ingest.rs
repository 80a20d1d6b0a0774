//! Integration tests for unpacking a period archive and loading its inputs.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use polars::prelude::DataType;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

use pumf_ingest::{
    IngestError, InputPatterns, MetadataReadOptions, discover_inputs, extract_archive,
    list_csv_files, read_metadata_table, read_survey_table, write_survey_table,
};

const CODEBOOK: &[u8] = b"Field,Variable,Description,Code,Label\n\
1,rec_num,Order of record in file,,\n\
2,prov,Province,,\n\
,,,24,Qu\xe9bec\n\
,,,35,Ontario\n";

const SURVEY: &str = "REC_NUM,PROV,AGE_12\n1,24,3\n2,35,\n3,99,7\n";

fn write_archive(path: &Path) {
    let mut zip = zip::ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    zip.start_file("LFS_PUMF_EPUL_Codebook.csv", options).unwrap();
    zip.write_all(CODEBOOK).unwrap();
    zip.start_file("pub0324.csv", options).unwrap();
    zip.write_all(SURVEY.as_bytes()).unwrap();
    zip.start_file("Read_me.txt", options).unwrap();
    zip.write_all(b"notes").unwrap();
    zip.finish().unwrap();
}

#[test]
fn archive_inputs_are_discovered_and_loaded() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("2024-03-CSV.zip");
    write_archive(&archive);

    let extracted = extract_archive(&archive, &dir.path().join("work")).unwrap();
    assert_eq!(extracted.len(), 3);

    let inputs = discover_inputs(&extracted, &InputPatterns::default()).unwrap();
    assert!(inputs.metadata.ends_with("LFS_PUMF_EPUL_Codebook.csv"));
    assert!(inputs.data.ends_with("pub0324.csv"));

    let metadata = read_metadata_table(&inputs.metadata, &MetadataReadOptions::default()).unwrap();
    assert_eq!(metadata.len(), 4);
    assert_eq!(metadata.cell(1, 1), Some("prov"));
    assert_eq!(metadata.cell(2, 4), Some("Québec"));

    let survey = read_survey_table(&inputs.data).unwrap();
    assert_eq!(survey.shape(), (3, 3));
    assert_eq!(survey.column("PROV").unwrap().dtype(), &DataType::Int64);
    assert_eq!(survey.column("AGE_12").unwrap().null_count(), 1);
}

#[test]
fn extracted_directory_can_be_listed_again() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("2024-03-CSV.zip");
    write_archive(&archive);
    let work = dir.path().join("work");
    extract_archive(&archive, &work).unwrap();

    let csv_files = list_csv_files(&work).unwrap();
    assert_eq!(csv_files.len(), 2);

    let patterns = InputPatterns {
        metadata_hint: "layout".to_string(),
        ..InputPatterns::default()
    };
    let err = discover_inputs(&csv_files, &patterns).unwrap_err();
    assert_eq!(
        err.to_string(),
        "no metadata file matching 'layout' among 2 CSV files"
    );
}

#[test]
fn utf8_metadata_reads_with_explicit_encoding() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("codebook.csv");
    std::fs::write(&path, "2,prov,Province\n,,,24,Québec\n").unwrap();

    let options = MetadataReadOptions::default()
        .with_encoding("UTF-8")
        .with_skip_rows(0);
    let metadata = read_metadata_table(&path, &options).unwrap();
    assert_eq!(metadata.cell(1, 4), Some("Québec"));
}

#[test]
fn survey_table_round_trips_through_csv() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("pub.csv");
    std::fs::write(&source, SURVEY).unwrap();
    let mut survey = read_survey_table(&source).unwrap();

    let target = dir.path().join("output").join("lfs-2024-03.csv");
    write_survey_table(&mut survey, &target).unwrap();

    let reread = read_survey_table(&target).unwrap();
    assert!(survey.equals_missing(&reread));
}

#[test]
fn empty_survey_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pub.csv");
    std::fs::write(&path, "").unwrap();
    let result = read_survey_table(&path);
    assert!(matches!(
        result,
        Err(IngestError::EmptyCsv { .. } | IngestError::CsvParse { .. })
    ));
}
