//! End-to-end runs of the staged pipeline against files on disk.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::write::SimpleFileOptions;

use pumf_cli::pipeline::run_pipeline;
use pumf_cli::types::{InputSource, RunConfig};
use pumf_ingest::{InputPatterns, MetadataReadOptions};
use pumf_model::{RecodeOptions, UnmappedPolicy};

/// Latin-1 codebook with a title record ahead of the table.
const CODEBOOK: &[u8] = b"Labour Force Survey public use microdata file,,,,\n\
1,rec_num,Order of record in file,,\n\
2,prov,Province,,\n\
,,,1,Nova Scotia\n\
,,,2,Qu\xe9bec  Region\n\
3,cma,Census metropolitan area (CMA),,\n\
,,,1,Qu\xe9bec\n\
,,,2,Ottawa-Gatineau / Ontario part\n\
4,age_12,Five-year age group of respondent,,\n";

const SURVEY: &str = "REC_NUM,PROV,CMA,AGE_12,LFSSTAT\n\
1,2,2,3,1\n\
2,1,1,7,1\n\
3,2,,11,4\n";

fn write_inputs(dir: &Path, survey: &str) -> (PathBuf, PathBuf) {
    let metadata = dir.join("LFS_PUMF_EPUL_Codebook.csv");
    let data = dir.join("pub0324.csv");
    std::fs::write(&metadata, CODEBOOK).unwrap();
    std::fs::write(&data, survey).unwrap();
    (metadata, data)
}

fn config(dir: &Path, input: InputSource) -> RunConfig {
    RunConfig {
        year: 2024,
        month: 3,
        source_name: "lfs".to_string(),
        output_dir: dir.join("output"),
        work_dir: dir.join("work"),
        input,
        patterns: InputPatterns::default(),
        read_options: MetadataReadOptions::default(),
        options: RecodeOptions::default().with_block_len(2),
        dry_run: false,
    }
}

#[test]
fn run_writes_recoded_period_file() {
    let dir = TempDir::new().unwrap();
    let (metadata, data) = write_inputs(dir.path(), SURVEY);

    let result = run_pipeline(&config(dir.path(), InputSource::Files { metadata, data })).unwrap();

    let output = result.output.clone().unwrap();
    assert_eq!(output, dir.path().join("output").join("lfs-2024-03.csv"));
    assert_eq!(result.period, "2024-03");
    assert_eq!((result.rows, result.input_columns, result.columns), (3, 5, 4));
    assert_eq!(result.unmapped_total(), 0);

    let written = std::fs::read_to_string(&output).unwrap();
    insta::assert_snapshot!(written.trim_end(), @r"
    REC_NUM.ORDER_OF_RECORD_IN_FILE,PROV.PROVINCE,CMA.CENSUS_METROPOLITAN_AREA_(CMA),AGE_12.FIVE-YEAR_AGE_GROUP_OF_RESPONDENT
    1,Quebec_Region,OttawaGatineau_Ontario_part,3
    2,Nova_Scotia,Quebec,7
    3,Quebec_Region,,11
    ");
}

#[test]
fn dry_run_reports_without_writing() {
    let dir = TempDir::new().unwrap();
    let survey = "REC_NUM,PROV,CMA,AGE_12\n1,99,1,3\n2,1,2,7\n";
    let (metadata, data) = write_inputs(dir.path(), survey);
    let mut config = config(dir.path(), InputSource::Files { metadata, data });
    config.dry_run = true;

    let result = run_pipeline(&config).unwrap();

    assert!(result.output.is_none());
    assert!(!dir.path().join("output").exists());
    assert_eq!(result.unmapped_total(), 1);

    let report = serde_json::to_value(&result).unwrap();
    assert_eq!(report["period"], "2024-03");
    assert!(report["output"].is_null());
    assert_eq!(report["fields"][0]["field"]["column"], "PROV");
    assert_eq!(report["fields"][0]["stats"]["mapped"], 1);
    assert_eq!(report["fields"][0]["stats"]["unmapped_values"][0], "99");
    assert_eq!(report["names"]["entries"].as_array().map(Vec::len), Some(4));
}

#[test]
fn strict_policy_fails_before_output() {
    let dir = TempDir::new().unwrap();
    let survey = "REC_NUM,PROV,CMA,AGE_12\n1,99,1,3\n";
    let (metadata, data) = write_inputs(dir.path(), survey);
    let mut config = config(dir.path(), InputSource::Files { metadata, data });
    config.options = config.options.with_unmapped_policy(UnmappedPolicy::Error);

    let err = run_pipeline(&config).unwrap_err();

    assert!(format!("{err:#}").contains("value '99' in column PROV (row 0) has no label"));
    assert!(!dir.path().join("output").exists());
}

#[test]
fn archive_input_is_unpacked_into_period_directory() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("2024-03-CSV.zip");
    let mut zip = zip::ZipWriter::new(File::create(&archive).unwrap());
    let options = SimpleFileOptions::default();
    zip.start_file("LFS_PUMF_EPUL_Codebook.csv", options).unwrap();
    zip.write_all(CODEBOOK).unwrap();
    zip.start_file("pub0324.csv", options).unwrap();
    zip.write_all(SURVEY.as_bytes()).unwrap();
    zip.finish().unwrap();

    let result = run_pipeline(&config(dir.path(), InputSource::Archive(archive))).unwrap();

    let period_dir = dir.path().join("work").join("2024-03");
    assert_eq!(result.inputs.data, period_dir.join("pub0324.csv"));
    assert_eq!(
        result.inputs.metadata,
        period_dir.join("LFS_PUMF_EPUL_Codebook.csv")
    );
    assert!(dir.path().join("output").join("lfs-2024-03.csv").is_file());
}

#[test]
fn bad_period_fails_before_reading_inputs() {
    let dir = TempDir::new().unwrap();
    let mut config = config(
        dir.path(),
        InputSource::Files {
            metadata: dir.path().join("missing.csv"),
            data: dir.path().join("missing-data.csv"),
        },
    );
    config.month = 13;

    let err = run_pipeline(&config).unwrap_err();

    assert!(err.to_string().contains("month"), "unexpected error: {err:#}");
}
