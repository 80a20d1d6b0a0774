//! Staged run pipeline: acquire, load, recode, output.
//!
//! Each stage runs inside its own span and logs its duration. Nothing is
//! written to the output directory until every recoding step succeeded.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::DataFrame;
use tracing::{info, info_span};

use pumf_ingest::{
    InputFiles, InputPatterns, MetadataReadOptions, discover_inputs, download_archive,
    extract_archive, read_metadata_table, read_survey_table, write_survey_table,
};
use pumf_model::{MetadataTable, RecodeOptions, output_file_name};
use pumf_transform::{RecodeOutcome, recode_dataset};

use crate::types::{InputSource, RunConfig, RunResult};

/// Runs every stage for one period.
pub fn run_pipeline(config: &RunConfig) -> Result<RunResult> {
    let period = config.period();
    let run_span = info_span!("run", period = %period, source = %config.source_name);
    let _run_guard = run_span.enter();

    // Fail on a bad period before any download happens.
    let output_name = output_file_name(&config.source_name, config.year, config.month)?;

    let stage_start = Instant::now();
    let inputs = info_span!("acquire").in_scope(|| acquire(config))?;
    info!(
        metadata = %inputs.metadata.display(),
        data = %inputs.data.display(),
        duration_ms = stage_start.elapsed().as_millis(),
        "acquire complete"
    );

    let stage_start = Instant::now();
    let (metadata, data) = info_span!("load").in_scope(|| load(&inputs, &config.read_options))?;
    info!(
        metadata_rows = metadata.len(),
        rows = data.height(),
        columns = data.width(),
        duration_ms = stage_start.elapsed().as_millis(),
        "load complete"
    );

    let stage_start = Instant::now();
    let outcome = info_span!("recode").in_scope(|| recode(&metadata, &data, &config.options))?;
    info!(
        fields = outcome.fields.len(),
        columns = outcome.data.width(),
        duration_ms = stage_start.elapsed().as_millis(),
        "recode complete"
    );

    let RecodeOutcome {
        data: mut recoded,
        fields,
        names,
    } = outcome;

    let stage_start = Instant::now();
    let output_path = config.output_dir.join(output_name);
    let written = if config.dry_run {
        info!(path = %output_path.display(), "dry run, output not written");
        None
    } else {
        let path = info_span!("output").in_scope(|| output(&mut recoded, &output_path))?;
        info!(
            path = %path.display(),
            duration_ms = stage_start.elapsed().as_millis(),
            "output complete"
        );
        Some(path)
    };

    Ok(RunResult {
        generated_at: Utc::now(),
        period,
        inputs,
        output: written,
        rows: recoded.height(),
        input_columns: data.width(),
        columns: recoded.width(),
        fields,
        names,
    })
}

/// Resolves the codebook and data file for the configured input source.
pub fn acquire(config: &RunConfig) -> Result<InputFiles> {
    match &config.input {
        InputSource::Files { metadata, data } => Ok(InputFiles {
            metadata: metadata.clone(),
            data: data.clone(),
        }),
        InputSource::Archive(archive) => {
            unpack(archive, &config.work_dir.join(config.period()), &config.patterns)
        }
        InputSource::Download { url } => {
            let archive = download_archive(url, &config.work_dir)
                .with_context(|| format!("download period archive {url}"))?;
            unpack(&archive, &config.work_dir.join(config.period()), &config.patterns)
        }
    }
}

fn unpack(archive: &Path, dest_dir: &Path, patterns: &InputPatterns) -> Result<InputFiles> {
    let files = extract_archive(archive, dest_dir)
        .with_context(|| format!("extract {}", archive.display()))?;
    let inputs = discover_inputs(&files, patterns)
        .with_context(|| format!("find inputs in {}", archive.display()))?;
    Ok(inputs)
}

/// Loads the codebook and the survey data.
pub fn load(
    inputs: &InputFiles,
    read_options: &MetadataReadOptions,
) -> Result<(MetadataTable, DataFrame)> {
    let metadata = read_metadata_table(&inputs.metadata, read_options)
        .with_context(|| format!("read codebook {}", inputs.metadata.display()))?;
    let data = read_survey_table(&inputs.data)
        .with_context(|| format!("read survey data {}", inputs.data.display()))?;
    Ok((metadata, data))
}

/// Runs the recoding core.
pub fn recode(
    metadata: &MetadataTable,
    data: &DataFrame,
    options: &RecodeOptions,
) -> Result<RecodeOutcome> {
    recode_dataset(metadata, data, options).context("recode survey data")
}

/// Writes the recoded frame.
pub fn output(data: &mut DataFrame, path: &Path) -> Result<PathBuf> {
    write_survey_table(data, path).with_context(|| format!("write {}", path.display()))?;
    Ok(path.to_path_buf())
}
