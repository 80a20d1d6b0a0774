use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use pumf_cli::pipeline::run_pipeline;
use pumf_cli::types::{InputSource, RunConfig, RunResult};
use pumf_ingest::{InputPatterns, MetadataReadOptions, archive_url, read_metadata_table};
use pumf_model::{RecodeOptions, UnmappedPolicy};
use pumf_transform::{MarkerLocator, build_field_dictionaries, build_name_recoding};

use crate::cli::{InspectArgs, RecodeArgs, RunArgs, UnmappedArg};
use crate::summary::print_inspection;

pub fn run(args: &RunArgs) -> Result<RunResult> {
    let config = build_run_config(args)?;
    let result = run_pipeline(&config)?;
    if let Some(path) = &args.report {
        write_report(&result, path)?;
        info!(path = %path.display(), "run report written");
    }
    Ok(result)
}

pub fn inspect(args: &InspectArgs) -> Result<()> {
    let options = recode_options(&args.recode)?;
    options.validate().context("invalid recoding options")?;
    let metadata = read_metadata_table(&args.metadata, &read_options(&args.recode))
        .with_context(|| format!("read codebook {}", args.metadata.display()))?;

    let locator = MarkerLocator::new(&metadata, options.layout.marker_column);
    let dictionaries = build_field_dictionaries(&locator, &metadata, &options)?;
    let names = build_name_recoding(&metadata, &options.layout)?;
    print_inspection(&dictionaries, &names);
    Ok(())
}

fn build_run_config(args: &RunArgs) -> Result<RunConfig> {
    let mut options = recode_options(&args.recode)?;
    if let Some(policy) = args.on_unmapped {
        options.on_unmapped = match policy {
            UnmappedArg::PassThrough => UnmappedPolicy::PassThrough,
            UnmappedArg::Error => UnmappedPolicy::Error,
        };
    }
    if args.no_rename {
        options.rename_columns = false;
    }

    let input = match (&args.archive, &args.metadata, &args.data) {
        (Some(archive), _, _) => InputSource::Archive(archive.clone()),
        (None, Some(metadata), Some(data)) => InputSource::Files {
            metadata: metadata.clone(),
            data: data.clone(),
        },
        _ => InputSource::Download {
            url: archive_url(&args.url_template, args.year, args.month),
        },
    };

    Ok(RunConfig {
        year: args.year,
        month: args.month,
        source_name: args.source_name.clone(),
        output_dir: args.output_dir.clone(),
        work_dir: args
            .work_dir
            .clone()
            .unwrap_or_else(|| args.output_dir.join("raw")),
        input,
        patterns: InputPatterns::default(),
        read_options: read_options(&args.recode),
        options,
        dry_run: args.dry_run,
    })
}

/// Options from `--config` (or defaults) with flag overrides applied.
fn recode_options(args: &RecodeArgs) -> Result<RecodeOptions> {
    let mut options = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read config {}", path.display()))?;
            serde_json::from_str::<RecodeOptions>(&text)
                .with_context(|| format!("parse config {}", path.display()))?
        }
        None => RecodeOptions::default(),
    };
    if let Some(block_len) = args.block_len {
        options = options.with_block_len(usize::from(block_len));
    }
    Ok(options)
}

fn read_options(args: &RecodeArgs) -> MetadataReadOptions {
    match &args.encoding {
        Some(encoding) => MetadataReadOptions::default().with_encoding(encoding.clone()),
        None => MetadataReadOptions::default(),
    }
}

fn write_report(result: &RunResult, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(result).context("serialize run report")?;
    std::fs::write(path, json).with_context(|| format!("write report {}", path.display()))?;
    Ok(())
}
