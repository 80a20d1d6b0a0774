//! CLI argument definitions for the microdata recoder.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use pumf_ingest::DEFAULT_ARCHIVE_URL_TEMPLATE;

#[derive(Parser)]
#[command(
    name = "pumf-recode",
    version,
    about = "Recode survey public-use microdata into labelled, analysis-ready CSV",
    long_about = "Recode a survey public-use microdata file (PUMF) period.\n\n\
                  Coded fields are replaced by normalized labels from the codebook,\n\
                  described columns are renamed to <SHORT>.<DESCRIPTION>, and the\n\
                  result is written as <source-name>-<year>-<month>.csv."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Recode one survey period and write the output CSV.
    Run(RunArgs),

    /// Show the located blocks and label dictionaries of a codebook.
    Inspect(InspectArgs),
}

/// Options shared by commands that read a codebook.
#[derive(Args)]
pub struct RecodeArgs {
    /// JSON file with recoding options (layout, fields, normalization).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Text encoding of the codebook file.
    #[arg(long = "encoding", value_name = "LABEL")]
    pub encoding: Option<String>,

    /// Override the number of definition rows after each marker row.
    #[arg(long = "block-len", value_name = "ROWS", value_parser = clap::value_parser!(u16).range(1..))]
    pub block_len: Option<u16>,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Survey year of the period to process.
    #[arg(long = "year", value_parser = clap::value_parser!(u16).range(1900..=9999))]
    pub year: u16,

    /// Survey month of the period to process (1-12).
    #[arg(long = "month", value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: u32,

    /// Name prefix of the output file.
    #[arg(long = "source-name", default_value = "lfs")]
    pub source_name: String,

    /// Directory receiving the output CSV.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Use a local period archive instead of downloading it.
    #[arg(long = "archive", value_name = "ZIP", conflicts_with_all = ["metadata", "data"])]
    pub archive: Option<PathBuf>,

    /// Use an already extracted codebook (requires --data).
    #[arg(long = "metadata", value_name = "CSV", requires = "data")]
    pub metadata: Option<PathBuf>,

    /// Use an already extracted survey data file (requires --metadata).
    #[arg(long = "data", value_name = "CSV", requires = "metadata")]
    pub data: Option<PathBuf>,

    /// Archive URL template; {year} and {month} are substituted.
    #[arg(long = "url-template", value_name = "URL", default_value = DEFAULT_ARCHIVE_URL_TEMPLATE)]
    pub url_template: String,

    /// Directory for downloaded and extracted files (default: <OUTPUT_DIR>/raw).
    #[arg(long = "work-dir", value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    #[command(flatten)]
    pub recode: RecodeArgs,

    /// What to do with codes that have no label.
    #[arg(long = "on-unmapped", value_enum)]
    pub on_unmapped: Option<UnmappedArg>,

    /// Keep the original column names and columns.
    #[arg(long = "no-rename")]
    pub no_rename: bool,

    /// Recode and report without writing the output CSV.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Write a JSON run report to this path.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Codebook CSV to inspect.
    #[arg(long = "metadata", value_name = "CSV")]
    pub metadata: PathBuf,

    #[command(flatten)]
    pub recode: RecodeArgs,
}

/// CLI unmapped-code policy choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum UnmappedArg {
    PassThrough,
    Error,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
