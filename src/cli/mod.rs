//! Command-line parsing for the Superstore sales pipeline.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the pipeline code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::app::pipeline::SourceConfig;
use crate::domain::{CategoryFilter, ColumnNames};
use crate::io::ingest::{LoadOptions, TextEncoding};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "superstore", version, about = "Superstore sales report and dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print metrics, the category profit ranking and the monthly sales trend.
    Report(ReportArgs),
    /// Launch the interactive dashboard.
    ///
    /// This uses the same underlying pipeline as `superstore report`, but renders
    /// results in a terminal UI using Ratatui.
    Dashboard(DashboardArgs),
    /// List the category filter choices observed in the dataset.
    Categories(SourceArgs),
    /// Print a synthetic Superstore-shaped CSV to stdout.
    Sample(SampleArgs),
}

/// Where to read the dataset from.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Superstore CSV file.
    #[arg(short = 'd', long, env = "SUPERSTORE_DATA", default_value = "superstore.csv")]
    pub data: PathBuf,

    /// Encoding tried first.
    ///
    /// The stock Superstore export is usually Latin-1; pass `--encoding latin-1`
    /// to read it that way first. The default is strict UTF-8 so that the
    /// Windows-1252 fallback can still catch files that are neither.
    #[arg(long, value_enum, default_value_t = TextEncoding::Utf8)]
    pub encoding: TextEncoding,

    /// Encoding tried once if the first one hits an invalid byte.
    #[arg(long, value_enum, default_value_t = TextEncoding::Windows1252)]
    pub fallback_encoding: TextEncoding,

    /// Field delimiter (a single ASCII character).
    #[arg(long, default_value = ",", value_parser = parse_delimiter)]
    pub delimiter: u8,
}

impl SourceArgs {
    pub fn to_source(&self) -> SourceConfig {
        SourceConfig {
            path: self.data.clone(),
            options: LoadOptions {
                primary: self.encoding,
                fallback: self.fallback_encoding,
                delimiter: self.delimiter,
            },
            columns: ColumnNames::default(),
        }
    }
}

/// Output format of `superstore report`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Options for the static report.
#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Category to report on, or `All`.
    #[arg(short = 'c', long, default_value = "All")]
    pub category: CategoryFilter,

    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Skip the ASCII charts.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 18)]
    pub height: usize,
}

/// Options for the dashboard.
#[derive(Debug, Args, Clone)]
pub struct DashboardArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Category selected at start-up, or `All`.
    #[arg(short = 'c', long, default_value = "All")]
    pub category: CategoryFilter,
}

/// Options for the synthetic sample generator.
#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Number of distinct line items.
    #[arg(short = 'n', long, default_value_t = 500)]
    pub rows: usize,

    /// Random seed; the same seed always prints the same file.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Extra rows that repeat an earlier row verbatim.
    #[arg(long, default_value_t = 0)]
    pub duplicates: usize,
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ if s == "\\t" => Ok(b'\t'),
        _ => Err(format!("delimiter must be a single ASCII character, got '{s}'")),
    }
}
