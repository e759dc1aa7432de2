//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and initializes logging
//! - parses CLI arguments
//! - runs the shared pipeline
//! - hands the results to the report printer or the dashboard

use std::io::Write;

use clap::Parser;

use crate::cli::{Command, DashboardArgs, ReportArgs, ReportFormat, SampleArgs, SourceArgs};
use crate::data::SampleConfig;
use crate::error::AppError;

pub mod cache;
pub mod pipeline;

use cache::DatasetCache;

/// Entry point for the `superstore` binary.
pub fn run() -> Result<(), AppError> {
    // A missing `.env` is the normal case.
    let _ = dotenvy::dotenv();
    init_logging();

    // We want `superstore` and `superstore -c Furniture` to behave like
    // `superstore dashboard ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Report(args) => handle_report(args),
        Command::Dashboard(args) => handle_dashboard(args),
        Command::Categories(args) => handle_categories(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn init_logging() {
    // Warnings only by default: the dashboard owns the terminal.
    let env = env_logger::Env::default().default_filter_or("warn");
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let source = args.source.to_source();
    let mut cache = DatasetCache::new();
    let run = pipeline::run(&mut cache, &source, &args.category)?;

    if !run.choices.contains(&args.category) {
        log::warn!(
            "Category '{}' does not occur in '{}'; the report will be empty",
            args.category,
            source.path.display()
        );
    }

    let analysis = &run.analysis;
    let text = match args.format {
        ReportFormat::Json => serde_json::to_string_pretty(analysis)
            .map_err(|e| AppError::output(format!("Failed to serialize report: {e}")))?,
        ReportFormat::Text => {
            let mut out = String::new();
            out.push_str(&crate::report::format_summary(analysis, &source.path.display().to_string()));
            out.push('\n');
            out.push_str(&crate::report::format_category_profit(analysis));
            if !args.no_plot {
                out.push_str(&crate::plot::render_category_profit(analysis, args.width / 2));
            }
            out.push('\n');
            out.push_str(&crate::report::format_monthly_sales(analysis));
            if !args.no_plot {
                out.push_str(&crate::plot::render_monthly_sales(analysis, args.width, args.height));
            }
            out
        }
    };

    println!("{text}");
    Ok(())
}

fn handle_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    crate::tui::run(args.source.to_source(), args.category)
}

fn handle_categories(args: SourceArgs) -> Result<(), AppError> {
    let dataset = pipeline::load_dataset(&args.to_source())?;
    for choice in crate::prep::filter_choices(&dataset) {
        println!("{choice}");
    }
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        rows: args.rows,
        seed: args.seed,
        duplicates: args.duplicates,
    };
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    crate::data::write_sample(&mut lock, &config)?;
    lock.flush()
        .map_err(|e| AppError::output(format!("Failed to flush stdout: {e}")))
}

/// Rewrite argv so `superstore` defaults to `superstore dashboard`.
///
/// Rules:
/// - `superstore`                     -> `superstore dashboard`
/// - `superstore -c Furniture ...`    -> `superstore dashboard -c Furniture ...`
/// - `superstore --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("dashboard".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    // If the first token is a flag, treat it as "dashboard flags".
    if arg1.starts_with('-') {
        argv.insert(1, "dashboard".to_string());
    }

    argv
}
