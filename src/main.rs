//! `haciz-takip`: normalize seizure exports and flag seizures about to lapse.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and set up logging.
//! 2. Load config ([`config::load_config`]).
//! 3. Pick the input protocol from the file name ([`detector::detect_format`]).
//! 4. Read tables ([`source`]) and turn rows into records ([`ingest`]), using
//!    the layout rules ([`classify`]), field extraction ([`extract`]), date
//!    normalization ([`normalize`]), and expiry calculation ([`expiry`]).
//! 5. Aggregate by risk tier ([`summary`]).
//! 6. Render the requested report and optional exports ([`report`]).
//! 7. Exit `0`, or `1` when nothing could be read at all.

mod classify;
mod cli;
mod config;
mod detector;
mod error;
mod expiry;
mod extract;
mod ingest;
mod models;
mod normalize;
mod report;
mod source;
mod summary;

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use cli::{Cli, ReportFormat};
use config::load_config;
use ingest::{ingest_file, IngestOptions};
use summary::{summarize, RecordFilter};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // One reference day for the whole run
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());

    let working_dir = std::env::current_dir()?;
    let config = load_config(&working_dir, cli.config.as_deref())?;

    let mut options = IngestOptions::new(today);
    options.skip_sheets = config.ingest.skip_sheets.clone();
    options.sheets = if cli.sheets.is_empty() {
        config.ingest.sheets.clone()
    } else {
        cli.sheets.clone()
    };
    options.delimiter = config.ingest.delimiter_byte()?;

    let content = std::fs::read(&cli.file)
        .with_context(|| format!("cannot read {}", cli.file.display()))?;
    let filename = cli.file.to_string_lossy();

    let interactive = !cli.quiet && matches!(cli.report, ReportFormat::Terminal);
    let spinner = if interactive {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
        pb.set_message(format!("Reading {}", cli.file.display()));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result = ingest_file(&filename, &content, &options);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let summary = summarize(&result.records);
    let filter = RecordFilter {
        tiers: cli.tiers.iter().map(Into::into).collect(),
        assets: cli.assets.iter().map(Into::into).collect(),
    };

    match cli.report {
        ReportFormat::Terminal => {
            report::terminal::render(
                &result,
                &summary,
                &cli.file,
                today,
                &filter,
                cli.verbose,
                cli.quiet,
            )?;
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        ReportFormat::Text => {
            print!("{}", report::text::render(&summary, today, config.report.top));
        }
    }

    if let Some(path) = &cli.export {
        report::xlsx::write(&result.records, path)?;
        if !cli.quiet {
            eprintln!("  {} export written to {}", "→".cyan(), path.display());
        }
    }

    if let Some(path) = &cli.summary {
        std::fs::write(path, report::text::render(&summary, today, config.report.top))
            .with_context(|| format!("cannot write summary to {}", path.display()))?;
        if !cli.quiet {
            eprintln!("  {} summary written to {}", "→".cyan(), path.display());
        }
    }

    // Exit code: 1 only when the file yielded nothing but errors
    if result.records.is_empty() && !result.errors.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}
