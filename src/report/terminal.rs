use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{IngestionResult, RiskTier, SeizureRecord};
use crate::summary::{filter_records, RecordFilter, RiskSummary};

use super::DATE_FORMAT;

/// Render a colored terminal report.
pub fn render(
    result: &IngestionResult,
    summary: &RiskSummary<'_>,
    path: &Path,
    today: NaiveDate,
    filter: &RecordFilter,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    if quiet {
        println!(
            "Total: {}  Critical: {}  High: {}  Medium: {}  Low: {}  Safe: {}  Errors: {}",
            summary.total,
            summary.critical.to_string().red(),
            summary.high.to_string().yellow(),
            summary.medium,
            summary.low,
            summary.safe.to_string().green(),
            result.errors.len(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}",
        "haciz-takip".bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(" File : {}", path.display());
    println!(" Today: {}\n", today.format(DATE_FORMAT));

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(
        " │  {:<48} │",
        format!("Seizures : {}   Sheet errors : {}", summary.total, result.failed)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Critical (≤30 days)  : {:>5}", "✗".red(), summary.critical)
    );
    println!(
        " │  {:<48} │",
        format!("{}  High     (≤90 days)  : {:>5}", "⚠".yellow(), summary.high)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Medium   (≤180 days) : {:>5}", "•".blue(), summary.medium)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Low      (≤365 days) : {:>5}", "•".cyan(), summary.low)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Safe                 : {:>5}", "✓".green(), summary.safe)
    );
    println!(" ├────────────────────────────────────────────────────┤");
    for (category, count) in &summary.by_category {
        println!(" │  {:<48} │", format!("   {:<19}: {:>5}", category.to_string(), count));
    }
    println!(" └────────────────────────────────────────────────────┘\n");

    if !result.errors.is_empty() {
        println!(" {} Problems while reading the file:\n", "[ERROR]".red().bold());
        for error in &result.errors {
            println!("   - {}", error);
        }
        println!();
    }

    if !summary.critical_list.is_empty() {
        println!(" {} Seizures lapsing within 30 days:\n", "[CRITICAL]".red().bold());
        render_table(&summary.critical_list);
        println!();
    }

    if !summary.high_list.is_empty() {
        println!(" {} Seizures lapsing within 90 days:\n", "[HIGH]".yellow().bold());
        render_table(&summary.high_list);
        println!();
    }

    if filter.is_active() {
        let listing = filter_records(&result.records, filter);
        println!(
            " {} {} of {} seizures match the filters:\n",
            "[LIST]".cyan().bold(),
            listing.len(),
            result.records.len()
        );
        if !listing.is_empty() {
            render_table(&listing);
            println!();
        }
    } else if verbose && !result.records.is_empty() {
        println!(" {} All seizures:\n", "[ALL]".green().bold());
        render_table(&filter_records(&result.records, filter));
        println!();
    }

    Ok(())
}

fn render_table(records: &[&SeizureRecord]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("File No").add_attribute(Attribute::Bold),
            Cell::new("Debtor").add_attribute(Attribute::Bold),
            Cell::new("Asset").add_attribute(Attribute::Bold),
            Cell::new("Seized").add_attribute(Attribute::Bold),
            Cell::new("Expires").add_attribute(Attribute::Bold),
            Cell::new("Days Left").add_attribute(Attribute::Bold),
            Cell::new("Risk").add_attribute(Attribute::Bold),
            Cell::new("Source").add_attribute(Attribute::Bold),
        ]);

    for record in records {
        table.add_row(vec![
            Cell::new(&record.file_number),
            Cell::new(&record.debtor_name),
            Cell::new(record.asset_category.to_string()),
            Cell::new(record.seizure_date.format(DATE_FORMAT).to_string()),
            Cell::new(record.expiry_date.format(DATE_FORMAT).to_string()),
            Cell::new(record.days_remaining).set_alignment(CellAlignment::Right),
            Cell::new(record.risk_tier.to_string())
                .fg(tier_color(record.risk_tier))
                .set_alignment(CellAlignment::Center),
            Cell::new(&record.source_sheet),
        ]);
    }

    println!("{}", table);
}

fn tier_color(tier: RiskTier) -> Color {
    match tier {
        RiskTier::Critical => Color::Red,
        RiskTier::High => Color::Yellow,
        RiskTier::Medium => Color::Blue,
        RiskTier::Low => Color::Cyan,
        RiskTier::Safe => Color::Green,
    }
}
