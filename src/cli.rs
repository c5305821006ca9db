use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::models::{AssetCategory, RiskTier};

#[derive(Parser, Debug)]
#[command(
    name = "haciz-takip",
    about = "Normalize seizure (haciz) exports and track statutory expiry risk",
    version
)]
pub struct Cli {
    /// Workbook (.xlsx) or CSV export to ingest
    pub file: PathBuf,

    /// Reference date for days-remaining, YYYY-MM-DD [default: today]
    #[arg(long, value_name = "DATE")]
    pub today: Option<NaiveDate>,

    /// Config file [default: ./.haciz-takip/config.toml, fallback ~/.config/haciz-takip/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Spreadsheet export path; use without value to default to haciz-report.xlsx
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = crate::report::xlsx::DEFAULT_EXPORT_PATH)]
    pub export: Option<PathBuf>,

    /// Also write the plain-text summary to this file
    #[arg(long, value_name = "FILE")]
    pub summary: Option<PathBuf>,

    /// Only read this sheet (repeatable); overrides the config file
    #[arg(long = "sheet", value_name = "NAME")]
    pub sheets: Vec<String>,

    /// List only seizures in this risk tier (repeatable)
    #[arg(long = "tier", value_name = "TIER")]
    pub tiers: Vec<TierArg>,

    /// List only seizures of this asset category (repeatable)
    #[arg(long = "asset", value_name = "ASSET")]
    pub assets: Vec<AssetArg>,

    /// Show every record, not just Critical and High
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
    Text,
}

#[derive(Debug, Clone, PartialEq, clap::ValueEnum)]
pub enum TierArg {
    Critical,
    High,
    Medium,
    Low,
    Safe,
}

impl From<&TierArg> for RiskTier {
    fn from(arg: &TierArg) -> Self {
        match arg {
            TierArg::Critical => RiskTier::Critical,
            TierArg::High => RiskTier::High,
            TierArg::Medium => RiskTier::Medium,
            TierArg::Low => RiskTier::Low,
            TierArg::Safe => RiskTier::Safe,
        }
    }
}

#[derive(Debug, Clone, PartialEq, clap::ValueEnum)]
pub enum AssetArg {
    RealEstate,
    Vehicle,
    Movable,
    BankAccount,
    Other,
}

impl From<&AssetArg> for AssetCategory {
    fn from(arg: &AssetArg) -> Self {
        match arg {
            AssetArg::RealEstate => AssetCategory::RealEstate,
            AssetArg::Vehicle => AssetCategory::Vehicle,
            AssetArg::Movable => AssetCategory::Movable,
            AssetArg::BankAccount => AssetCategory::BankAccount,
            AssetArg::Other => AssetCategory::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["haciz-takip", "haciz.xlsx"]).unwrap();
        assert_eq!(cli.file, PathBuf::from("haciz.xlsx"));
        assert!(cli.today.is_none());
        assert!(matches!(cli.report, ReportFormat::Terminal));
        assert!(cli.export.is_none());
        assert!(cli.sheets.is_empty());
        assert!(cli.tiers.is_empty());
        assert!(cli.assets.is_empty());
    }

    #[test]
    fn test_listing_filters() {
        let cli = Cli::try_parse_from([
            "haciz-takip",
            "haciz.xlsx",
            "--tier",
            "critical",
            "--tier",
            "high",
            "--asset",
            "real-estate",
            "--asset",
            "bank-account",
        ])
        .unwrap();
        assert_eq!(cli.tiers, vec![TierArg::Critical, TierArg::High]);
        let assets: Vec<AssetCategory> = cli.assets.iter().map(Into::into).collect();
        assert_eq!(assets, vec![AssetCategory::RealEstate, AssetCategory::BankAccount]);
        assert!(Cli::try_parse_from(["haciz-takip", "a.xlsx", "--tier", "urgent"]).is_err());
    }

    #[test]
    fn test_export_without_value() {
        let cli = Cli::try_parse_from(["haciz-takip", "haciz.xlsx", "--export"]).unwrap();
        assert_eq!(cli.export, Some(PathBuf::from("haciz-report.xlsx")));
    }

    #[test]
    fn test_full_invocation() {
        let cli = Cli::try_parse_from([
            "haciz-takip",
            "varliklar.csv",
            "--today",
            "2024-01-31",
            "--report",
            "json",
            "--export",
            "out.xlsx",
            "--sheet",
            "Derdest",
            "--sheet",
            "Ticari",
            "-q",
        ])
        .unwrap();
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2024, 1, 31));
        assert!(matches!(cli.report, ReportFormat::Json));
        assert_eq!(cli.export, Some(PathBuf::from("out.xlsx")));
        assert_eq!(cli.sheets, vec!["Derdest", "Ticari"]);
        assert!(cli.quiet);
    }

    #[test]
    fn test_bad_date_rejected() {
        assert!(Cli::try_parse_from(["haciz-takip", "a.xlsx", "--today", "31.01.2024"]).is_err());
    }
}
