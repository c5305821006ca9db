//! Delimited (`.csv`) exports.
//!
//! Two shapes are recognized by their columns:
//!
//! - **legal actions**: `islem_tarihi` and `risk_seviyesi` are present. Risk is
//!   already computed upstream and taken as-is.
//! - **assets**: a `detaylar` column of `KEY: value | KEY: value` text. Fields
//!   and the follow-up date are parsed from that text and risk is computed here.
//!
//! Files in any other shape yield no records and no error.

use std::sync::OnceLock;

use chrono::{Days, NaiveDate};
use regex::Regex;
use tracing::debug;

use crate::classify::layout::LayoutKind;
use crate::error::IngestError;
use crate::expiry::{ExpiryCalculator, STANDARD_PERIOD_DAYS};
use crate::extract::{extract_detail_fields, RowContext, DETAIL_COLUMN};
use crate::models::{AssetCategory, IngestionResult, RiskTier, SeizureRecord};
use crate::normalize::date::{parse_date, parse_date_str};
use crate::normalize::text::{fold, truncate_chars};
use crate::source::csv::CsvReader;
use crate::source::{Row, Table};

use super::{IngestOptions, Ingestor, MAX_DETAIL_CHARS, UNKNOWN_DEBTOR};

const TABLE_NAME: &str = "CSV";
const DEFAULT_SOURCE: &str = "CSV";
const IMPORTED_DEBTOR: &str = "CSV Import";

const ACTION_DATE_COLUMN: &str = "islem_tarihi";
const RISK_COLUMN: &str = "risk_seviyesi";
const DAYS_COLUMN: &str = "kalan_gun";
const EXPIRY_COLUMN: &str = "dusme_tarihi";
const ID_COLUMN: &str = "dosya_id";
const DESCRIPTION_COLUMN: &str = "aciklama";
const SOURCE_COLUMN: &str = "kaynak";
const ASSET_TYPE_COLUMN: &str = "varlik_tipi";

/// Upstream risk labels, matched after folding.
const RISK_LABELS: &[(&str, RiskTier)] = &[
    ("kritik", RiskTier::Critical),
    ("yüksek", RiskTier::High),
    ("orta", RiskTier::Medium),
    ("düşük", RiskTier::Low),
    ("güvenli", RiskTier::Safe),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    LegalActions,
    Assets,
    Unknown,
}

fn detect_shape(table: &Table) -> Shape {
    if table.has_column(ACTION_DATE_COLUMN) && table.has_column(RISK_COLUMN) {
        Shape::LegalActions
    } else if table.has_column(DETAIL_COLUMN) {
        Shape::Assets
    } else {
        Shape::Unknown
    }
}

pub struct DelimitedIngestor {
    calculator: ExpiryCalculator,
    reader: CsvReader,
}

impl DelimitedIngestor {
    pub fn new(options: &IngestOptions) -> Self {
        Self {
            calculator: ExpiryCalculator::new(options.today),
            reader: CsvReader::new(options.delimiter),
        }
    }

    fn read(&self, content: &[u8]) -> Result<Vec<SeizureRecord>, IngestError> {
        let table = self.reader.read_table(TABLE_NAME, content)?;
        let shape = detect_shape(&table);
        debug!(?shape, rows = table.rows.len(), "delimited file shape");

        let mut records = Vec::new();
        for (index, row) in table.rows().enumerate() {
            let outcome = match shape {
                Shape::LegalActions => legal_action_record(index, row),
                Shape::Assets => self.asset_record(index, row),
                Shape::Unknown => break,
            };
            match outcome {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => debug!(row = index, error = %e, "skipping row"),
            }
        }
        Ok(records)
    }

    fn asset_record(&self, index: usize, row: Row<'_>) -> Result<Option<SeizureRecord>, IngestError> {
        let ctx = RowContext::new(row, LayoutKind::Derdest.rules());
        let detail = ctx.detail.clone().unwrap_or_default();

        let Some(seizure_date) = follow_up_date(&detail) else {
            return Ok(None);
        };

        let category = row
            .text(ASSET_TYPE_COLUMN)
            .map(|label| AssetCategory::from_label(&label))
            .unwrap_or(AssetCategory::Other);
        let assessment = self.calculator.compute(seizure_date, category)?;
        let fields = extract_detail_fields(&ctx);

        Ok(Some(SeizureRecord {
            file_number: fields.file_number.unwrap_or_else(|| index.to_string()),
            debtor_name: fields
                .debtor
                .unwrap_or_else(|| UNKNOWN_DEBTOR.to_string()),
            national_id: fields.national_id,
            asset_category: category,
            seizure_date,
            expiry_date: assessment.expiry_date,
            days_remaining: assessment.days_remaining,
            risk_tier: assessment.risk_tier,
            detail: truncate_chars(&detail, MAX_DETAIL_CHARS),
            source_sheet: source_of(&row),
        }))
    }
}

impl Ingestor for DelimitedIngestor {
    fn ingest(&self, content: &[u8]) -> IngestionResult {
        match self.read(content) {
            Ok(records) => IngestionResult {
                succeeded: records.len(),
                failed: 0,
                total: records.len(),
                records,
                errors: Vec::new(),
            },
            Err(e) => IngestionResult::failure(e.to_string()),
        }
    }
}

fn legal_action_record(index: usize, row: Row<'_>) -> Result<Option<SeizureRecord>, IngestError> {
    let Some(seizure_date) = parse_date(row.get(ACTION_DATE_COLUMN)) else {
        return Ok(None);
    };

    let risk_tier = row
        .text(RISK_COLUMN)
        .and_then(|label| risk_from_label(&label))
        .unwrap_or(RiskTier::Safe);
    let days_remaining = whole_days(&row)?;
    let expiry_date = match parse_date(row.get(EXPIRY_COLUMN)) {
        Some(date) => date,
        None => seizure_date
            .checked_add_days(Days::new(STANDARD_PERIOD_DAYS))
            .ok_or(IngestError::DateOverflow(seizure_date))?,
    };

    Ok(Some(SeizureRecord {
        file_number: row.text(ID_COLUMN).unwrap_or_else(|| index.to_string()),
        debtor_name: IMPORTED_DEBTOR.to_string(),
        national_id: None,
        asset_category: AssetCategory::Other,
        seizure_date,
        expiry_date,
        days_remaining,
        risk_tier,
        detail: row
            .get(DESCRIPTION_COLUMN)
            .as_text()
            .map(|d| truncate_chars(&d, MAX_DETAIL_CHARS))
            .unwrap_or_default(),
        source_sheet: source_of(&row),
    }))
}

fn risk_from_label(label: &str) -> Option<RiskTier> {
    let folded = fold(label.trim());
    RISK_LABELS
        .iter()
        .find(|(name, _)| fold(name) == folded)
        .map(|&(_, tier)| tier)
}

/// `kalan_gun` as a whole number; a missing value counts as zero.
fn whole_days(row: &Row<'_>) -> Result<i64, IngestError> {
    let Some(raw) = row.text(DAYS_COLUMN) else {
        return Ok(0);
    };
    if let Ok(days) = raw.parse::<i64>() {
        return Ok(days);
    }
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() && n.fract() == 0.0 => Ok(n as i64),
        _ => Err(IngestError::InvalidNumber {
            column: DAYS_COLUMN,
            value: raw,
        }),
    }
}

fn source_of(row: &Row<'_>) -> String {
    row.text(SOURCE_COLUMN)
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string())
}

/// The `TAKİP TARİHİ: YYYY-MM-DD` entry embedded in asset detail text.
fn follow_up_date(detail: &str) -> Option<NaiveDate> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"TAKİP TARİHİ:\s*(\d{4}-\d{2}-\d{2})").expect("follow-up date pattern must compile")
    });
    re.captures(detail)
        .and_then(|caps| caps.get(1))
        .and_then(|m| parse_date_str(m.as_str()))
}
