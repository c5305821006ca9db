//! Turning raw file bytes into [`IngestionResult`]s.
//!
//! Every entry point here is infallible: problems are reported through the
//! result's `errors` ledger and counts, never as an `Err`.
//!
//! - [`workbook`]: `.xlsx` files, one pass per worksheet.
//! - [`delimited`]: `.csv` files in one of the two known shapes.
//! - [`sheet`]: row processing shared by every worksheet.

use chrono::NaiveDate;
use tracing::info;

use crate::detector::{detect_format, InputFormat};
use crate::models::IngestionResult;

pub mod delimited;
pub mod sheet;
pub mod workbook;

use delimited::DelimitedIngestor;
use workbook::WorkbookIngestor;

/// Debtor name used when no source yields one.
pub const UNKNOWN_DEBTOR: &str = "Unknown";

/// Detail text kept on a record, in characters.
pub const MAX_DETAIL_CHARS: usize = 500;

/// Sheets whose folded name contains any of these are never ingested:
/// templates, branch lists, archives, and other non-seizure tabs.
pub const DEFAULT_SKIP_SHEETS: &[&str] = &[
    "şablon",
    "sablon",
    "şube",
    "arşiv",
    "arsiv",
    "gm avukat",
    "borçlu bilgi",
    "devir",
    "infaz",
    "vknyok",
];

pub trait Ingestor {
    fn ingest(&self, content: &[u8]) -> IngestionResult;
}

/// Settings shared by every ingestor for one run.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// The reference day every record in the run is measured against.
    pub today: NaiveDate,
    pub skip_sheets: Vec<String>,
    /// Restrict a workbook to these sheets. Empty means all sheets.
    pub sheets: Vec<String>,
    pub delimiter: u8,
}

impl IngestOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            skip_sheets: DEFAULT_SKIP_SHEETS.iter().map(|s| s.to_string()).collect(),
            sheets: Vec::new(),
            delimiter: b',',
        }
    }
}

/// Ingest one file, choosing the protocol from its name.
pub fn ingest_file(filename: &str, content: &[u8], options: &IngestOptions) -> IngestionResult {
    let format = detect_format(filename);
    info!(file = filename, %format, bytes = content.len(), "ingesting");

    let result = match format {
        InputFormat::Delimited => DelimitedIngestor::new(options).ingest(content),
        InputFormat::Workbook => WorkbookIngestor::new(options).ingest(content),
    };

    info!(
        records = result.records.len(),
        failed = result.failed,
        errors = result.errors.len(),
        "ingestion finished"
    );
    result
}
