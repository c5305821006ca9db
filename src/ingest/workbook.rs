use tracing::{debug, info, warn};

use crate::expiry::ExpiryCalculator;
use crate::models::IngestionResult;
use crate::normalize::text::fold;
use crate::source::xlsx::Workbook;

use super::sheet::process_table;
use super::{IngestOptions, Ingestor};

/// Ingests every eligible worksheet of an `.xlsx` workbook.
pub struct WorkbookIngestor {
    calculator: ExpiryCalculator,
    skip_sheets: Vec<String>,
    selected: Vec<String>,
}

impl WorkbookIngestor {
    pub fn new(options: &IngestOptions) -> Self {
        Self {
            calculator: ExpiryCalculator::new(options.today),
            skip_sheets: options.skip_sheets.iter().map(|s| fold(s)).collect(),
            selected: options.sheets.clone(),
        }
    }

    fn is_skipped(&self, sheet: &str) -> bool {
        let folded = fold(sheet);
        self.skip_sheets.iter().any(|s| folded.contains(s.as_str()))
    }
}

impl Ingestor for WorkbookIngestor {
    fn ingest(&self, content: &[u8]) -> IngestionResult {
        let mut workbook = match Workbook::open(content) {
            Ok(wb) => wb,
            Err(e) => {
                warn!(error = %e, "cannot open workbook");
                return IngestionResult::failure(format!("File read error: {}", e));
            }
        };

        let sheets = if self.selected.is_empty() {
            workbook.sheet_names()
        } else {
            self.selected.clone()
        };

        let mut result = IngestionResult::default();

        for sheet in &sheets {
            if self.is_skipped(sheet) {
                debug!(sheet = %sheet, "sheet on skip list");
                continue;
            }

            let table = match workbook.read_sheet(sheet) {
                Ok(table) => table,
                Err(e) => {
                    warn!(sheet = %sheet, error = %e, "sheet failed");
                    result.errors.push(format!("{}: {}", sheet, e));
                    result.failed += 1;
                    continue;
                }
            };

            if table.is_empty() {
                debug!(sheet = %sheet, "sheet has no data rows");
                continue;
            }

            let records = process_table(&table, &self.calculator);
            info!(sheet = %sheet, records = records.len(), "sheet ingested");
            result.succeeded += records.len();
            result.records.extend(records);
        }

        result.total = result.succeeded + result.failed;
        result
    }
}
