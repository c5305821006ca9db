use tracing::debug;

use crate::classify::asset::classify_asset;
use crate::classify::layout::{classify_layout, LayoutRules};
use crate::error::IngestError;
use crate::expiry::ExpiryCalculator;
use crate::extract::{extract_fields, resolve_date, RowContext};
use crate::models::{AssetCategory, SeizureRecord};
use crate::normalize::text::truncate_chars;
use crate::source::{Row, Table};

use super::{MAX_DETAIL_CHARS, UNKNOWN_DEBTOR};

/// Convert one worksheet into records.
///
/// Layout and asset category are decided once from the sheet name. Rows
/// without a resolvable date are dropped silently; rows that fail for any
/// other reason are logged and skipped.
pub fn process_table(table: &Table, calculator: &ExpiryCalculator) -> Vec<SeizureRecord> {
    let rules = classify_layout(&table.name).rules();
    let category = classify_asset(&table.name, "");
    debug!(
        sheet = %table.name,
        layout = %rules.kind,
        %category,
        columns = ?table.headers(),
        rows = table.rows.len(),
        "processing sheet"
    );

    let mut records = Vec::new();
    for (index, row) in table.rows().enumerate() {
        match process_row(&table.name, index, row, rules, category, calculator) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e) => debug!(sheet = %table.name, row = index, error = %e, "skipping row"),
        }
    }
    records
}

fn process_row(
    sheet: &str,
    index: usize,
    row: Row<'_>,
    rules: &LayoutRules,
    category: AssetCategory,
    calculator: &ExpiryCalculator,
) -> Result<Option<SeizureRecord>, IngestError> {
    let Some(seizure_date) = resolve_date(&row, rules) else {
        return Ok(None);
    };

    let ctx = RowContext::new(row, rules);
    let fields = extract_fields(&ctx);
    let assessment = calculator.compute(seizure_date, category)?;

    Ok(Some(SeizureRecord {
        file_number: fields
            .file_number
            .unwrap_or_else(|| format!("{}_{}", sheet, index)),
        debtor_name: fields
            .debtor
            .unwrap_or_else(|| UNKNOWN_DEBTOR.to_string()),
        national_id: fields.national_id,
        asset_category: category,
        seizure_date,
        expiry_date: assessment.expiry_date,
        days_remaining: assessment.days_remaining,
        risk_tier: assessment.risk_tier,
        detail: truncate_chars(ctx.detail.as_deref().unwrap_or_default(), MAX_DETAIL_CHARS),
        source_sheet: sheet.to_string(),
    }))
}
