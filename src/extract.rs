//! Field extraction from a single row.
//!
//! Every field is resolved by its own ordered list of sources. The first source
//! that yields a non-empty value wins and nothing later can overwrite it:
//!
//! | field       | sources, in order                                             |
//! |-------------|---------------------------------------------------------------|
//! | debtor      | debtor columns → detail text                                  |
//! | file number | file-number columns → detail text                             |
//! | national ID | ID embedded in the debtor column → ID columns → detail text  |
//!
//! Detail-text debtor and file-number extraction only runs on structured
//! `KEY: value | KEY: value` text, i.e. when the text contains a `|`.

use chrono::NaiveDate;

use crate::classify::layout::LayoutRules;
use crate::normalize::date::parse_date;
use crate::normalize::text::is_ascii_digits;
use crate::source::Row;

pub const DETAIL_COLUMN: &str = "detaylar";

const DEBTOR_COLUMNS: &[&str] = &[
    "BORÇLU İSMİ",
    "Borçlu",
    "BORÇLULAR",
    "Müşteri Ad Soyad/Unvan",
    "ANA KREDİ BORÇLUSU",
];

const FILE_NUMBER_COLUMNS: &[&str] = &["DOSYA NO", "Dosya No", "İcra Dosya No", "ESAS_NO", "Esas No"];

const NATIONAL_ID_COLUMNS: &[&str] = &["TCKN", "TC_NO", "Borçlu TCKN/VKN"];

/// Date columns tried after the layout's own date column.
const FALLBACK_DATE_COLUMNS: &[&str] = &[
    "HACİZ TARİHİ",
    "HACIZ TARİHİ",
    "Haciz Tarihi",
    "TAKİP TARİHİ",
    "Takip Tarihi",
    "EKLEME_TARIHI",
    "Takibe Geçiş Tarihi",
];

const STRUCTURED_DETAIL_DELIMITER: char = '|';

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub debtor: Option<String>,
    pub file_number: Option<String>,
    pub national_id: Option<String>,
}

/// Everything a field source may look at.
pub struct RowContext<'a> {
    pub row: Row<'a>,
    pub rules: &'a LayoutRules,
    pub detail: Option<String>,
}

impl<'a> RowContext<'a> {
    pub fn new(row: Row<'a>, rules: &'a LayoutRules) -> Self {
        let detail = row.get(DETAIL_COLUMN).as_text();
        Self { row, rules, detail }
    }

    fn structured_detail(&self) -> Option<&str> {
        self.detail
            .as_deref()
            .filter(|d| d.contains(STRUCTURED_DETAIL_DELIMITER))
    }
}

type FieldSource = fn(&RowContext<'_>) -> Option<String>;

const DEBTOR_SOURCES: &[FieldSource] = &[debtor_from_columns, debtor_from_detail];
const FILE_NUMBER_SOURCES: &[FieldSource] = &[file_number_from_columns, file_number_from_detail];
const NATIONAL_ID_SOURCES: &[FieldSource] = &[
    national_id_from_debtor_column,
    national_id_from_columns,
    national_id_from_detail,
];

/// Run each field's pipeline over one row.
pub fn extract_fields(ctx: &RowContext<'_>) -> ExtractedFields {
    ExtractedFields {
        debtor: resolve(DEBTOR_SOURCES, ctx),
        file_number: resolve(FILE_NUMBER_SOURCES, ctx),
        national_id: resolve(NATIONAL_ID_SOURCES, ctx),
    }
}

/// Only the detail-text sources. Used for exports whose other columns are
/// not seizure fields.
pub fn extract_detail_fields(ctx: &RowContext<'_>) -> ExtractedFields {
    ExtractedFields {
        debtor: debtor_from_detail(ctx),
        file_number: file_number_from_detail(ctx),
        national_id: national_id_from_detail(ctx),
    }
}

fn resolve(sources: &[FieldSource], ctx: &RowContext<'_>) -> Option<String> {
    sources.iter().find_map(|source| source(ctx))
}

/// The layout's date column first, then the shared fallbacks; the first
/// column that parses wins.
pub fn resolve_date(row: &Row<'_>, rules: &LayoutRules) -> Option<NaiveDate> {
    std::iter::once(rules.date_column)
        .chain(FALLBACK_DATE_COLUMNS.iter().copied())
        .filter(|col| row.has_column(col))
        .find_map(|col| parse_date(row.get(col)))
}

/// `true` for 10 (tax number) or 11 (citizen number) ASCII digits.
pub fn is_valid_national_id(value: &str) -> bool {
    is_ascii_digits(value) && matches!(value.len(), 10 | 11)
}

fn first_column(row: &Row<'_>, columns: &[&str]) -> Option<String> {
    columns.iter().find_map(|col| row.text(col))
}

/// Some exports write the debtor as `"<id> - <name>"`. Returns the name
/// and, when the left side is all digits, the left side.
fn split_debtor(value: &str) -> (String, Option<String>) {
    let parts: Vec<&str> = value.split(" - ").collect();
    match parts.as_slice() {
        [id, name] if is_ascii_digits(id) => (name.trim().to_string(), Some(id.to_string())),
        _ => (value.to_string(), None),
    }
}

fn debtor_column(ctx: &RowContext<'_>) -> Option<(String, Option<String>)> {
    first_column(&ctx.row, DEBTOR_COLUMNS).map(|v| split_debtor(&v))
}

fn debtor_from_columns(ctx: &RowContext<'_>) -> Option<String> {
    debtor_column(ctx)
        .map(|(name, _)| name)
        .filter(|name| !name.is_empty())
}

fn national_id_from_debtor_column(ctx: &RowContext<'_>) -> Option<String> {
    debtor_column(ctx)
        .and_then(|(_, id)| id)
        .filter(|id| is_valid_national_id(id))
}

fn file_number_from_columns(ctx: &RowContext<'_>) -> Option<String> {
    first_column(&ctx.row, FILE_NUMBER_COLUMNS)
}

fn national_id_from_columns(ctx: &RowContext<'_>) -> Option<String> {
    NATIONAL_ID_COLUMNS
        .iter()
        .filter_map(|col| ctx.row.text(col))
        .find(|v| is_valid_national_id(v))
}

fn capture(pattern: Option<&regex::Regex>, text: &str) -> Option<String> {
    pattern?
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn debtor_from_detail(ctx: &RowContext<'_>) -> Option<String> {
    capture(ctx.rules.debtor_pattern.as_ref(), ctx.structured_detail()?)
}

fn file_number_from_detail(ctx: &RowContext<'_>) -> Option<String> {
    capture(ctx.rules.file_number_pattern.as_ref(), ctx.structured_detail()?)
}

fn national_id_from_detail(ctx: &RowContext<'_>) -> Option<String> {
    capture(ctx.rules.national_id_pattern.as_ref(), ctx.detail.as_deref()?)
        .filter(|id| is_valid_national_id(id))
}
