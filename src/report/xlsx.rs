//! Spreadsheet export.
//!
//! Writes a minimal Office Open XML package by hand: one worksheet with every
//! record in export order, then "Critical" and "High" worksheets when those
//! tiers are non-empty. Text cells are inline strings, so no shared-string
//! table is needed.

use std::io::{Cursor, Write};
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::models::{RiskTier, SeizureRecord};
use crate::summary::sort_for_export;

use super::DATE_FORMAT;

pub const DEFAULT_EXPORT_PATH: &str = "haciz-report.xlsx";

const ALL_SHEET: &str = "All Seizures";
const CRITICAL_SHEET: &str = "Critical";
const HIGH_SHEET: &str = "High";

const COLUMNS: &[(&str, f32)] = &[
    ("Risk", 10.0),
    ("File No", 18.0),
    ("Debtor", 32.0),
    ("National ID", 14.0),
    ("Asset Type", 14.0),
    ("Seizure Date", 13.0),
    ("Expiry Date", 13.0),
    ("Days Left", 10.0),
    ("Source", 20.0),
];

const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const WORKSHEET_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const STYLES_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

/// Style 0 is the default, style 1 is the bold header.
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/></cellXfs></styleSheet>"#;

const HEADER_STYLE: &str = "1";

/// Write the export to `path`.
pub fn write(records: &[SeizureRecord], path: &Path) -> Result<()> {
    let bytes = to_bytes(records)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("cannot write export to {}", path.display()))?;
    Ok(())
}

/// Build the export package in memory.
pub fn to_bytes(records: &[SeizureRecord]) -> Result<Vec<u8>> {
    let sorted = sort_for_export(records);
    let by_tier = |tier: RiskTier| -> Vec<&SeizureRecord> {
        sorted.iter().copied().filter(|r| r.risk_tier == tier).collect()
    };

    let mut sheets: Vec<(&str, Vec<&SeizureRecord>)> = vec![(ALL_SHEET, sorted.clone())];
    for (name, tier) in [(CRITICAL_SHEET, RiskTier::Critical), (HIGH_SHEET, RiskTier::High)] {
        let subset = by_tier(tier);
        if !subset.is_empty() {
            sheets.push((name, subset));
        }
    }

    let mut buf = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buf));
        let options = SimpleFileOptions::default();

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(&content_types(sheets.len())?)?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(ROOT_RELS.as_bytes())?;

        zip.start_file("xl/workbook.xml", options)?;
        zip.write_all(&workbook_xml(&sheets)?)?;

        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(&workbook_rels(sheets.len())?)?;

        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(STYLES.as_bytes())?;

        for (i, (_, rows)) in sheets.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)?;
            zip.write_all(&sheet_xml(rows)?)?;
        }

        zip.finish()?;
    }
    Ok(buf)
}

fn new_writer() -> Result<Writer<Vec<u8>>> {
    let mut w = Writer::new(Vec::new());
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    Ok(w)
}

fn content_types(sheet_count: usize) -> Result<Vec<u8>> {
    let mut w = new_writer()?;
    w.write_event(Event::Start(BytesStart::new("Types").with_attributes([(
        "xmlns",
        "http://schemas.openxmlformats.org/package/2006/content-types",
    )])))?;
    w.write_event(Event::Empty(BytesStart::new("Default").with_attributes([
        ("Extension", "rels"),
        ("ContentType", "application/vnd.openxmlformats-package.relationships+xml"),
    ])))?;
    w.write_event(Event::Empty(BytesStart::new("Default").with_attributes([
        ("Extension", "xml"),
        ("ContentType", "application/xml"),
    ])))?;
    w.write_event(Event::Empty(BytesStart::new("Override").with_attributes([
        ("PartName", "/xl/workbook.xml"),
        (
            "ContentType",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml",
        ),
    ])))?;
    w.write_event(Event::Empty(BytesStart::new("Override").with_attributes([
        ("PartName", "/xl/styles.xml"),
        (
            "ContentType",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml",
        ),
    ])))?;
    for i in 1..=sheet_count {
        let part = format!("/xl/worksheets/sheet{}.xml", i);
        w.write_event(Event::Empty(BytesStart::new("Override").with_attributes([
            ("PartName", part.as_str()),
            (
                "ContentType",
                "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml",
            ),
        ])))?;
    }
    w.write_event(Event::End(BytesEnd::new("Types")))?;
    Ok(w.into_inner())
}

fn workbook_xml(sheets: &[(&str, Vec<&SeizureRecord>)]) -> Result<Vec<u8>> {
    let mut w = new_writer()?;
    w.write_event(Event::Start(
        BytesStart::new("workbook").with_attributes([("xmlns", MAIN_NS), ("xmlns:r", REL_NS)]),
    ))?;
    w.write_event(Event::Start(BytesStart::new("sheets")))?;
    for (i, (name, _)) in sheets.iter().enumerate() {
        let id = (i + 1).to_string();
        let rel = format!("rId{}", i + 1);
        w.write_event(Event::Empty(BytesStart::new("sheet").with_attributes([
            ("name", *name),
            ("sheetId", id.as_str()),
            ("r:id", rel.as_str()),
        ])))?;
    }
    w.write_event(Event::End(BytesEnd::new("sheets")))?;
    w.write_event(Event::End(BytesEnd::new("workbook")))?;
    Ok(w.into_inner())
}

fn workbook_rels(sheet_count: usize) -> Result<Vec<u8>> {
    let mut w = new_writer()?;
    w.write_event(Event::Start(
        BytesStart::new("Relationships").with_attributes([("xmlns", PKG_REL_NS)]),
    ))?;
    for i in 1..=sheet_count {
        let id = format!("rId{}", i);
        let target = format!("worksheets/sheet{}.xml", i);
        w.write_event(Event::Empty(BytesStart::new("Relationship").with_attributes([
            ("Id", id.as_str()),
            ("Type", WORKSHEET_REL),
            ("Target", target.as_str()),
        ])))?;
    }
    let styles_id = format!("rId{}", sheet_count + 1);
    w.write_event(Event::Empty(BytesStart::new("Relationship").with_attributes([
        ("Id", styles_id.as_str()),
        ("Type", STYLES_REL),
        ("Target", "styles.xml"),
    ])))?;
    w.write_event(Event::End(BytesEnd::new("Relationships")))?;
    Ok(w.into_inner())
}

fn sheet_xml(records: &[&SeizureRecord]) -> Result<Vec<u8>> {
    let mut w = new_writer()?;
    w.write_event(Event::Start(
        BytesStart::new("worksheet").with_attributes([("xmlns", MAIN_NS)]),
    ))?;

    w.write_event(Event::Start(BytesStart::new("cols")))?;
    for (i, (_, width)) in COLUMNS.iter().enumerate() {
        let col = (i + 1).to_string();
        let width = width.to_string();
        w.write_event(Event::Empty(BytesStart::new("col").with_attributes([
            ("min", col.as_str()),
            ("max", col.as_str()),
            ("width", width.as_str()),
            ("customWidth", "1"),
        ])))?;
    }
    w.write_event(Event::End(BytesEnd::new("cols")))?;

    w.write_event(Event::Start(BytesStart::new("sheetData")))?;

    start_row(&mut w, 1)?;
    for (col, (title, _)) in COLUMNS.iter().enumerate() {
        text_cell(&mut w, col, 1, title, Some(HEADER_STYLE))?;
    }
    w.write_event(Event::End(BytesEnd::new("row")))?;

    for (i, record) in records.iter().enumerate() {
        let row = i + 2;
        start_row(&mut w, row)?;
        text_cell(&mut w, 0, row, &record.risk_tier.to_string(), None)?;
        text_cell(&mut w, 1, row, &record.file_number, None)?;
        text_cell(&mut w, 2, row, &record.debtor_name, None)?;
        text_cell(&mut w, 3, row, record.national_id.as_deref().unwrap_or_default(), None)?;
        text_cell(&mut w, 4, row, &record.asset_category.to_string(), None)?;
        text_cell(&mut w, 5, row, &record.seizure_date.format(DATE_FORMAT).to_string(), None)?;
        text_cell(&mut w, 6, row, &record.expiry_date.format(DATE_FORMAT).to_string(), None)?;
        number_cell(&mut w, 7, row, record.days_remaining)?;
        text_cell(&mut w, 8, row, &record.source_sheet, None)?;
        w.write_event(Event::End(BytesEnd::new("row")))?;
    }

    w.write_event(Event::End(BytesEnd::new("sheetData")))?;
    w.write_event(Event::End(BytesEnd::new("worksheet")))?;
    Ok(w.into_inner())
}

fn start_row(w: &mut Writer<Vec<u8>>, row: usize) -> Result<()> {
    let r = row.to_string();
    w.write_event(Event::Start(BytesStart::new("row").with_attributes([("r", r.as_str())])))?;
    Ok(())
}

fn text_cell(
    w: &mut Writer<Vec<u8>>,
    col: usize,
    row: usize,
    value: &str,
    style: Option<&str>,
) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    let reference = cell_ref(col, row);
    let mut cell = BytesStart::new("c");
    cell.push_attribute(("r", reference.as_str()));
    cell.push_attribute(("t", "inlineStr"));
    if let Some(s) = style {
        cell.push_attribute(("s", s));
    }
    w.write_event(Event::Start(cell))?;
    w.write_event(Event::Start(BytesStart::new("is")))?;
    w.write_event(Event::Start(
        BytesStart::new("t").with_attributes([("xml:space", "preserve")]),
    ))?;
    w.write_event(Event::Text(BytesText::new(value)))?;
    w.write_event(Event::End(BytesEnd::new("t")))?;
    w.write_event(Event::End(BytesEnd::new("is")))?;
    w.write_event(Event::End(BytesEnd::new("c")))?;
    Ok(())
}

fn number_cell(w: &mut Writer<Vec<u8>>, col: usize, row: usize, value: i64) -> Result<()> {
    let reference = cell_ref(col, row);
    let value = value.to_string();
    w.write_event(Event::Start(
        BytesStart::new("c").with_attributes([("r", reference.as_str())]),
    ))?;
    w.write_event(Event::Start(BytesStart::new("v")))?;
    w.write_event(Event::Text(BytesText::new(&value)))?;
    w.write_event(Event::End(BytesEnd::new("v")))?;
    w.write_event(Event::End(BytesEnd::new("c")))?;
    Ok(())
}

/// Zero-based column and one-based row to an `A1` reference. The export
/// never goes past column Z.
fn cell_ref(col: usize, row: usize) -> String {
    format!("{}{}", char::from(b'A' + col as u8), row)
}
