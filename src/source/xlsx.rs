//! Minimal Office Open XML (`.xlsx`) reader.
//!
//! Reads just enough of the package to turn each worksheet into a [`Table`]:
//! the sheet list and its relationships, the shared-string table, and the
//! cell styles needed to tell date cells from plain numbers. Worksheets are
//! parsed lazily so one broken sheet does not take the others down.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;
use zip::result::ZipError;
use zip::ZipArchive;

use super::{Cell, SourceError, Table};

const DEFAULT_WORKBOOK_PATH: &str = "xl/workbook.xml";

/// Largest serial Excel can represent (9999-12-31).
const MAX_SERIAL: f64 = 2_958_465.0;

/// Worksheet grid limits (`XFD1048576`).
const MAX_ROWS: u32 = 1_048_576;
const MAX_COLUMNS: usize = 16_384;

#[derive(Debug, Clone)]
struct SheetEntry {
    name: String,
    path: String,
}

/// An opened workbook. Sheet contents are read on demand with [`Workbook::read_sheet`].
pub struct Workbook<'a> {
    archive: ZipArchive<Cursor<&'a [u8]>>,
    sheets: Vec<SheetEntry>,
    shared_strings: Vec<String>,
    /// Indexed by cell style (`s` attribute): does the style format a date?
    date_styles: Vec<bool>,
    date1904: bool,
}

impl<'a> Workbook<'a> {
    /// Open a workbook from raw bytes and load its sheet list, shared strings, and styles.
    pub fn open(content: &'a [u8]) -> Result<Self, SourceError> {
        let mut archive = ZipArchive::new(Cursor::new(content))?;

        let workbook_path = read_optional_part(&mut archive, "_rels/.rels")?
            .and_then(|rels| office_document_target(&rels))
            .unwrap_or_else(|| DEFAULT_WORKBOOK_PATH.to_string());
        let (base_dir, file_name) = match workbook_path.rsplit_once('/') {
            Some((dir, file)) => (dir.to_string(), file.to_string()),
            None => (String::new(), workbook_path.clone()),
        };

        let workbook_xml = read_part(&mut archive, &workbook_path)?;
        let (declared, date1904) = parse_workbook(&workbook_xml)?;

        let rels_path = join_path(&base_dir, &format!("_rels/{}.rels", file_name));
        let targets = match read_optional_part(&mut archive, &rels_path)? {
            Some(xml) => parse_relationships(&xml)?,
            None => HashMap::new(),
        };

        let sheets = declared
            .into_iter()
            .filter_map(|(name, rel_id)| {
                let target = targets.get(&rel_id)?;
                Some(SheetEntry {
                    name,
                    path: resolve_target(&base_dir, target),
                })
            })
            .collect();

        let shared_strings = match read_optional_part(&mut archive, &join_path(&base_dir, "sharedStrings.xml"))? {
            Some(xml) => parse_shared_strings(&xml)?,
            None => Vec::new(),
        };

        let date_styles = match read_optional_part(&mut archive, &join_path(&base_dir, "styles.xml"))? {
            Some(xml) => parse_date_styles(&xml)?,
            None => Vec::new(),
        };

        Ok(Self {
            archive,
            sheets,
            shared_strings,
            date_styles,
            date1904,
        })
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    /// Parse one worksheet. The first non-empty row is the header.
    pub fn read_sheet(&mut self, name: &str) -> Result<Table, SourceError> {
        let path = self
            .sheets
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.path.clone())
            .ok_or_else(|| SourceError::UnknownSheet(name.to_string()))?;

        let xml = read_part(&mut self.archive, &path)?;
        let rows = self.parse_worksheet(&xml)?;
        debug!(sheet = name, rows = rows.len(), "worksheet parsed");
        Ok(build_table(name, rows))
    }

    fn parse_worksheet(&self, xml: &str) -> Result<Vec<(u32, Vec<Cell>)>, SourceError> {
        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();

        let mut rows: Vec<(u32, Vec<Cell>)> = Vec::new();
        let mut row_num: u32 = 0;
        let mut next_col: usize = 0;
        let mut current: Option<PendingCell> = None;
        let mut in_value = false;
        let mut in_inline_text = false;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => match e.local_name().as_ref() {
                    b"row" => {
                        row_num = row_number(e, row_num)?;
                        next_col = 0;
                        rows.push((row_num, Vec::new()));
                    }
                    b"c" => {
                        let cell = PendingCell::from_start(e, next_col)?;
                        next_col = cell.col + 1;
                        current = Some(cell);
                    }
                    b"v" => in_value = true,
                    b"t" => in_inline_text = current.is_some(),
                    _ => {}
                },
                Event::Empty(ref e) => match e.local_name().as_ref() {
                    b"row" => {
                        row_num = row_number(e, row_num)?;
                        next_col = 0;
                    }
                    b"c" => next_col = PendingCell::from_start(e, next_col)?.col + 1,
                    _ => {}
                },
                Event::Text(ref e) => {
                    if let Some(cell) = current.as_mut() {
                        if in_value {
                            cell.value.push_str(&e.unescape()?);
                        } else if in_inline_text {
                            cell.inline.push_str(&e.unescape()?);
                        }
                    }
                }
                Event::CData(ref e) => {
                    if let Some(cell) = current.as_mut() {
                        let text = String::from_utf8_lossy(&e[..]);
                        if in_value {
                            cell.value.push_str(&text);
                        } else if in_inline_text {
                            cell.inline.push_str(&text);
                        }
                    }
                }
                Event::End(ref e) => match e.local_name().as_ref() {
                    b"v" => in_value = false,
                    b"t" => in_inline_text = false,
                    b"c" => {
                        if let Some(cell) = current.take() {
                            let col = cell.col;
                            let value = self.resolve_cell(cell);
                            if let Some((_, cells)) = rows.last_mut() {
                                place(cells, col, value);
                            }
                        }
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(rows)
    }

    fn resolve_cell(&self, cell: PendingCell) -> Cell {
        let value = cell.value.trim();
        match cell.kind.as_deref() {
            Some("s") => value
                .parse::<usize>()
                .ok()
                .and_then(|i| self.shared_strings.get(i))
                .map(|s| Cell::text(s.as_str()))
                .unwrap_or(Cell::Empty),
            Some("inlineStr") => Cell::text(cell.inline),
            Some("str") => Cell::text(value),
            Some("b") => Cell::Bool(value == "1" || value.eq_ignore_ascii_case("true")),
            Some("e") => Cell::Empty,
            Some("d") => parse_iso_datetime(value).map(Cell::Date).unwrap_or(Cell::text(value)),
            _ => {
                if value.is_empty() {
                    return Cell::Empty;
                }
                let Ok(number) = value.parse::<f64>() else {
                    return Cell::text(value);
                };
                let is_date = cell
                    .style
                    .and_then(|s| self.date_styles.get(s).copied())
                    .unwrap_or(false);
                if is_date {
                    if let Some(dt) = serial_to_datetime(number, self.date1904) {
                        return Cell::Date(dt);
                    }
                }
                Cell::Number(number)
            }
        }
    }
}

/// A `<c>` element being read.
struct PendingCell {
    col: usize,
    kind: Option<String>,
    style: Option<usize>,
    value: String,
    inline: String,
}

impl PendingCell {
    /// Cells without an `r` attribute follow the previous cell of the row.
    fn from_start(e: &BytesStart<'_>, fallback_col: usize) -> Result<Self, SourceError> {
        let col = match attr(e, b"r") {
            Some(r) if r.starts_with(|c: char| c.is_ascii_alphabetic()) => {
                column_index(&r).ok_or(SourceError::CellReference(r))?
            }
            _ if fallback_col < MAX_COLUMNS => fallback_col,
            _ => return Err(SourceError::CellReference(format!("column {}", fallback_col + 1))),
        };
        Ok(Self {
            col,
            kind: attr(e, b"t"),
            style: attr(e, b"s").and_then(|s| s.parse().ok()),
            value: String::new(),
            inline: String::new(),
        })
    }
}

fn place(cells: &mut Vec<Cell>, col: usize, value: Cell) {
    if cells.len() <= col {
        cells.resize(col + 1, Cell::Empty);
    }
    cells[col] = value;
}

/// The 1-based row number of a `<row>`, or the one after `previous` when absent.
fn row_number(e: &BytesStart<'_>, previous: u32) -> Result<u32, SourceError> {
    let Some(r) = attr(e, b"r") else {
        return match previous + 1 {
            n if n <= MAX_ROWS => Ok(n),
            n => Err(SourceError::CellReference(format!("row {}", n))),
        };
    };
    match r.trim().parse::<u32>() {
        Ok(n) if (1..=MAX_ROWS).contains(&n) => Ok(n),
        _ => Err(SourceError::CellReference(r)),
    }
}

/// Assemble the table: the first row with content is the header, and data
/// rows keep their sheet positions relative to it. Rows sharing a number
/// stay in document order.
fn build_table(name: &str, rows: Vec<(u32, Vec<Cell>)>) -> Table {
    let mut rows: Vec<(u32, Vec<Cell>)> = rows
        .into_iter()
        .filter(|(_, cells)| cells.iter().any(|c| !c.is_empty()))
        .collect();
    rows.sort_by_key(|(n, _)| *n);

    let mut iter = rows.into_iter();
    let Some((header_row, header_cells)) = iter.next() else {
        return Table::new(name, Vec::new(), Vec::new());
    };

    let headers: Vec<String> = header_cells
        .iter()
        .map(|c| c.as_text().unwrap_or_default())
        .collect();

    let mut data: Vec<Vec<Cell>> = Vec::new();
    for (row_num, cells) in iter {
        let position = row_num.saturating_sub(header_row + 1) as usize;
        if data.len() < position {
            data.resize(position, Vec::new());
        }
        data.push(cells);
    }

    Table::new(name, headers, data)
}

/// `"AB12"` → 27 (zero-based column of `AB`). `None` past column `XFD`.
fn column_index(reference: &str) -> Option<usize> {
    let letters: Vec<u8> = reference
        .bytes()
        .take_while(|b| b.is_ascii_alphabetic())
        .collect();
    if letters.is_empty() || letters.len() > 3 {
        return None;
    }
    let n = letters.iter().try_fold(0usize, |acc, b| {
        acc.checked_mul(26)?
            .checked_add((b.to_ascii_uppercase() - b'A' + 1) as usize)
    })?;
    Some(n - 1).filter(|&col| col < MAX_COLUMNS)
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

fn read_part(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    path: &str,
) -> Result<String, SourceError> {
    read_optional_part(archive, path)?.ok_or_else(|| SourceError::MissingPart(path.to_string()))
}

fn read_optional_part(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    path: &str,
) -> Result<Option<String>, SourceError> {
    let mut file = match archive.by_name(path) {
        Ok(f) => f,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    Ok(Some(content))
}

fn join_path(base_dir: &str, rel: &str) -> String {
    if base_dir.is_empty() {
        rel.to_string()
    } else {
        format!("{}/{}", base_dir, rel)
    }
}

/// Relationship targets are relative to the workbook's folder unless absolute.
fn resolve_target(base_dir: &str, target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => join_path(base_dir, target),
    }
}

fn office_document_target(rels_xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(rels_xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let is_office_doc = attr(e, b"Type")
                    .map(|t| t.ends_with("/officeDocument"))
                    .unwrap_or(false);
                if is_office_doc {
                    return attr(e, b"Target").map(|t| t.trim_start_matches('/').to_string());
                }
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
        buf.clear();
    }
}

/// Sheet `(name, relationship id)` pairs and the 1904 date-system flag.
fn parse_workbook(xml: &str) -> Result<(Vec<(String, String)>, bool), SourceError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut sheets = Vec::new();
    let mut date1904 = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                b"sheet" => {
                    if let (Some(name), Some(id)) = (attr(e, b"name"), attr(e, b"id")) {
                        sheets.push((name, id));
                    }
                }
                b"workbookPr" => {
                    date1904 = attr(e, b"date1904")
                        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                        .unwrap_or(false);
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok((sheets, date1904))
}

fn parse_relationships(xml: &str) -> Result<HashMap<String, String>, SourceError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut targets = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e)
                if e.local_name().as_ref() == b"Relationship" =>
            {
                if let (Some(id), Some(target)) = (attr(e, b"Id"), attr(e, b"Target")) {
                    targets.insert(id, target);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(targets)
}

/// Shared strings, one entry per `<si>`. Rich-text runs are concatenated and
/// phonetic hints (`<rPh>`) are ignored.
fn parse_shared_strings(xml: &str) -> Result<Vec<String>, SourceError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut in_phonetic = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.local_name().as_ref() {
                b"si" => current.clear(),
                b"rPh" => in_phonetic = true,
                b"t" => in_text = !in_phonetic,
                _ => {}
            },
            Event::Empty(ref e) if e.local_name().as_ref() == b"si" => strings.push(String::new()),
            Event::Text(ref e) if in_text => current.push_str(&e.unescape()?),
            Event::CData(ref e) if in_text => current.push_str(&String::from_utf8_lossy(&e[..])),
            Event::End(ref e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"rPh" => in_phonetic = false,
                b"si" => strings.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}

/// For every entry of `<cellXfs>`, whether its number format is a date format.
fn parse_date_styles(xml: &str) -> Result<Vec<bool>, SourceError> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut custom_formats: HashMap<u32, String> = HashMap::new();
    let mut xf_formats: Vec<u32> = Vec::new();
    let mut in_cell_xfs = false;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) if e.local_name().as_ref() == b"cellXfs" => in_cell_xfs = true,
            Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                b"numFmt" => {
                    let id = attr(e, b"numFmtId").and_then(|v| v.parse().ok());
                    if let (Some(id), Some(code)) = (id, attr(e, b"formatCode")) {
                        custom_formats.insert(id, code);
                    }
                }
                b"xf" if in_cell_xfs => {
                    let id = attr(e, b"numFmtId").and_then(|v| v.parse().ok()).unwrap_or(0);
                    xf_formats.push(id);
                }
                _ => {}
            },
            Event::End(ref e) if e.local_name().as_ref() == b"cellXfs" => in_cell_xfs = false,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(xf_formats
        .into_iter()
        .map(|id| is_date_format(id, custom_formats.get(&id).map(String::as_str)))
        .collect())
}

fn is_date_format(id: u32, custom: Option<&str>) -> bool {
    match id {
        14..=22 | 27..=36 | 45..=47 | 50..=58 => true,
        _ => custom.map(is_date_format_code).unwrap_or(false),
    }
}

/// A custom format is a date format when, outside quoted literals,
/// bracketed sections, and escaped characters, it uses a date or time token.
fn is_date_format_code(code: &str) -> bool {
    let mut plain = String::new();
    let mut chars = code.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                for q in chars.by_ref() {
                    if q == '"' {
                        break;
                    }
                }
            }
            '[' => {
                for q in chars.by_ref() {
                    if q == ']' {
                        break;
                    }
                }
            }
            '\\' | '_' | '*' => {
                chars.next();
            }
            other => plain.push(other.to_ascii_lowercase()),
        }
    }
    if plain.contains("general") {
        return false;
    }
    plain.chars().any(|c| matches!(c, 'd' | 'm' | 'y' | 'h'))
}

/// Convert an Excel serial day number into a timestamp.
fn serial_to_datetime(serial: f64, date1904: bool) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..=MAX_SERIAL).contains(&serial) {
        return None;
    }
    // The 1900 system counts a non-existent 1900-02-29, so serials before it
    // are offset by one day.
    let base = if date1904 {
        NaiveDate::from_ymd_opt(1904, 1, 1)?
    } else if serial < 60.0 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };
    let days = serial.trunc() as i64;
    let seconds = (serial.fract() * 86_400.0).round() as i64;
    base.and_hms_opt(0, 0, 0)?
        .checked_add_signed(Duration::days(days))?
        .checked_add_signed(Duration::seconds(seconds))
}

fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    /// Build an in-memory `.xlsx` from `(path, xml)` parts.
    pub(crate) fn package(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buf));
            for (path, xml) in parts {
                zip.start_file(*path, SimpleFileOptions::default()).unwrap();
                zip.write_all(xml.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buf
    }

    /// A workbook with the given `(sheet name, sheetData inner XML)` sheets.
    pub(crate) fn workbook(sheets: &[(&str, &str)]) -> Vec<u8> {
        let mut sheet_entries = String::new();
        let mut rels = String::new();
        let mut sheet_xml = Vec::new();
        for (i, (name, data)) in sheets.iter().enumerate() {
            let n = i + 1;
            sheet_entries.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                name, n, n
            ));
            rels.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                n, n
            ));
            sheet_xml.push((
                format!("xl/worksheets/sheet{}.xml", n),
                format!(
                    r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
                    data
                ),
            ));
        }
        let workbook_xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{}</sheets></workbook>"#,
            sheet_entries
        );
        let rels_xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
            rels
        );
        let styles = r#"<?xml version="1.0" encoding="UTF-8"?><styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><numFmts count="1"><numFmt numFmtId="164" formatCode="dd/mm/yyyy"/></numFmts><cellStyleXfs count="1"><xf numFmtId="0"/></cellStyleXfs><cellXfs count="3"><xf numFmtId="0"/><xf numFmtId="14"/><xf numFmtId="164"/></cellXfs></styleSheet>"#;
        let shared = r#"<?xml version="1.0" encoding="UTF-8"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><si><t>DOSYA NO</t></si><si><r><t>HACİZ </t></r><r><t>TARİHİ</t></r><rPh><t>x</t></rPh></si><si><t xml:space="preserve"> 2023/77 </t></si></sst>"#;

        let mut parts: Vec<(&str, &str)> = vec![
            ("xl/workbook.xml", workbook_xml.as_str()),
            ("xl/_rels/workbook.xml.rels", rels_xml.as_str()),
            ("xl/styles.xml", styles),
            ("xl/sharedStrings.xml", shared),
        ];
        for (path, xml) in &sheet_xml {
            parts.push((path.as_str(), xml.as_str()));
        }
        package(&parts)
    }

    #[test]
    fn test_read_sheet_with_shared_strings_and_dates() {
        let data = r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" t="s"><v>1</v></c><c r="C1" t="inlineStr"><is><t>TCKN</t></is></c></row>
<row r="2"><c r="A2" t="s"><v>2</v></c><c r="B2" s="1"><v>44927</v></c><c r="C2"><v>12345678901</v></c></row>
<row r="4"><c r="B4" s="2"><v>45000.5</v></c><c r="D4" t="b"><v>1</v></c></row>"#;
        let bytes = workbook(&[("Araç Haciz", data)]);
        let mut wb = Workbook::open(&bytes).unwrap();
        assert_eq!(wb.sheet_names(), vec!["Araç Haciz"]);

        let table = wb.read_sheet("Araç Haciz").unwrap();
        assert_eq!(table.headers()[..3], ["DOSYA NO", "HACİZ TARİHİ", "TCKN"]);
        assert_eq!(table.rows.len(), 3);

        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].text("DOSYA NO").as_deref(), Some("2023/77"));
        assert_eq!(
            rows[0].get("HACİZ TARİHİ"),
            &Cell::Date(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap())
        );
        assert_eq!(rows[0].text("TCKN").as_deref(), Some("12345678901"));
        // Row 3 is missing from the sheet and kept as an empty row.
        assert!(rows[1].get("DOSYA NO").is_empty());
        assert_eq!(
            rows[2].get("HACİZ TARİHİ"),
            &Cell::Date(NaiveDate::from_ymd_opt(2023, 3, 15).unwrap().and_hms_opt(12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_unknown_and_missing_sheets() {
        let bytes = package(&[
            (
                "xl/workbook.xml",
                r#"<workbook xmlns:r="r"><sheets><sheet name="Kayıp" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
            ),
            (
                "xl/_rels/workbook.xml.rels",
                r#"<Relationships><Relationship Id="rId1" Target="worksheets/sheet1.xml"/></Relationships>"#,
            ),
        ]);
        let mut wb = Workbook::open(&bytes).unwrap();
        assert!(matches!(wb.read_sheet("Kayıp"), Err(SourceError::MissingPart(_))));
        assert!(matches!(wb.read_sheet("Yok"), Err(SourceError::UnknownSheet(_))));
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(Workbook::open(b"plain text"), Err(SourceError::Zip(_))));
    }

    #[test]
    fn test_empty_sheet() {
        let bytes = workbook(&[("Boş", "")]);
        let mut wb = Workbook::open(&bytes).unwrap();
        let table = wb.read_sheet("Boş").unwrap();
        assert!(table.is_empty());
        assert!(table.headers().is_empty());
    }

    #[test]
    fn test_column_index() {
        assert_eq!(column_index("A1"), Some(0));
        assert_eq!(column_index("Z9"), Some(25));
        assert_eq!(column_index("AB12"), Some(27));
        assert_eq!(column_index("12"), None);
        assert_eq!(column_index("XFD1"), Some(16_383));
        assert_eq!(column_index("XFE1"), None);
        assert_eq!(column_index("AAAA1"), None);
        assert_eq!(column_index("AAAAAAAAAAAAAAAAAAAA1"), None);
    }

    #[test]
    fn test_row_repeating_header_number_is_kept() {
        let data = r#"<row r="1"><c r="A1" t="inlineStr"><is><t>TAKİP TARİHİ</t></is></c></row><row r="1"><c r="A1" t="inlineStr"><is><t>2022-01-01</t></is></c></row><row r="3"><c r="A3" t="inlineStr"><is><t>2022-02-01</t></is></c></row>"#;
        let bytes = workbook(&[("Derdest", data)]);
        let table = Workbook::open(&bytes).unwrap().read_sheet("Derdest").unwrap();
        assert_eq!(table.headers(), ["TAKİP TARİHİ"]);

        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text("TAKİP TARİHİ").as_deref(), Some("2022-01-01"));
        assert_eq!(rows[1].text("TAKİP TARİHİ").as_deref(), Some("2022-02-01"));
    }

    #[test]
    fn test_references_outside_grid_fail_the_sheet() {
        let cases = [
            r#"<row r="1"><c r="AAAAAAAAAAAAAAAAAAAA1" t="inlineStr"><is><t>x</t></is></c></row>"#,
            r#"<row r="1"><c r="XFE1"><v>1</v></c></row>"#,
            r#"<row r="1048577"><c r="A1048577"><v>1</v></c></row>"#,
            r#"<row r="0"><c><v>1</v></c></row>"#,
            r#"<row r="99999999999"><c><v>1</v></c></row>"#,
        ];
        for data in cases {
            let bytes = workbook(&[("Bozuk", data)]);
            let mut wb = Workbook::open(&bytes).unwrap();
            assert!(
                matches!(wb.read_sheet("Bozuk"), Err(SourceError::CellReference(_))),
                "{}",
                data
            );
        }
    }

    #[test]
    fn test_last_row_without_number_is_rejected() {
        let data = r#"<row r="1048576"><c><v>1</v></c></row><row><c><v>2</v></c></row>"#;
        let bytes = workbook(&[("Son", data)]);
        let mut wb = Workbook::open(&bytes).unwrap();
        assert!(matches!(wb.read_sheet("Son"), Err(SourceError::CellReference(_))));
    }

    #[test]
    fn test_date_format_codes() {
        assert!(is_date_format_code("dd.mm.yyyy"));
        assert!(is_date_format_code("yyyy-mm-dd hh:mm"));
        assert!(!is_date_format_code("#,##0.00"));
        assert!(!is_date_format_code("General"));
        assert!(!is_date_format_code("0 \"days\""));
        assert!(!is_date_format_code("[Red]0.00"));
    }

    #[test]
    fn test_serial_conversion() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap().and_hms_opt(0, 0, 0).unwrap();
        assert_eq!(serial_to_datetime(1.0, false), Some(d(1900, 1, 1)));
        assert_eq!(serial_to_datetime(61.0, false), Some(d(1900, 3, 1)));
        assert_eq!(serial_to_datetime(44927.0, false), Some(d(2023, 1, 1)));
        assert_eq!(serial_to_datetime(0.0, true), Some(d(1904, 1, 1)));
        assert_eq!(serial_to_datetime(-1.0, false), None);
        assert_eq!(serial_to_datetime(f64::NAN, false), None);
    }
}
