//! Tabular input readers.
//!
//! - [`csv`]: delimited text with a header row.
//! - [`xlsx`]: Office Open XML workbooks, one [`Table`] per worksheet.
//!
//! Both readers produce the same [`Table`] shape so the ingestors never care
//! where a row came from.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use thiserror::Error;

pub mod csv;
pub mod xlsx;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("not a readable archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed CSV: {0}")]
    Csv(#[from] ::csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("workbook part missing: {0}")]
    MissingPart(String),

    #[error("no sheet named '{0}'")]
    UnknownSheet(String),

    #[error("cell reference '{0}' is outside the worksheet grid")]
    CellReference(String),
}

/// A single cell value as read from the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// A numeric workbook cell carrying a date number format.
    Date(NaiveDateTime),
}

impl Cell {
    /// Build a text cell, mapping blank strings to [`Cell::Empty`].
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Render the cell as text. Integral numbers drop their fraction so that
    /// ID and file-number columns stored as numbers read back as digits.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) => Some(format_number(*n)),
            Cell::Bool(b) => Some(if *b { "True" } else { "False" }.to_string()),
            Cell::Date(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// A rectangular table with a header row.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
    index: HashMap<String, usize>,
}

impl Table {
    /// Build a table. Headers are trimmed, blank headers become `Unnamed: <i>`,
    /// and for duplicate names the first column wins.
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let headers: Vec<String> = headers
            .into_iter()
            .enumerate()
            .map(|(i, h)| {
                let h = h.trim();
                if h.is_empty() {
                    format!("Unnamed: {}", i)
                } else {
                    h.to_string()
                }
            })
            .collect();

        let mut index = HashMap::new();
        for (i, h) in headers.iter().enumerate() {
            index.entry(h.clone()).or_insert(i);
        }

        Self {
            name: name.into(),
            headers,
            rows,
            index,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row { table: self, cells })
    }
}

/// A borrowed view of one data row, addressable by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    cells: &'a [Cell],
}

impl<'a> Row<'a> {
    pub fn has_column(&self, name: &str) -> bool {
        self.table.has_column(name)
    }

    /// The cell under `column`; [`Cell::Empty`] for short rows or unknown columns.
    pub fn get(&self, column: &str) -> &'a Cell {
        static EMPTY: Cell = Cell::Empty;
        self.table
            .index
            .get(column)
            .and_then(|&i| self.cells.get(i))
            .unwrap_or(&EMPTY)
    }

    /// Trimmed, non-empty text of the cell under `column`.
    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column)
            .as_text()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}
