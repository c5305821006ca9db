use csv::ReaderBuilder;
use tracing::debug;

use super::{Cell, SourceError, Table};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reads delimited text with a header row into a [`Table`].
pub struct CsvReader {
    delimiter: u8,
}

impl CsvReader {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Parse `content` into a table named `name`.
    ///
    /// Rows may be ragged. A row the parser cannot decode is logged and
    /// dropped; only an unreadable header fails the whole table.
    pub fn read_table(&self, name: &str, content: &[u8]) -> Result<Table, SourceError> {
        let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(content);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut rows = Vec::new();
        for (i, result) in reader.records().enumerate() {
            match result {
                Ok(record) => rows.push(record.iter().map(Cell::text).collect()),
                Err(e) => debug!(table = name, row = i, error = %e, "skipping undecodable CSV row"),
            }
        }

        Ok(Table::new(name, headers, rows))
    }
}
