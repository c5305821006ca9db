//! Report renderers for ingestion results.
//!
//! - [`terminal`]: colored summary box and tables; respects `--verbose` / `--quiet`.
//! - [`text`]: plain-text summary of the most urgent files.
//! - [`xlsx`]: spreadsheet export with all records plus Critical and High sheets.

pub mod terminal;
pub mod text;
pub mod xlsx;

/// Day-first format used for every human-facing date.
pub const DATE_FORMAT: &str = "%d.%m.%Y";
