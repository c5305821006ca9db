use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::source::Cell;

/// Accepted text formats, tried in order. The first one that parses wins,
/// so `01-02-2024` is always day-first.
const DATE_FORMATS: &[(&str, bool)] = &[
    ("%Y-%m-%d %H:%M:%S", true),
    ("%Y-%m-%d", false),
    ("%d.%m.%Y", false),
    ("%d/%m/%Y", false),
    ("%d-%m-%Y", false),
    ("%d.%m.%y", false),
];

/// Years outside this window are treated as a misparse.
const MIN_YEAR: i32 = 1990;
const MAX_YEAR: i32 = 2030;

/// Only the leading date/time portion of a value is considered.
const MAX_INPUT_CHARS: usize = 19;

/// Parse a cell into a calendar date.
///
/// Date cells pass through unchanged. Everything else is rendered as text
/// and handed to [`parse_date_str`].
pub fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Empty => None,
        Cell::Date(dt) => Some(dt.date()),
        other => other.as_text().and_then(|s| parse_date_str(&s)),
    }
}

/// Parse free text against [`DATE_FORMATS`]. Returns `None` for blank and
/// null-like markers (`nan`, `none`, `nat`) and for anything unparseable.
pub fn parse_date_str(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() || is_null_marker(trimmed) {
        return None;
    }

    let candidate: String = trimmed.chars().take(MAX_INPUT_CHARS).collect();

    DATE_FORMATS
        .iter()
        .filter_map(|&(fmt, with_time)| parse_with(&candidate, fmt, with_time))
        .find(|d| (MIN_YEAR..=MAX_YEAR).contains(&d.year()))
}

fn parse_with(s: &str, fmt: &str, with_time: bool) -> Option<NaiveDate> {
    if with_time {
        NaiveDateTime::parse_from_str(s, fmt).ok().map(|dt| dt.date())
    } else {
        NaiveDate::parse_from_str(s, fmt).ok()
    }
}

fn is_null_marker(s: &str) -> bool {
    ["nan", "none", "nat"]
        .iter()
        .any(|m| s.eq_ignore_ascii_case(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_supported_formats_agree() {
        let expected = Some(ymd(2024, 6, 15));
        assert_eq!(parse_date_str("2024-06-15"), expected);
        assert_eq!(parse_date_str("15.06.2024"), expected);
        assert_eq!(parse_date_str("2024-06-15 00:00:00"), expected);
        assert_eq!(parse_date_str("15/06/2024"), expected);
        assert_eq!(parse_date_str("15-06-2024"), expected);
        assert_eq!(parse_date_str("15.06.24"), expected);
    }

    #[test]
    fn test_unparseable_and_null_markers() {
        assert_eq!(parse_date_str("not a date"), None);
        assert_eq!(parse_date_str(""), None);
        assert_eq!(parse_date_str("   "), None);
        assert_eq!(parse_date_str("NaN"), None);
        assert_eq!(parse_date_str("None"), None);
        assert_eq!(parse_date_str("NaT"), None);
    }

    #[test]
    fn test_day_first_wins_for_ambiguous_dashes() {
        assert_eq!(parse_date_str("01-02-2024"), Some(ymd(2024, 2, 1)));
    }

    #[test]
    fn test_out_of_range_year_rejected() {
        assert_eq!(parse_date_str("1985-01-01"), None);
        assert_eq!(parse_date_str("15.06.2031"), None);
        assert_eq!(parse_date_str("2030-12-31"), Some(ymd(2030, 12, 31)));
    }

    #[test]
    fn test_trailing_text_beyond_nineteen_chars_ignored() {
        assert_eq!(
            parse_date_str("2024-06-15 10:30:00.123456"),
            Some(ymd(2024, 6, 15))
        );
        assert_eq!(parse_date_str("  2023-01-09  "), Some(ymd(2023, 1, 9)));
    }

    #[test]
    fn test_cells() {
        let dt = ymd(1975, 3, 1).and_hms_opt(12, 0, 0).unwrap();
        // Structured dates skip the year window.
        assert_eq!(parse_date(&Cell::Date(dt)), Some(ymd(1975, 3, 1)));
        assert_eq!(parse_date(&Cell::Empty), None);
        assert_eq!(parse_date(&Cell::text("09.01.2023")), Some(ymd(2023, 1, 9)));
        assert_eq!(parse_date(&Cell::Number(45000.0)), None);
    }
}
