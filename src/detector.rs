use std::path::Path;

/// Input protocols the ingestors understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Delimited,
    Workbook,
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Delimited => write!(f, "CSV"),
            InputFormat::Workbook => write!(f, "workbook"),
        }
    }
}

/// Pick the ingestion protocol from the file name alone. Anything that is not
/// a `.csv` file is treated as a workbook.
pub fn detect_format(filename: &str) -> InputFormat {
    let is_csv = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        InputFormat::Delimited
    } else {
        InputFormat::Workbook
    }
}
