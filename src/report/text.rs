use chrono::NaiveDate;

use crate::models::SeizureRecord;
use crate::summary::RiskSummary;

use super::DATE_FORMAT;

pub const DEFAULT_TOP: usize = 10;

const RULE: &str = "--------------------------------------------------";

/// Plain-text summary: tier counts followed by the `top` most urgent
/// Critical and High records.
pub fn render(summary: &RiskSummary<'_>, today: NaiveDate, top: usize) -> String {
    let mut out = String::new();

    out.push_str("HACIZ TAKIP - RISK SUMMARY\n");
    out.push_str("==================================================\n");
    out.push_str(&format!("Date: {}\n\n", today.format(DATE_FORMAT)));

    out.push_str("OVERVIEW\n");
    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("Total records        : {}\n", summary.total));
    out.push_str(&format!("Critical (0-30 days) : {}\n", summary.critical));
    out.push_str(&format!("High (31-90 days)    : {}\n", summary.high));
    out.push_str(&format!("Medium (91-180 days) : {}\n", summary.medium));
    out.push_str(&format!("Low / Safe           : {}\n", summary.low + summary.safe));

    out.push_str("\nBY ASSET CATEGORY\n");
    out.push_str(RULE);
    out.push('\n');
    for (category, count) in &summary.by_category {
        out.push_str(&format!("{:<21}: {}\n", category.to_string(), count));
    }

    section(&mut out, "CRITICAL RISK FILES", &summary.critical_list, top);
    section(&mut out, "HIGH RISK FILES", &summary.high_list, top);

    out.push_str("\n---\n");
    out.push_str("Expiry follows IIK art. 106/110 as amended by Law No. 7343.\n");
    out
}

fn section(out: &mut String, title: &str, records: &[&SeizureRecord], top: usize) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(RULE);
    out.push('\n');

    if records.is_empty() {
        out.push_str("(none)\n");
        return;
    }
    for record in records.iter().take(top) {
        out.push_str(&line(record));
        out.push('\n');
    }
    if records.len() > top {
        out.push_str(&format!("... and {} more\n", records.len() - top));
    }
}

fn line(record: &SeizureRecord) -> String {
    format!(
        "{} | {} | {} days left",
        record.file_number, record.debtor_name, record.days_remaining
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskTier;
    use crate::summary::summarize;
    use crate::summary::tests::record;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_render_lists_urgent_records() {
        let records = vec![
            record("2023/9", RiskTier::Critical, 12),
            record("2023/4", RiskTier::High, 60),
            record("2023/1", RiskTier::Critical, 3),
            record("2023/7", RiskTier::Low, 300),
        ];
        let summary = summarize(&records);
        let text = render(&summary, today(), DEFAULT_TOP);

        assert!(text.contains("Date: 01.03.2024"));
        assert!(text.contains("Total records        : 4"));
        assert!(text.contains("Low / Safe           : 1"));
        assert!(text.contains("Other                : 4\n"));
        assert!(text.contains("Bank Account         : 0\n"));

        let first = text.find("2023/1 | Test Borçlu | 3 days left").unwrap();
        let second = text.find("2023/9 | Test Borçlu | 12 days left").unwrap();
        assert!(first < second);
        assert!(text.contains("2023/4 | Test Borçlu | 60 days left"));
        assert!(!text.contains("2023/7"));
    }

    #[test]
    fn test_top_limits_each_section() {
        let records: Vec<_> = (0..5)
            .map(|i| record(&format!("K{}", i), RiskTier::Critical, i))
            .collect();
        let summary = summarize(&records);
        let text = render(&summary, today(), 2);
        assert!(text.contains("K0 |"));
        assert!(text.contains("K1 |"));
        assert!(!text.contains("K2 |"));
        assert!(text.contains("... and 3 more"));
        assert!(text.contains("HIGH RISK FILES\n"));
        assert!(text.contains("(none)"));
    }
}
