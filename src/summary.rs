use crate::models::{AssetCategory, RiskTier, SeizureRecord};

/// Tier counts plus the urgent records, most urgent first.
#[derive(Debug, Default)]
pub struct RiskSummary<'a> {
    pub total: usize,
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub safe: usize,
    pub critical_list: Vec<&'a SeizureRecord>,
    pub high_list: Vec<&'a SeizureRecord>,
    /// Record count for every category in [`AssetCategory::ALL`] order, zeros included.
    pub by_category: Vec<(AssetCategory, usize)>,
}

/// Which records a listing shows. An empty list accepts every value.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub tiers: Vec<RiskTier>,
    pub assets: Vec<AssetCategory>,
}

impl RecordFilter {
    pub fn is_active(&self) -> bool {
        !self.tiers.is_empty() || !self.assets.is_empty()
    }

    pub fn matches(&self, record: &SeizureRecord) -> bool {
        (self.tiers.is_empty() || self.tiers.contains(&record.risk_tier))
            && (self.assets.is_empty() || self.assets.contains(&record.asset_category))
    }
}

pub fn summarize(records: &[SeizureRecord]) -> RiskSummary<'_> {
    let mut summary = RiskSummary {
        total: records.len(),
        by_category: AssetCategory::ALL
            .iter()
            .map(|&category| {
                let count = records.iter().filter(|r| r.asset_category == category).count();
                (category, count)
            })
            .collect(),
        ..RiskSummary::default()
    };

    for record in records {
        match record.risk_tier {
            RiskTier::Critical => {
                summary.critical += 1;
                summary.critical_list.push(record);
            }
            RiskTier::High => {
                summary.high += 1;
                summary.high_list.push(record);
            }
            RiskTier::Medium => summary.medium += 1,
            RiskTier::Low => summary.low += 1,
            RiskTier::Safe => summary.safe += 1,
        }
    }

    // Stable: ties keep input order.
    summary.critical_list.sort_by_key(|r| r.days_remaining);
    summary.high_list.sort_by_key(|r| r.days_remaining);
    summary
}

/// Records ordered for export: by tier, then by days remaining.
pub fn sort_for_export(records: &[SeizureRecord]) -> Vec<&SeizureRecord> {
    let mut sorted: Vec<&SeizureRecord> = records.iter().collect();
    sorted.sort_by_key(|r| (r.risk_tier, r.days_remaining));
    sorted
}

/// Records passing `filter`, in export order.
pub fn filter_records<'a>(records: &'a [SeizureRecord], filter: &RecordFilter) -> Vec<&'a SeizureRecord> {
    sort_for_export(records)
        .into_iter()
        .filter(|r| filter.matches(r))
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::AssetCategory;
    use chrono::NaiveDate;

    pub(crate) fn record(file_number: &str, tier: RiskTier, days: i64) -> SeizureRecord {
        let date = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        SeizureRecord {
            file_number: file_number.to_string(),
            debtor_name: "Test Borçlu".to_string(),
            national_id: None,
            asset_category: AssetCategory::Other,
            seizure_date: date,
            expiry_date: date,
            days_remaining: days,
            risk_tier: tier,
            detail: String::new(),
            source_sheet: "Derdest".to_string(),
        }
    }

    #[test]
    fn test_counts_and_lists() {
        let records = vec![
            record("a", RiskTier::Critical, 20),
            record("b", RiskTier::High, 40),
            record("c", RiskTier::Critical, 5),
            record("d", RiskTier::Safe, 900),
        ];
        let s = summarize(&records);
        assert_eq!(s.total, 4);
        assert_eq!(s.critical, 2);
        assert_eq!(s.high, 1);
        assert_eq!(s.medium, 0);
        assert_eq!(s.low, 0);
        assert_eq!(s.safe, 1);

        let critical: Vec<&str> = s.critical_list.iter().map(|r| r.file_number.as_str()).collect();
        assert_eq!(critical, vec!["c", "a"]);
        assert_eq!(s.high_list.len(), 1);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let records = vec![
            record("first", RiskTier::High, 50),
            record("second", RiskTier::High, 50),
        ];
        let s = summarize(&records);
        assert_eq!(s.high_list[0].file_number, "first");
        assert_eq!(s.high_list[1].file_number, "second");
    }

    #[test]
    fn test_empty() {
        let s = summarize(&[]);
        assert_eq!(s.total, 0);
        assert!(s.critical_list.is_empty());
    }

    #[test]
    fn test_category_counts_include_zeros() {
        let mut car = record("car", RiskTier::High, 40);
        car.asset_category = AssetCategory::Vehicle;
        let records = vec![car, record("x", RiskTier::Safe, 900), record("y", RiskTier::Low, 200)];

        let s = summarize(&records);
        assert_eq!(
            s.by_category,
            vec![
                (AssetCategory::RealEstate, 0),
                (AssetCategory::Vehicle, 1),
                (AssetCategory::Movable, 0),
                (AssetCategory::BankAccount, 0),
                (AssetCategory::Other, 2),
            ]
        );
    }

    #[test]
    fn test_filter_by_tier_and_asset() {
        let mut car = record("car", RiskTier::Critical, 10);
        car.asset_category = AssetCategory::Vehicle;
        let records = vec![
            record("other-high", RiskTier::High, 60),
            car,
            record("other-crit", RiskTier::Critical, 3),
            record("other-safe", RiskTier::Safe, 900),
        ];

        let names = |filter: &RecordFilter| -> Vec<String> {
            filter_records(&records, filter)
                .iter()
                .map(|r| r.file_number.clone())
                .collect()
        };

        let everything = RecordFilter::default();
        assert!(!everything.is_active());
        assert_eq!(names(&everything).len(), 4);

        let urgent = RecordFilter {
            tiers: vec![RiskTier::Critical, RiskTier::High],
            assets: Vec::new(),
        };
        assert_eq!(names(&urgent), vec!["other-crit", "car", "other-high"]);

        let urgent_other = RecordFilter {
            assets: vec![AssetCategory::Other],
            ..urgent
        };
        assert!(urgent_other.is_active());
        assert_eq!(names(&urgent_other), vec!["other-crit", "other-high"]);
    }

    #[test]
    fn test_export_order() {
        let records = vec![
            record("safe", RiskTier::Safe, -10),
            record("low", RiskTier::Low, 200),
            record("crit-late", RiskTier::Critical, 25),
            record("crit-soon", RiskTier::Critical, 2),
        ];
        let order: Vec<&str> = sort_for_export(&records)
            .iter()
            .map(|r| r.file_number.as_str())
            .collect();
        assert_eq!(order, vec!["crit-soon", "crit-late", "low", "safe"]);
    }
}
