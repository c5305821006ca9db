//! Statutory expiry and risk-tier calculation.
//!
//! A seizure lapses if not enforced within the statutory period. Law No. 7343,
//! in force from 2021-11-30, raised the period for movables and vehicles from
//! 180 to 365 days; every other category was already at 365.

use chrono::{Days, NaiveDate};

use crate::error::IngestError;
use crate::models::{AssetCategory, RiskTier};

/// First day on which the 365-day period applies to every category.
pub fn reform_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 11, 30).expect("reform date is a valid calendar date")
}

pub const SHORT_PERIOD_DAYS: u64 = 180;
pub const STANDARD_PERIOD_DAYS: u64 = 365;

/// Upper bound (inclusive) of days remaining for each tier below [`RiskTier::Safe`].
const TIER_LIMITS: &[(i64, RiskTier)] = &[
    (30, RiskTier::Critical),
    (90, RiskTier::High),
    (180, RiskTier::Medium),
    (365, RiskTier::Low),
];

/// Derived expiry fields for one seizure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub expiry_date: NaiveDate,
    pub days_remaining: i64,
    pub risk_tier: RiskTier,
}

impl RiskTier {
    /// Total mapping from days remaining to a tier. Negative values mean the
    /// seizure already lapsed, which is [`RiskTier::Safe`].
    pub fn from_days_remaining(days: i64) -> Self {
        if days < 0 {
            return RiskTier::Safe;
        }
        TIER_LIMITS
            .iter()
            .find(|&&(limit, _)| days <= limit)
            .map(|&(_, tier)| tier)
            .unwrap_or(RiskTier::Safe)
    }
}

/// Period in days that applies to a seizure made on `seizure_date`.
pub fn statutory_period(seizure_date: NaiveDate, category: AssetCategory) -> u64 {
    let short_regime = seizure_date < reform_date()
        && matches!(category, AssetCategory::Movable | AssetCategory::Vehicle);
    if short_regime {
        SHORT_PERIOD_DAYS
    } else {
        STANDARD_PERIOD_DAYS
    }
}

/// Computes [`Assessment`]s against a fixed `today`.
///
/// One calculator is built per ingestion run so every record in the run is
/// measured against the same day.
#[derive(Debug, Clone, Copy)]
pub struct ExpiryCalculator {
    today: NaiveDate,
}

impl ExpiryCalculator {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    pub fn compute(
        &self,
        seizure_date: NaiveDate,
        category: AssetCategory,
    ) -> Result<Assessment, IngestError> {
        let period = statutory_period(seizure_date, category);
        let expiry_date = seizure_date
            .checked_add_days(Days::new(period))
            .ok_or(IngestError::DateOverflow(seizure_date))?;
        let days_remaining = (expiry_date - self.today).num_days();

        Ok(Assessment {
            expiry_date,
            days_remaining,
            risk_tier: RiskTier::from_days_remaining(days_remaining),
        })
    }
}
