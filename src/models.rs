use chrono::NaiveDate;
use serde::Serialize;

/// One normalized seizure, produced by an ingestor and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct SeizureRecord {
    pub file_number: String,
    pub debtor_name: String,
    pub national_id: Option<String>,
    pub asset_category: AssetCategory,
    pub seizure_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub days_remaining: i64,
    pub risk_tier: RiskTier,
    pub detail: String,
    pub source_sheet: String,
}

/// Outcome of ingesting one file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestionResult {
    pub succeeded: usize,
    pub failed: usize,
    pub total: usize,
    pub records: Vec<SeizureRecord>,
    pub errors: Vec<String>,
}

impl IngestionResult {
    /// A well-formed result carrying a single file-level error.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            errors: vec![error.into()],
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AssetCategory {
    RealEstate,
    Vehicle,
    Movable,
    BankAccount,
    Other,
}

impl AssetCategory {
    /// Every category, in report order.
    pub const ALL: [AssetCategory; 5] = [
        AssetCategory::RealEstate,
        AssetCategory::Vehicle,
        AssetCategory::Movable,
        AssetCategory::BankAccount,
        AssetCategory::Other,
    ];

    /// Map a category label as written by upstream exports (Turkish) or by
    /// this tool's own [`Display`](std::fmt::Display). Unknown labels are [`AssetCategory::Other`].
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Taşınmaz" | "Real Estate" => AssetCategory::RealEstate,
            "Araç" | "Vehicle" => AssetCategory::Vehicle,
            "Menkul" | "Movable" => AssetCategory::Movable,
            "Banka Hesabı" | "Bank Account" => AssetCategory::BankAccount,
            _ => AssetCategory::Other,
        }
    }
}

impl std::fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetCategory::RealEstate => write!(f, "Real Estate"),
            AssetCategory::Vehicle => write!(f, "Vehicle"),
            AssetCategory::Movable => write!(f, "Movable"),
            AssetCategory::BankAccount => write!(f, "Bank Account"),
            AssetCategory::Other => write!(f, "Other"),
        }
    }
}

/// Urgency bucket derived from days remaining. Declaration order is
/// report order: most urgent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskTier {
    Critical,
    High,
    Medium,
    Low,
    Safe,
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Critical => write!(f, "Critical"),
            RiskTier::High => write!(f, "High"),
            RiskTier::Medium => write!(f, "Medium"),
            RiskTier::Low => write!(f, "Low"),
            RiskTier::Safe => write!(f, "Safe"),
        }
    }
}
