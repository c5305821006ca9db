use std::sync::OnceLock;

use regex::Regex;

use crate::classify::{first_match, SubstringRule};

/// The known source layouts. Each one has its own [`LayoutRules`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    /// Pending-case list with a `KEY: value | KEY: value` detail column.
    Derdest,
    /// Bank follow-up list, one column per field.
    Btidk,
    /// Commercial case list, same detail shape as [`LayoutKind::Derdest`].
    Ticari,
    RealEstateReport,
    VehicleReport,
    /// Deprivation-of-rights list keyed by `ESAS_NO`.
    SeizureList,
}

impl std::fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutKind::Derdest => write!(f, "derdest"),
            LayoutKind::Btidk => write!(f, "btidk"),
            LayoutKind::Ticari => write!(f, "ticari"),
            LayoutKind::RealEstateReport => write!(f, "real-estate report"),
            LayoutKind::VehicleReport => write!(f, "vehicle report"),
            LayoutKind::SeizureList => write!(f, "seizure list"),
        }
    }
}

/// Layout used for any sheet no rule recognizes.
pub const FALLBACK_LAYOUT: LayoutKind = LayoutKind::Derdest;

const LAYOUT_RULES: &[(SubstringRule, LayoutKind)] = &[
    (SubstringRule::any(&["derdest"]), LayoutKind::Derdest),
    (
        SubstringRule::any(&["btidk"]).excluding(&["infaz"]),
        LayoutKind::Btidk,
    ),
    (
        SubstringRule::any(&["ticari"]).excluding(&["sorgu"]),
        LayoutKind::Ticari,
    ),
    (
        SubstringRule::any(&["taşınmaz", "tasinmaz"]),
        LayoutKind::RealEstateReport,
    ),
    (SubstringRule::any(&["araç", "arac"]), LayoutKind::VehicleReport),
    (SubstringRule::any(&["mahrumiyet"]), LayoutKind::SeizureList),
    (SubstringRule::any(&["121"]), LayoutKind::RealEstateReport),
    (SubstringRule::any(&["103"]), LayoutKind::RealEstateReport),
    (
        SubstringRule::any(&["kıymet", "kiymet"]),
        LayoutKind::RealEstateReport,
    ),
];

/// Map a sheet name to its layout; unrecognized names fall back to
/// [`FALLBACK_LAYOUT`].
pub fn classify_layout(sheet_name: &str) -> LayoutKind {
    first_match(LAYOUT_RULES, sheet_name).unwrap_or(FALLBACK_LAYOUT)
}

/// Per-layout extraction rules: the primary date column and the patterns
/// applied to the embedded detail text.
#[derive(Debug)]
pub struct LayoutRules {
    pub kind: LayoutKind,
    pub date_column: &'static str,
    pub debtor_pattern: Option<Regex>,
    pub file_number_pattern: Option<Regex>,
    pub national_id_pattern: Option<Regex>,
}

const DEBTOR_PATTERN: &str = r"BORÇLULAR?:\s*([^|]+)";
const FILE_NUMBER_PATTERN: &str = r"DOSYA NO:\s*([^|]+)";
const NATIONAL_ID_PATTERN: &str = r"(\d{11})\s*-\s*";

impl LayoutKind {
    /// The rule bundle for this layout, compiled once per process.
    pub fn rules(self) -> &'static LayoutRules {
        static DERDEST: OnceLock<LayoutRules> = OnceLock::new();
        static BTIDK: OnceLock<LayoutRules> = OnceLock::new();
        static TICARI: OnceLock<LayoutRules> = OnceLock::new();
        static REAL_ESTATE: OnceLock<LayoutRules> = OnceLock::new();
        static VEHICLE: OnceLock<LayoutRules> = OnceLock::new();
        static SEIZURE_LIST: OnceLock<LayoutRules> = OnceLock::new();

        let cell = match self {
            LayoutKind::Derdest => &DERDEST,
            LayoutKind::Btidk => &BTIDK,
            LayoutKind::Ticari => &TICARI,
            LayoutKind::RealEstateReport => &REAL_ESTATE,
            LayoutKind::VehicleReport => &VEHICLE,
            LayoutKind::SeizureList => &SEIZURE_LIST,
        };
        cell.get_or_init(|| build_rules(self))
    }
}

fn build_rules(kind: LayoutKind) -> LayoutRules {
    // The patterns are literals; a failure here is a programming error.
    let re = |p: &str| Regex::new(p).expect("built-in layout pattern must compile");

    match kind {
        LayoutKind::Derdest | LayoutKind::Ticari => LayoutRules {
            kind,
            date_column: "TAKİP TARİHİ",
            debtor_pattern: Some(re(DEBTOR_PATTERN)),
            file_number_pattern: Some(re(FILE_NUMBER_PATTERN)),
            national_id_pattern: Some(re(NATIONAL_ID_PATTERN)),
        },
        LayoutKind::Btidk => column_layout(kind, "Takibe Geçiş Tarihi", re(FILE_NUMBER_PATTERN)),
        LayoutKind::RealEstateReport | LayoutKind::VehicleReport => {
            column_layout(kind, "HACİZ TARİHİ", re(FILE_NUMBER_PATTERN))
        }
        LayoutKind::SeizureList => column_layout(kind, "EKLEME_TARIHI", re(FILE_NUMBER_PATTERN)),
    }
}

/// Layouts whose fields live in dedicated columns. Only the file number is
/// ever read back from their detail text.
fn column_layout(kind: LayoutKind, date_column: &'static str, file_number: Regex) -> LayoutRules {
    LayoutRules {
        kind,
        date_column,
        debtor_pattern: None,
        file_number_pattern: Some(file_number),
        national_id_pattern: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_layouts() {
        assert_eq!(classify_layout("Derdest Dosyalar"), LayoutKind::Derdest);
        assert_eq!(classify_layout("BTİDK"), LayoutKind::Btidk);
        assert_eq!(classify_layout("btidk takip"), LayoutKind::Btidk);
        assert_eq!(classify_layout("Ticari Krediler"), LayoutKind::Ticari);
        assert_eq!(classify_layout("TAŞINMAZ HACİZ"), LayoutKind::RealEstateReport);
        assert_eq!(classify_layout("Tasinmaz"), LayoutKind::RealEstateReport);
        assert_eq!(classify_layout("ARAÇ HACİZ RAPORU"), LayoutKind::VehicleReport);
        assert_eq!(classify_layout("Mahrumiyet"), LayoutKind::SeizureList);
        assert_eq!(classify_layout("121 Şerhi"), LayoutKind::RealEstateReport);
        assert_eq!(classify_layout("103 Davetiye"), LayoutKind::RealEstateReport);
        assert_eq!(classify_layout("Kıymet Takdiri"), LayoutKind::RealEstateReport);
    }

    #[test]
    fn test_exclusions_fall_through() {
        assert_eq!(classify_layout("BTİDK İnfaz"), LayoutKind::Derdest);
        assert_eq!(classify_layout("Ticari Sorgu"), LayoutKind::Derdest);
        assert_eq!(classify_layout("Ticari Sorgu Araç"), LayoutKind::VehicleReport);
    }

    #[test]
    fn test_priority_order() {
        // "derdest" is checked before the vehicle keyword.
        assert_eq!(classify_layout("Derdest Araç"), LayoutKind::Derdest);
        // Vehicle keyword is checked before the "121" number.
        assert_eq!(classify_layout("Araç 121"), LayoutKind::VehicleReport);
    }

    #[test]
    fn test_unknown_sheet_uses_fallback() {
        assert_eq!(classify_layout("Sayfa1"), FALLBACK_LAYOUT);
        assert_eq!(classify_layout(""), FALLBACK_LAYOUT);
    }

    #[test]
    fn test_rules_bundles() {
        let derdest = LayoutKind::Derdest.rules();
        assert_eq!(derdest.date_column, "TAKİP TARİHİ");
        assert!(derdest.debtor_pattern.is_some());
        assert!(derdest.national_id_pattern.is_some());

        let btidk = LayoutKind::Btidk.rules();
        assert_eq!(btidk.date_column, "Takibe Geçiş Tarihi");
        assert!(btidk.debtor_pattern.is_none());
        assert!(btidk.file_number_pattern.is_some());

        assert_eq!(LayoutKind::SeizureList.rules().date_column, "EKLEME_TARIHI");
        assert_eq!(LayoutKind::VehicleReport.rules().kind, LayoutKind::VehicleReport);
    }
}
