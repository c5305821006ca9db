use crate::classify::{first_match, SubstringRule};
use crate::models::AssetCategory;
use crate::normalize::text::contains_folded;

/// Sheet-name rules, consulted in order. Detail keywords are checked
/// alongside the sheet rule of the same rank (see [`classify_asset`]).
const SHEET_RULES: &[(SubstringRule, AssetCategory)] = &[
    (SubstringRule::any(&["araç", "arac"]), AssetCategory::Vehicle),
    (
        SubstringRule::any(&["taşınmaz", "tasinmaz", "121"]),
        AssetCategory::RealEstate,
    ),
    (SubstringRule::any(&["menkul"]), AssetCategory::Movable),
    (SubstringRule::any(&["89"]), AssetCategory::BankAccount),
];

/// Keywords in the row detail that also decide a category.
const DETAIL_KEYWORDS: &[(&str, AssetCategory)] = &[
    ("plaka", AssetCategory::Vehicle),
    ("banka", AssetCategory::BankAccount),
];

/// Decide the asset category from the sheet name and, optionally, a detail string.
///
/// Priority: vehicle (sheet or `plaka` in detail), real estate, movable,
/// bank account (sheet `89` or `banka` in detail), other.
pub fn classify_asset(sheet_name: &str, detail: &str) -> AssetCategory {
    let by_sheet = first_match(SHEET_RULES, sheet_name);
    let by_detail = DETAIL_KEYWORDS
        .iter()
        .find(|(kw, _)| contains_folded(detail, kw))
        .map(|&(_, category)| category);

    [by_sheet, by_detail]
        .into_iter()
        .flatten()
        .min_by_key(|c| rank(*c))
        .unwrap_or(AssetCategory::Other)
}

fn rank(category: AssetCategory) -> usize {
    SHEET_RULES
        .iter()
        .position(|&(_, c)| c == category)
        .unwrap_or(SHEET_RULES.len())
}
