/// Fold a string for case-insensitive substring matching.
///
/// Plain Unicode lowercasing turns `İ` into `i` + U+0307 and leaves `ı`
/// alone, so `"BTİDK"` would never contain `"btidk"` and `"TAŞINMAZ"` would
/// never contain `"taşınmaz"`. All four i variants collapse to `i` here.
pub fn fold(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'İ' | 'I' | 'ı' => out.push('i'),
            '\u{0307}' => {}
            other => out.extend(other.to_lowercase()),
        }
    }
    out
}

/// `true` if the folded `haystack` contains the folded `needle`.
pub fn contains_folded(haystack: &str, needle: &str) -> bool {
    fold(haystack).contains(&fold(needle))
}

/// Truncate to at most `max` characters without splitting a code point.
pub fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

/// `true` for a non-empty string made only of ASCII digits.
pub fn is_ascii_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_turkish_capitals() {
        assert_eq!(fold("BTİDK İnfaz"), "btidk infaz");
        assert_eq!(fold("TAŞINMAZ"), "taşinmaz");
        assert_eq!(fold("taşınmaz"), "taşinmaz");
        assert_eq!(fold("KIYMET"), fold("kıymet"));
    }

    #[test]
    fn test_contains_folded() {
        assert!(contains_folded("Araç Haciz Raporu", "ARAÇ"));
        assert!(contains_folded("GM AVUKAT Listesi", "gm avukat"));
        assert!(!contains_folded("Derdest", "ticari"));
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("ÇŞĞÜÖİ", 3), "ÇŞĞ");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_is_ascii_digits() {
        assert!(is_ascii_digits("12345678901"));
        assert!(!is_ascii_digits(""));
        assert!(!is_ascii_digits("123a"));
        assert!(!is_ascii_digits("١٢٣"));
    }
}
