//! Keyword text normalization
//!
//! - Transliteration: uses the `slug` crate for robust Unicode handling
//!   ("Cañón" → "canon")
//! - Tokenization and stopword removal: delegated to the injected [`TextAnalyzer`]
//! - Significance filter: keeps tokens longer than [`MIN_TOKEN_CHARS`] characters
//!   made only of letters

use crate::linguistics::TextAnalyzer;
use slug::slugify;

/// Tokens must be strictly longer than this to be significant
pub const MIN_TOKEN_CHARS: usize = 3;

/// Transliterate text to lowercase ASCII words separated by single spaces
///
/// # Examples
///
/// ```
/// use keyword_grouper::normalize::transliterate;
///
/// assert_eq!(transliterate("Zapatos Niño"), "zapatos nino");
/// assert_eq!(transliterate("  ¿Dónde   comprar?"), "donde comprar");
/// ```
#[must_use]
pub fn transliterate(text: &str) -> String {
    // slugify lowercases, strips diacritics and collapses separators into '-'
    slugify(text).replace('-', " ")
}

/// Normalize a column header for tolerant matching
///
/// `"Pos.Med\nRivales"`, `"Pos. Med Rivales"` and `"posmedrivales"` all map to
/// the same key.
#[must_use]
pub fn normalize_header(name: &str) -> String {
    slugify(name).replace('-', "")
}

/// Convert raw keyword text into its significant word tokens
///
/// Tokens keep their order of appearance. A keyword made only of stopwords,
/// numbers or short connectors yields an empty vector.
#[must_use]
pub fn normalize_keyword(analyzer: &dyn TextAnalyzer, raw: &str) -> Vec<String> {
    analyzer
        .tokenize(&transliterate(raw))
        .into_iter()
        .filter(|t| is_significant(t))
        .collect()
}

fn is_significant(token: &str) -> bool {
    token.chars().count() > MIN_TOKEN_CHARS && token.chars().all(char::is_alphabetic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linguistics::SnowballAnalyzer;

    #[test]
    fn test_transliterate_unicode() {
        assert_eq!(transliterate("José García"), "jose garcia");
        assert_eq!(transliterate("Cañón City"), "canon city");
        assert_eq!(transliterate("PINGÜINO"), "pinguino");
    }

    #[test]
    fn test_transliterate_punctuation() {
        assert_eq!(transliterate("zapatos-rojos, baratos!"), "zapatos rojos baratos");
        assert_eq!(transliterate("!!!"), "");
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("Pos.Med\nRivales"), "posmedrivales");
        assert_eq!(normalize_header("Pos.MedRivales"), "posmedrivales");
        assert_eq!(normalize_header("Patrón"), "patron");
        assert_eq!(normalize_header("Keyword"), "keyword");
    }

    #[test]
    fn test_normalize_keyword() {
        let analyzer = SnowballAnalyzer::spanish();
        assert_eq!(
            normalize_keyword(&analyzer, "Comprar zapatos rojos"),
            vec!["comprar", "zapatos", "rojos"]
        );
    }

    #[test]
    fn test_normalize_keyword_strips_diacritics() {
        let analyzer = SnowballAnalyzer::spanish();
        assert_eq!(
            normalize_keyword(&analyzer, "camión grúa"),
            vec!["camion", "grua"]
        );
    }

    #[test]
    fn test_normalize_keyword_drops_short_and_numeric_tokens() {
        let analyzer = SnowballAnalyzer::spanish();
        assert_eq!(
            normalize_keyword(&analyzer, "playa sol 2024 zapatillas x3"),
            vec!["playa", "zapatillas"]
        );
    }

    #[test]
    fn test_normalize_keyword_all_stopwords() {
        let analyzer = SnowballAnalyzer::spanish();
        assert!(normalize_keyword(&analyzer, "para los que").is_empty());
        assert!(normalize_keyword(&analyzer, "1234 5678").is_empty());
        assert!(normalize_keyword(&analyzer, "").is_empty());
    }
}
