//! Semantic root computation
//!
//! The semantic root is the grouping key: every token is stemmed, the stems
//! are sorted and joined with single spaces. Two keywords with the same
//! multiset of stems get the same root no matter the word order.

use crate::linguistics::TextAnalyzer;

/// Reduce normalized tokens to their semantic root
///
/// Empty input yields an empty root.
#[must_use]
pub fn semantic_root<S: AsRef<str>>(analyzer: &dyn TextAnalyzer, tokens: &[S]) -> String {
    let mut stems: Vec<String> = tokens
        .iter()
        .map(|t| analyzer.stem(t.as_ref()))
        .collect();
    stems.sort_unstable();
    stems.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linguistics::SnowballAnalyzer;

    /// Analyzer whose stem is the first four characters of the token
    struct PrefixAnalyzer;

    impl TextAnalyzer for PrefixAnalyzer {
        fn tokenize(&self, text: &str) -> Vec<String> {
            text.split_whitespace().map(str::to_string).collect()
        }

        fn stem(&self, token: &str) -> String {
            token.chars().take(4).collect()
        }
    }

    #[test]
    fn test_root_sorts_stems() {
        let root = semantic_root(&PrefixAnalyzer, &["zapatos", "comprar", "rojos"]);
        assert_eq!(root, "comp rojo zapa");
    }

    #[test]
    fn test_root_is_order_insensitive() {
        let analyzer = SnowballAnalyzer::spanish();
        let a = semantic_root(&analyzer, &["comprar", "zapatos", "rojos"]);
        let b = semantic_root(&analyzer, &["zapatos", "rojos", "comprar"]);
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }

    #[test]
    fn test_root_keeps_duplicate_stems() {
        let root = semantic_root(&PrefixAnalyzer, &["casa", "casas"]);
        assert_eq!(root, "casa casa");
    }

    #[test]
    fn test_root_of_empty_tokens() {
        let empty: [&str; 0] = [];
        assert_eq!(semantic_root(&PrefixAnalyzer, &empty), "");
    }
}
