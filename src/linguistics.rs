//! Linguistic capability used by the normalizer and the root calculator
//!
//! Tokenization and stemming are pluggable: the pipeline only sees the
//! [`TextAnalyzer`] trait, so tests can swap in a deterministic analyzer and
//! other languages can be added without touching the grouping code.
//!
//! The bundled [`SnowballAnalyzer`] splits text on Unicode word boundaries,
//! drops the `stop-words` list for its language and stems with
//! `rust-stemmers` (Snowball).

use crate::normalize::transliterate;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use stop_words::LANGUAGE;
use unicode_segmentation::UnicodeSegmentation;

/// Language of the keyword list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Spanish,
    English,
}

impl Language {
    /// Parse a language name such as `"spanish"`, `"es"` or `"english"`
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "spanish" | "es" | "espanol" | "español" => Some(Self::Spanish),
            "english" | "en" => Some(Self::English),
            _ => None,
        }
    }

    const fn algorithm(self) -> Algorithm {
        match self {
            Self::Spanish => Algorithm::Spanish,
            Self::English => Algorithm::English,
        }
    }

    const fn stopword_list(self) -> LANGUAGE {
        match self {
            Self::Spanish => LANGUAGE::Spanish,
            Self::English => LANGUAGE::English,
        }
    }

    /// Stopwords for this language, both as written and without diacritics
    fn stopwords(self) -> HashSet<String> {
        let mut words = HashSet::new();
        for word in stop_words::get(self.stopword_list()).iter() {
            let word = word.to_lowercase();
            let folded = transliterate(&word);
            if !folded.is_empty() {
                words.insert(folded);
            }
            words.insert(word);
        }
        words
    }
}

/// Tokenizer + stemmer pair injected into the pipeline
///
/// Implementations must be deterministic: the same text always yields the
/// same tokens, and the same token always yields the same stem.
pub trait TextAnalyzer: Send + Sync {
    /// Split text into lowercase word tokens, dropping punctuation and stopwords
    fn tokenize(&self, text: &str) -> Vec<String>;

    /// Reduce one token to its stem
    fn stem(&self, token: &str) -> String;
}

/// Snowball-based analyzer using the `stop-words` list for its language
pub struct SnowballAnalyzer {
    language: Language,
    stemmer: Stemmer,
    stopwords: HashSet<String>,
}

impl std::fmt::Debug for SnowballAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowballAnalyzer")
            .field("language", &self.language)
            .field("stopwords", &self.stopwords.len())
            .finish_non_exhaustive()
    }
}

impl SnowballAnalyzer {
    /// Create an analyzer for the given language
    #[must_use]
    pub fn new(language: Language) -> Self {
        Self {
            language,
            stemmer: Stemmer::create(language.algorithm()),
            stopwords: language.stopwords(),
        }
    }

    /// Spanish analyzer (the default for keyword research exports)
    #[must_use]
    pub fn spanish() -> Self {
        Self::new(Language::Spanish)
    }

    /// Add extra stopwords on top of the built-in list
    #[must_use]
    pub fn with_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stopwords
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// Check if a word is a stopword
    #[must_use]
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }
}

impl TextAnalyzer for SnowballAnalyzer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .map(str::to_lowercase)
            .filter(|w| !self.is_stopword(w))
            .collect()
    }

    fn stem(&self, token: &str) -> String {
        self.stemmer.stem(token).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_name() {
        assert_eq!(Language::from_name("Spanish"), Some(Language::Spanish));
        assert_eq!(Language::from_name(" es "), Some(Language::Spanish));
        assert_eq!(Language::from_name("en"), Some(Language::English));
        assert_eq!(Language::from_name("klingon"), None);
    }

    #[test]
    fn test_tokenize_drops_punctuation_and_stopwords() {
        let analyzer = SnowballAnalyzer::spanish();
        assert_eq!(
            analyzer.tokenize("Zapatos, para la playa!"),
            vec!["zapatos", "playa"]
        );
    }

    #[test]
    fn test_tokenize_keeps_numbers_for_later_filtering() {
        let analyzer = SnowballAnalyzer::spanish();
        assert_eq!(
            analyzer.tokenize("funda iphone 15"),
            vec!["funda", "iphone", "15"]
        );
    }

    #[test]
    fn test_spanish_stopword_list() {
        let analyzer = SnowballAnalyzer::spanish();
        for word in ["algo", "alguna", "algunas", "alguno", "algunos", "ambos", "que", "el"] {
            assert!(analyzer.is_stopword(word), "{word} should be a stopword");
        }
        assert!(!analyzer.is_stopword("zapatos"));
        assert_eq!(
            analyzer.tokenize("comprar algunos zapatos"),
            vec!["comprar", "zapatos"]
        );
    }

    #[test]
    fn test_stopwords_match_without_diacritics() {
        let analyzer = SnowballAnalyzer::spanish();
        assert!(analyzer.is_stopword("mas"));
        assert!(analyzer.is_stopword("más"));
    }

    #[test]
    fn test_english_stopword_list() {
        let analyzer = SnowballAnalyzer::new(Language::English);
        assert_eq!(
            analyzer.tokenize("the running shoes"),
            vec!["running", "shoes"]
        );
    }

    #[test]
    fn test_stem_singular_and_plural_agree() {
        let analyzer = SnowballAnalyzer::spanish();
        assert_eq!(analyzer.stem("zapato"), analyzer.stem("zapatos"));
        assert_eq!(analyzer.stem("barato"), analyzer.stem("baratos"));
    }

    #[test]
    fn test_english_stemming() {
        let analyzer = SnowballAnalyzer::new(Language::English);
        assert_eq!(analyzer.stem("running"), "run");
        assert_eq!(analyzer.stem("runs"), "run");
    }

    #[test]
    fn test_extra_stopwords() {
        let analyzer = SnowballAnalyzer::spanish().with_stopwords(["Online"]);
        assert!(analyzer.is_stopword("online"));
        assert_eq!(analyzer.tokenize("zapatos online"), vec!["zapatos"]);
    }
}
