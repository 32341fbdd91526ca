//! # Keyword Grouper
//!
//! Deduplicates and groups SEO keyword exports by semantic root.
//!
//! ## Features
//!
//! - Semantic roots: diacritic-free, stopword-free, stemmed and sorted tokens,
//!   so "comprar zapatos rojos" and "zapatos rojos comprar" share one key
//! - Deterministic grouping: stable (root, volume desc) sort plus adjacency merge
//! - Aggregated metrics per group with a ready-to-use SERP check link
//! - Search intent and location tagging from ordered pattern tables
//! - Pluggable tokenizer/stemmer via [`TextAnalyzer`]
//!
//! ## Example
//!
//! ```rust
//! use keyword_grouper::{GroupingConfig, IntentTable, KeywordPipeline, KeywordRecord};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = KeywordPipeline::new(GroupingConfig::default())?;
//!     let intents = IntentTable::new([("comprar", "Transaccional".to_string())])?;
//!
//!     let output = pipeline.process(
//!         vec![
//!             KeywordRecord::new("comprar zapatos rojos").with_volume(100.0),
//!             KeywordRecord::new("zapatos rojos comprar").with_volume(50.0),
//!         ],
//!         Some(&intents),
//!         None,
//!     );
//!
//!     assert_eq!(output.report.len(), 1);
//!     assert_eq!(output.report[0].volume, 150.0);
//!     Ok(())
//! }
//! ```

use std::env;
use std::path::PathBuf;

pub mod aggregate;
pub mod annotate;
pub mod error;
pub mod grouping;
pub mod linguistics;
pub mod normalize;
pub mod pipeline;
pub mod root;
pub mod tables;
pub mod types;

pub use aggregate::{SerpLink, DEFAULT_SERP_URL};
pub use annotate::{IntentTable, LocationTable, PatternTable};
pub use error::{Error, Result};
pub use linguistics::{Language, SnowballAnalyzer, TextAnalyzer};
pub use pipeline::{KeywordPipeline, PipelineOutput, RunSummary};
pub use tables::{ReportColumns, ReportFormat};
pub use types::{
    AggregatedGroup, KeywordGroup, KeywordRecord, KeywordTable, LocationTag, RootedKeyword,
};

/// Load a `.env` file from the current directory or its parents
///
/// Call before [`GroupingConfig::from_env`]. A missing file is not an error.
///
/// # Errors
///
/// Returns an error if a .env file exists but cannot be read or parsed
pub fn init() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(Error::Config(format!("failed to load .env: {e}"))),
    }
}

/// Configuration for keyword grouping
#[derive(Debug, Clone, PartialEq)]
pub struct GroupingConfig {
    /// Language used for stopwords and stemming (default: Spanish)
    pub language: Language,

    /// Run the search intent pass (default: true)
    pub detect_intent: bool,

    /// Run the location pass (default: true)
    pub detect_location: bool,

    /// Intent pattern table with `Pattern`/`Type` columns
    pub intents_path: PathBuf,

    /// Location pattern table with `Location`/`Type` columns
    pub locations_path: PathBuf,

    /// Process only the first N keywords
    pub debug_limit: Option<usize>,

    /// Search endpoint used for the `CheckSERPs` links
    pub serp_url: String,

    /// Per-keyword output with semantic roots and groups
    pub processed_path: PathBuf,

    /// Grouped report output
    pub grouped_path: PathBuf,

    /// Format of the grouped report (default: CSV)
    pub report_format: ReportFormat,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            language: Language::Spanish,
            detect_intent: true,
            detect_location: true,
            intents_path: PathBuf::from("Data/intenciones.csv"),
            locations_path: PathBuf::from("Data/ubicaciones.csv"),
            debug_limit: None,
            serp_url: DEFAULT_SERP_URL.to_string(),
            processed_path: PathBuf::from("kw_procesado.csv"),
            grouped_path: PathBuf::from("kw_agrupado.csv"),
            report_format: ReportFormat::Csv,
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|v| v.parse::<bool>().ok())
}

impl GroupingConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// Reads the process environment; call [`init`] first to pick up a `.env`
    /// file. Supports these variables:
    /// - `KEYWORDS_LANGUAGE`: `spanish` or `english` (default: spanish)
    /// - `KEYWORDS_DETECT_INTENT`: Run intent detection (default: true)
    /// - `KEYWORDS_DETECT_LOCATION`: Run location detection (default: true)
    /// - `KEYWORDS_INTENTS_PATH`: Intent table (default: `Data/intenciones.csv`)
    /// - `KEYWORDS_LOCATIONS_PATH`: Location table (default: `Data/ubicaciones.csv`)
    /// - `KEYWORDS_DEBUG_LIMIT`: Process only the first N keywords
    /// - `KEYWORDS_SERP_URL`: Search endpoint for SERP links
    /// - `KEYWORDS_PROCESSED_PATH`: Per-keyword output (default: `kw_procesado.csv`)
    /// - `KEYWORDS_GROUPED_PATH`: Grouped report (default: `kw_agrupado.csv`)
    /// - `KEYWORDS_REPORT_FORMAT`: `csv` or `json` (default: csv)
    ///
    /// Unparseable values fall back to their defaults. The SERP URL is only
    /// validated when a [`KeywordPipeline`] is built from the configuration.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let language = env::var("KEYWORDS_LANGUAGE")
            .ok()
            .and_then(|v| Language::from_name(&v))
            .unwrap_or(defaults.language);

        let detect_intent = env_flag("KEYWORDS_DETECT_INTENT").unwrap_or(defaults.detect_intent);
        let detect_location =
            env_flag("KEYWORDS_DETECT_LOCATION").unwrap_or(defaults.detect_location);

        let intents_path = env::var("KEYWORDS_INTENTS_PATH")
            .map_or(defaults.intents_path, PathBuf::from);
        let locations_path = env::var("KEYWORDS_LOCATIONS_PATH")
            .map_or(defaults.locations_path, PathBuf::from);

        let debug_limit = env::var("KEYWORDS_DEBUG_LIMIT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok());

        let serp_url = env::var("KEYWORDS_SERP_URL").unwrap_or(defaults.serp_url);

        let processed_path = env::var("KEYWORDS_PROCESSED_PATH")
            .map_or(defaults.processed_path, PathBuf::from);
        let grouped_path = env::var("KEYWORDS_GROUPED_PATH")
            .map_or(defaults.grouped_path, PathBuf::from);

        let report_format = env::var("KEYWORDS_REPORT_FORMAT")
            .ok()
            .and_then(|v| ReportFormat::from_name(&v))
            .unwrap_or(defaults.report_format);

        Self {
            language,
            detect_intent,
            detect_location,
            intents_path,
            locations_path,
            debug_limit,
            serp_url,
            processed_path,
            grouped_path,
            report_format,
        }
    }

    /// Set the keyword language
    #[must_use]
    pub const fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    /// Enable or disable search intent detection
    #[must_use]
    pub const fn with_intent_detection(mut self, enabled: bool) -> Self {
        self.detect_intent = enabled;
        self
    }

    /// Enable or disable location detection
    #[must_use]
    pub const fn with_location_detection(mut self, enabled: bool) -> Self {
        self.detect_location = enabled;
        self
    }

    /// Set the intent table path
    #[must_use]
    pub fn with_intents_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.intents_path = path.into();
        self
    }

    /// Set the location table path
    #[must_use]
    pub fn with_locations_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.locations_path = path.into();
        self
    }

    /// Process only the first `limit` keywords
    #[must_use]
    pub const fn with_debug_limit(mut self, limit: usize) -> Self {
        self.debug_limit = Some(limit);
        self
    }

    /// Set the search endpoint for SERP links
    #[must_use]
    pub fn with_serp_url(mut self, url: impl Into<String>) -> Self {
        self.serp_url = url.into();
        self
    }

    /// Set the per-keyword output path
    #[must_use]
    pub fn with_processed_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.processed_path = path.into();
        self
    }

    /// Set the grouped report path
    #[must_use]
    pub fn with_grouped_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.grouped_path = path.into();
        self
    }

    /// Set the grouped report format
    #[must_use]
    pub const fn with_report_format(mut self, format: ReportFormat) -> Self {
        self.report_format = format;
        self
    }
}
